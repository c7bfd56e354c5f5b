use regex::Regex;

lazy_static::lazy_static! {
    static ref SCRIPT_OR_STYLE: Regex =
        Regex::new(r"(?is)<\s*(script|style)\b[^>]*>.*?<\s*/\s*(script|style)\s*>").unwrap();
    static ref TAG: Regex = Regex::new(r"(?s)<!--.*?-->|</?[a-zA-Z!][^>]*>").unwrap();
}

/// Removes every HTML tag from `input`, dropping `<script>` and `<style>`
/// elements together with their content. Text between tags is kept.
pub fn strip_markup(input: &str) -> String {
    let without_blocks = SCRIPT_OR_STYLE.replace_all(input, "");
    let sanitized = TAG.replace_all(&without_blocks, "");

    sanitized.trim().to_string()
}

/// Escapes the characters that are significant in HTML.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup() {
        let input = "<b>2%</b> milk <i>please</i>";
        assert_eq!(strip_markup(input), "2% milk please");
    }

    #[test]
    fn test_strip_markup_drops_script_bodies() {
        let input = "buy<script type=\"text/javascript\">alert('x')</script> eggs<style>p{}</style>";
        assert_eq!(strip_markup(input), "buy eggs");
    }

    #[test]
    fn test_strip_markup_keeps_plain_comparisons() {
        assert_eq!(strip_markup("2 < 3 and 5 > 4"), "2 < 3 and 5 > 4");
        assert_eq!(strip_markup("  a <!-- hidden --> b  "), "a  b");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Buy milk"), "Buy milk");
        assert_eq!(
            escape_html("<a href='/x'>Tom & Jerry</a>"),
            "&lt;a href=&#x27;&#x2F;x&#x27;&gt;Tom &amp; Jerry&lt;&#x2F;a&gt;"
        );
    }
}
