pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers the `/auth` and `/tasks` scopes. The task scope is guarded by
/// [`AuthMiddleware`]; both `SessionAuthority` and `TaskStore` must be
/// registered as `web::Data`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login)
                .service(auth::refresh)
                .service(auth::logout),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::list_tasks)
                .service(tasks::create_task)
                .service(tasks::delete_task),
        );
}

/// Reports unparsable or incomplete JSON bodies as a 400 with the usual error body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        log::debug!("rejected JSON payload: {}", err);
        AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    })
}
