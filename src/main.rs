use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;

use tasklock::config::Config;
use tasklock::routes::{self, health};
use tasklock::{SessionAuthority, TaskStore};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    // All state lives in memory and is lost when the process exits.
    let authority = web::Data::new(SessionAuthority::in_memory(&config.auth));
    let tasks = web::Data::new(TaskStore::in_memory(&config.encryption_key));

    log::info!("Starting tasklock server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(authority.clone())
            .app_data(tasks.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
