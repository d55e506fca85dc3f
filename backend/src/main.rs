mod analysis;
mod config;
mod error;
mod inference;
mod recommendations;
mod routes;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use analysis::Analyzer;
use config::AppConfig;
use inference::{load_classifier, ClassifierConfig};
use routes::configure_routes;
use std::env;

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    log::error!("{}: {}", context, err);
    std::io::Error::other(format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    }

    let config = AppConfig::from_env().map_err(|e| startup_error("Invalid configuration", e))?;
    let classifier_config = ClassifierConfig::load(&config.classifier_config)
        .map_err(|e| startup_error("Invalid classifier configuration", e))?;

    log::info!("Pre-loading skin condition model from {}", config.model_path.display());
    let classifier = load_classifier(&config.model_path, &classifier_config)
        .map_err(|e| startup_error("Model loading failed", e))?;
    log::info!("Model loaded successfully");

    let entries = recommendations::init();
    log::info!("Recommendation table ready ({} conditions)", entries);

    let analyzer = Analyzer::new(classifier, classifier_config);
    let frontend_dir = config.frontend_dir.clone();
    let bind_address = config.bind_address();

    log::info!("Serving frontend from {}", frontend_dir.display());
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(analyzer.clone()))
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
