use actix_web::{App, HttpServer, middleware::from_fn, web};
use anyhow::Context;
use sitedrop_web::config::{AppConfig, ProviderEnv};
use sitedrop_web::{AppState, configure, logging, middleware::request_span};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load_default()?;
    let _log_guard = logging::init(&config.log)?;

    let env = ProviderEnv::from_env()?;
    tracing::debug!(?env, "Loaded provider environment");

    let state = web::Data::new(AppState::from_config(&config, &env)?);

    let bind = config.bind_address();
    tracing::info!("sitedrop listening on {bind} with {} workers", config.workers());

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(from_fn(request_span))
            .configure(configure)
    })
    .workers(config.workers())
    .bind(&bind)
    .with_context(|| format!("Failed to bind {bind}"))?
    .run()
    .await
    .context("Server error")
}
