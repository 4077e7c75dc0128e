use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, EnvFilter};
use portfolio_contact::{
    background_task::start_purge_task,
    graceful_shutdown::shutdown_signal,
    repositories::kv_store::KeyValueStore,
    routes::configure_routes,
    settings::AppConfig,
    AppState
};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            init_tracing(false);
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.is_production());
    tracing::info!("Loaded configuration: {:?}", config);

    let app_state = web::Data::new(AppState::new(&config));

    if let Some(store) = app_state.contact_handler.store.as_ref() {
        if let Err(e) = store.ping().await {
            tracing::warn!("KV store is not reachable yet: {}", e);
        }
    }

    if let Some(store) = app_state.memory_store.clone() {
        tokio::spawn(start_purge_task(store));
    }

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "🚀 Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let max_body_bytes = config.max_body_bytes;

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(TracingLogger::default())
            .configure(|cfg| configure_routes(cfg, max_body_bytes))
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}
