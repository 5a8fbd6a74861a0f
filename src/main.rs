use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use akrotopi_backend::{
    background_task::start_prune_task,
    graceful_shutdown::shutdown_signal,
    middlewares::{cors, security_headers},
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    telemetry::init_tracing,
    AppState,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => {
            init_tracing(&cfg.env);
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            init_tracing(&AppEnvironment::Development);
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = web::Data::new(AppState::new(&config));

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "🚀 Starting {} v{} on {} ({} transport, admin {})",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        app_state.contact_handler.mailer.transport_name(),
        if app_state.admin_handler.is_enabled() { "enabled" } else { "disabled" }
    );

    let app_state_clone = app_state.clone();
    let cors_origins = config.cors_origins();
    let workers = config.worker_count.max(1);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(cors(&cors_origins))
            .wrap(security_headers())
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(workers)
    .bind(server_addr)?
    .run();

    tokio::spawn(start_prune_task(app_state_clone));

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}
