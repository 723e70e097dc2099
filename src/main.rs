mod config;
mod dto;
mod handler;
mod relay;
mod service;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use std::sync::Arc;

use relay::SmtpRelay;
use service::ContactService;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt().init();

    // Load config
    let cfg = config::load_config().expect("failed to locate or load config");
    tracing::info!("Successfully loaded portfolio backend config");

    // Setup relay and service
    let smtp = SmtpRelay::new(
        cfg.smtp_relay.clone(),
        cfg.smtp_port,
        cfg.smtp_username.clone(),
        cfg.smtp_pass.clone(),
    );
    let service = ContactService::new(cfg.sender.clone(), cfg.receiver.clone(), Arc::new(smtp));
    let service_ptr = Arc::new(service);

    // Setup router
    let router = Router::new()
        .route("/contact", post(handler::contact))
        .route("/", get(handler::api_info))
        .with_state(service_ptr)
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", cfg.port))
        .await
        .expect("Failed to bind to address");
    let addr = listener.local_addr().unwrap();

    tracing::info!("Portfolio backend starting, listening on {}", addr);

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}
