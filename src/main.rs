use std::sync::Arc;

use goodgeeks_api::chat::ChatClient;
use goodgeeks_api::config::AppConfig;
use goodgeeks_api::intake::ContactPipeline;
use goodgeeks_api::notify::{EmailNotifier, Notifier, WhatsAppNotifier};
use goodgeeks_api::routes::{AppState, api_routes};
use goodgeeks_api::store::{LibSqlBackend, Store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;

    eprintln!("🛠  GoodGeeks API v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Listening: http://0.0.0.0:{}", config.port);
    eprintln!("   Database: {}", config.db_path);
    eprintln!(
        "   Email notifications: {}",
        if config.email.is_some() { "enabled" } else { "disabled" }
    );
    eprintln!(
        "   WhatsApp providers: twilio={}, cloud={}",
        if config.twilio.is_some() { "on" } else { "off" },
        if config.whatsapp_cloud.is_some() { "on" } else { "off" },
    );
    eprintln!(
        "   Chat proxy: {}\n",
        if config.chat.is_some() { "enabled" } else { "disabled" }
    );

    // ── Database ─────────────────────────────────────────────────────
    let db_path = std::path::Path::new(&config.db_path);
    let store: Arc<dyn Store> = Arc::new(
        LibSqlBackend::new_local(db_path).await.unwrap_or_else(|e| {
            eprintln!("Error: Failed to open database at {}: {}", config.db_path, e);
            std::process::exit(1);
        }),
    );

    // ── Notifiers ────────────────────────────────────────────────────
    let email = Arc::new(EmailNotifier::new(config.email.clone()));
    let whatsapp: Arc<dyn Notifier> = Arc::new(WhatsAppNotifier::new(
        config.twilio.clone(),
        config.whatsapp_cloud.clone(),
    ));

    // ── Pipeline + routes ────────────────────────────────────────────
    let email_notifier: Arc<dyn Notifier> = email.clone();
    let pipeline = Arc::new(ContactPipeline::new(
        Arc::clone(&store),
        email_notifier,
        whatsapp,
    ));

    let chat = config.chat.clone().map(|c| Arc::new(ChatClient::new(c)));

    let app = api_routes(AppState {
        pipeline,
        store,
        email,
        chat,
    });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "API server started");
    axum::serve(listener, app).await?;

    Ok(())
}
