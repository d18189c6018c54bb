use mimalloc::MiMalloc;
use sentimind::classifier::{Classifier, LinearModel};
use sentimind::config::Config;
use sentimind::db::Database;
use sentimind::feed::FeedAdapter;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        model_path = %cfg.classifier.model_path.display(),
        admins = cfg.admin.usernames.len(),
        feed_enabled = cfg.feed.credentials().is_some(),
        loglevel = %cfg.basic.loglevel
    );

    let db = Database::connect(&cfg.basic.database_url).await?;

    // Loaded once and shared for the process lifetime.
    let model = LinearModel::load(&cfg.classifier.model_path)?;
    let classifier = Classifier::new(Arc::new(model), cfg.classifier.confidence);

    let feed = FeedAdapter::from_config(&cfg.feed)?;

    let state = sentimind::SentimindState::new(&db, classifier, feed, &cfg)?;
    let app = sentimind::sentimind_router(state);

    let listener = TcpListener::bind(&cfg.basic.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.basic.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
