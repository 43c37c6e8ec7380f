use intake_rs::api::{ApiServer, AppState};
use intake_rs::config::Config;
use intake_rs::notify::{NoopNotifier, Notifier, WebhookNotifier};
use intake_rs::spam::{KeywordPreset, ScorerConfig, SpamScorer};
use intake_rs::submissions::SubmissionStore;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = if std::path::Path::new("config.toml").exists() {
        Config::from_file("config.toml")?
    } else {
        Config::default()
    };

    // Initialize logging
    let level = Level::from_str(&config.logging.level).unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder().with_max_level(level);
    if config.logging.format == "json" {
        tracing::subscriber::set_global_default(builder.json().finish())
            .expect("Failed to set tracing subscriber");
    } else {
        tracing::subscriber::set_global_default(builder.pretty().finish())
            .expect("Failed to set tracing subscriber");
    }

    info!("Starting intake-rs server");
    info!("  Listening on: {}", config.server.listen_addr);
    info!("  Database: {}", config.storage.database_url);
    info!("  Spam threshold: {}", config.spam.threshold);

    // Initialize storage
    let options =
        SqliteConnectOptions::from_str(&config.storage.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    let store = SubmissionStore::new(pool);
    store.init_db().await?;
    info!("Submission store initialized");

    // One scorer per public form, sharing the configured threshold
    let contact_scorer = SpamScorer::new(ScorerConfig {
        spam_threshold: config.spam.threshold,
        preset: KeywordPreset::Contact,
    });
    let event_scorer = SpamScorer::new(ScorerConfig {
        spam_threshold: config.spam.threshold,
        preset: KeywordPreset::Event,
    });

    let notifier: Arc<dyn Notifier> = match &config.notify.webhook_url {
        Some(url) => {
            info!("  Notifications relayed to: {}", url);
            Arc::new(WebhookNotifier::new(url.clone()))
        }
        None => {
            info!("  Notifications disabled (no webhook_url)");
            Arc::new(NoopNotifier)
        }
    };

    let state = Arc::new(AppState {
        store,
        contact_scorer,
        event_scorer,
        notifier,
    });

    let server = ApiServer::new(
        state,
        config.server.rate_limit_per_minute,
        config.server.listen_addr.clone(),
    );

    server.run().await?;

    Ok(())
}
