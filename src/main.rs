use std::sync::Arc;

use ticket_triage::analyzer::{Lexicon, TicketAnalyzer};
use ticket_triage::api::{self, AppState};
use ticket_triage::config::{APP_NAME, APP_VERSION, ServerConfig};
use ticket_triage::error::Result;
use ticket_triage::service::TicketService;
use ticket_triage::store::{LibSqlBackend, TicketStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;

    eprintln!("🎫 {} v{}", APP_NAME, APP_VERSION);

    // ── Lexicon ──────────────────────────────────────────────────────────
    let lexicon = match &config.lexicon_path {
        Some(path) => {
            let lexicon = Lexicon::load(path)?;
            eprintln!("   Lexicon: {}", path.display());
            lexicon
        }
        None => {
            eprintln!("   Lexicon: built-in");
            Lexicon::builtin()
        }
    };
    let analyzer = Arc::new(TicketAnalyzer::new(Arc::new(lexicon)));

    // ── Database ─────────────────────────────────────────────────────────
    let store: Arc<dyn TicketStore> = Arc::new(
        LibSqlBackend::new_local(&config.db_path)
            .await
            .unwrap_or_else(|e| {
                eprintln!(
                    "Error: Failed to open database at {}: {}",
                    config.db_path.display(),
                    e
                );
                std::process::exit(1);
            }),
    );
    eprintln!("   Database: {}", config.db_path.display());

    // ── HTTP ─────────────────────────────────────────────────────────────
    let state = AppState {
        service: Arc::new(TicketService::new(analyzer, store)),
        max_message_chars: config.max_message_chars,
    };
    let app = api::app(state, &config.cors_origins);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    eprintln!("   API: http://{}/tickets", addr);
    eprintln!("   CORS: {}\n", config.cors_origins.join(", "));

    tracing::info!(addr = %addr, "Ticket API server started");
    axum::serve(listener, app).await?;

    Ok(())
}
