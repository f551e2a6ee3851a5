// Draft tracker entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config (copying defaults on first run)
// 3. Open database, resolve the draft session id
// 4. Load the player catalog (CSV import or HTTP fetch)
// 5. Initialize DraftState, replay any logged picks
// 6. Create mpsc channels, build clients
// 7. Spawn app logic task
// 8. Run the TUI event loop (blocks until quit)
// 9. Cleanup on exit

use std::path::PathBuf;
use std::sync::Arc;

use draft_tracker::advisor;
use draft_tracker::app;
use draft_tracker::catalog;
use draft_tracker::config;
use draft_tracker::db;
use draft_tracker::draft;
use draft_tracker::store;
use draft_tracker::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Draft tracker starting up");

    // 2. Load config, seeding config/ from defaults/ on first run
    let base_dir = std::env::current_dir().context("failed to resolve working directory")?;
    let created = config::ensure_config_files(&base_dir)?;
    for path in &created {
        info!("Created default config file: {}", path.display());
    }
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams, user slot {}",
        config.league.name, config.league.num_teams, config.league.user_slot
    );

    // 3. Open database and resolve the draft session id
    let db = db::Database::open(&config.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.db_path);

    let draft_id = match db.get_draft_id()? {
        Some(id) => {
            info!("Resuming draft session {id}");
            id
        }
        None => {
            let id = db::Database::generate_draft_id();
            db.set_draft_id(&id)?;
            info!("Started draft session {id}");
            id
        }
    };

    // 4. Load the player catalog
    let players = load_players(&config).await?;
    info!("Loaded {} players", players.len());

    // 5. Initialize DraftState
    let teams = draft::Team::build_teams(config.league.num_teams, config.league.user_slot);
    let roster_rules = draft::RosterRules::from_config(&config.league.roster);
    let draft_state = draft::DraftState::new(teams, roster_rules, players);
    info!(
        "Draft board built: {} picks over {} teams",
        draft_state.total_picks(),
        config.league.num_teams
    );

    // 6. Create mpsc channels and build clients
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (advice_tx, advice_rx) = mpsc::channel(32);
    let (save_tx, save_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let advisor_client = advisor::RecommendationClient::from_config(&config);
    match &advisor_client {
        advisor::RecommendationClient::Active(_) => info!("Advisor client initialized"),
        advisor::RecommendationClient::Disabled => info!("Advisor client disabled"),
    }

    let doc_store: Option<Arc<dyn store::DocumentStore>> = if config.store.enabled {
        info!("Hosted store enabled at {}", config.store.base_url);
        Some(Arc::new(store::HttpDocumentStore::new(
            config.store.base_url.clone(),
        )))
    } else {
        info!("Hosted store disabled");
        None
    };

    let mut app_state = app::AppState::new(
        config,
        draft_state,
        db,
        draft_id,
        doc_store,
        advisor_client,
        advice_tx,
        save_tx,
    );

    // Replay any picks logged before a crash/restart
    match app::recover_from_db(&mut app_state) {
        Ok(0) => info!("Starting fresh draft session"),
        Ok(n) => info!("Draft state restored: {n} picks replayed"),
        Err(e) => {
            error!("Crash recovery failed: {e}");
            return Err(e.context("crash recovery failed"));
        }
    }

    // 7. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, advice_rx, save_rx, ui_tx, app_state).await {
            error!("Application loop error: {e}");
        }
    });

    // 8. Run the TUI event loop (blocks until the user quits)
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {e}");
    }

    // 9. Cleanup: wait for the app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Draft tracker shut down cleanly");
    Ok(())
}

/// Load the player pool: a local rankings CSV when configured, otherwise the
/// stats API.
async fn load_players(config: &config::Config) -> anyhow::Result<Vec<draft::Player>> {
    if let Some(csv_path) = &config.catalog.rankings_csv {
        info!("Importing rankings from {csv_path}");
        return catalog::import_rankings_csv(std::path::Path::new(csv_path))
            .context("failed to import rankings CSV");
    }

    info!("Fetching player catalog from {}", config.catalog.base_url);
    let client = catalog::PlayerCatalog::new(config.catalog.base_url.clone());
    client
        .list_players(&catalog::CatalogQuery::default())
        .await
        .context("failed to fetch player catalog")
}

/// Initialize tracing to log to a file (not the terminal, which is used by
/// the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("draft-tracker.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draft_tracker=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

/// Per-user log directory, falling back to ./logs when the platform dirs
/// cannot be resolved.
fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "gridboard")
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
