// Tierboard entry point.
//
// Startup sequence:
// 1. Parse arguments, resolve the base directory
// 2. Initialize tracing (log to file, not terminal)
// 3. Load config, copying defaults on first run
// 4. Load the seed roster and build the board
// 5. Fetch the headshot id lookup (best effort)
// 6. Run the command loop on stdin or a script file

use tierboard_app::app::{self, AppState};
use tierboard_app::cli::Args;
use tierboard_app::config;
use tierboard_app::headshots;
use tierboard_app::seed;

use anyhow::Context;
use clap::Parser;
use std::path::Path;
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse arguments
    let args = Args::parse();
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let base_dir = args.base_dir_or(&cwd);

    // 2. Initialize tracing
    init_tracing(&base_dir)?;
    info!("Tierboard starting up in {}", base_dir.display());

    // 3. Load config
    let config = config::load_config(&base_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: {} teams, {}",
        config.board.teams, config.board.draft_style
    );

    // 4. Seed roster
    let players = seed::load_seed(&base_dir, &config.data).context("failed to load seed roster")?;
    let headshot_config = config.headshots.clone();
    let mut state = AppState::new(config, base_dir.clone(), players);

    // 5. Headshot lookup
    if args.no_headshots {
        info!("Headshot lookup skipped (--no-headshots)");
    } else {
        let lookup = headshots::load_lookup(&headshot_config).await;
        state.set_headshot_lookup(lookup);
    }

    // 6. Command loop
    match &args.script {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open script {}", path.display()))?;
            app::run(&mut state, BufReader::new(file), tokio::io::stdout(), false).await?;
        }
        None => {
            println!("Tierboard: {} players. Type `help` for commands.", state.store.len());
            app::run(
                &mut state,
                BufReader::new(tokio::io::stdin()),
                tokio::io::stdout(),
                true,
            )
            .await?;
        }
    }

    info!("Tierboard shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which the command
/// loop owns).
fn init_tracing(base_dir: &Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = base_dir.join("logs");
    std::fs::create_dir_all(&log_dir).context("failed to create log directory")?;

    let log_file =
        std::fs::File::create(log_dir.join("tierboard.log")).context("failed to create log file")?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("tierboard=info,tierboard_app=info,tierboard_core=info,warn")
        }))
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
