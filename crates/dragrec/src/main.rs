//! dragrec entry point.
//!
//! Parses the command line, loads the TOML config, initialises logging, and
//! then either opens the GUI or runs one headless command.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()          -- config.toml, defaults when absent
//!  └─ init_logging()         -- RUST_LOG > --log-level > general.log_level
//!  └─ JsonSettingsStore      -- settings.json
//!  └─ command
//!       ├─ gui    → ui::run(Shell + XcapScreenCapturer + pointer backend)
//!       ├─ show   → print the saved record as JSON
//!       └─ replay → ReplayExecutor, wait for the outcome, exit code
//! ```

use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dragrec::application::replay::{OutcomeReporter, PointerBackend, ReplayExecutor};
use dragrec::application::shell::SettingsRepository;
use dragrec::infrastructure::pointer::{self, mock::MockPointerBackend};
use dragrec::infrastructure::screen_capture::XcapScreenCapturer;
use dragrec::infrastructure::storage::config::{load_config, AppConfig};
use dragrec::infrastructure::storage::settings::{default_settings_path, JsonSettingsStore};
use dragrec::infrastructure::ui::{self, GuiParts};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Select a screen region, record a mouse drag, and replay it.
#[derive(Debug, Parser)]
#[command(name = "dragrec", version)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, env = "DRAGREC_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the JSON settings file (last area and mouse track).
    #[arg(long, env = "DRAGREC_SETTINGS")]
    settings: Option<PathBuf>,

    /// Log simulated pointer actions instead of performing them.
    #[arg(long)]
    dry_run: bool,

    /// Log level when `RUST_LOG` is unset, e.g. `debug`.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
enum Command {
    /// Open the main window (the default).
    Gui,
    /// Print the saved settings as JSON.
    Show,
    /// Replay the saved mouse track without opening a window.
    Replay {
        /// Drag duration in milliseconds; defaults to `replay.duration_ms`.
        #[arg(long)]
        duration_ms: Option<u64>,
    },
}

impl Cli {
    /// `--log-level`, else the config file's level.
    fn log_level<'a>(&'a self, config: &'a AppConfig) -> &'a str {
        self.log_level
            .as_deref()
            .unwrap_or(&config.general.log_level)
    }

    /// `--settings`, else `general.settings_file`, else the platform default.
    fn settings_path(&self, config: &AppConfig) -> anyhow::Result<PathBuf> {
        if let Some(path) = self.settings.as_ref().or(config.general.settings_file.as_ref()) {
            return Ok(path.clone());
        }
        default_settings_path().context("no settings path given and no platform config directory")
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("failed to load config")?;
    init_logging(cli.log_level(&config));

    let settings_path = cli.settings_path(&config)?;
    let store = JsonSettingsStore::open(&settings_path);
    info!(settings = %settings_path.display(), dry_run = cli.dry_run, "dragrec starting");

    match cli.command.as_ref().unwrap_or(&Command::Gui) {
        Command::Gui => run_gui(&config, store, cli.dry_run),
        Command::Show => show(&store),
        Command::Replay { duration_ms } => {
            let duration = duration_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.replay.duration());
            replay(&config, &store, duration, cli.dry_run)
        }
    }
}

/// `RUST_LOG` wins; otherwise `level` is used as the filter.
fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn pointer_backend(dry_run: bool) -> anyhow::Result<Arc<dyn PointerBackend>> {
    if dry_run {
        info!("dry run: pointer actions are logged, not performed");
        return Ok(Arc::new(MockPointerBackend::logging()));
    }
    pointer::open_native().context("could not open the native pointer backend")
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_gui(config: &AppConfig, store: JsonSettingsStore, dry_run: bool) -> anyhow::Result<()> {
    let parts = GuiParts {
        settings: Box::new(store),
        capturer: Arc::new(XcapScreenCapturer::new()),
        backend: pointer_backend(dry_run)?,
        timing: config.replay.timing(),
        options: config.shell_options(),
    };
    ui::run(parts).map_err(|e| anyhow!("GUI failed: {e}"))?;
    info!("dragrec stopped");
    Ok(())
}

fn show(store: &JsonSettingsStore) -> anyhow::Result<()> {
    let json = store
        .record()
        .to_json_pretty()
        .context("failed to serialize settings")?;
    println!("{json}");
    Ok(())
}

fn replay(
    config: &AppConfig,
    store: &JsonSettingsStore,
    duration: Duration,
    dry_run: bool,
) -> anyhow::Result<()> {
    let track = store.record().mouse_track;
    if track.is_unset() {
        bail!(
            "no mouse track recorded yet in {}; record one in the GUI first",
            store.path().display()
        );
    }

    let (tx, rx) = mpsc::channel();
    let reporter: OutcomeReporter = Arc::new(move |outcome| {
        let _ = tx.send(outcome);
    });
    let executor = ReplayExecutor::new(pointer_backend(dry_run)?, config.replay.timing(), reporter);

    info!(%track, ?duration, "replaying mouse track");
    if let Some(worker) = executor.execute(track, duration) {
        if worker.join().is_err() {
            warn!("replay worker ended abnormally");
        }
    }

    let outcome = rx
        .recv()
        .context("replay finished without reporting an outcome")?;
    if !outcome.success {
        bail!("replay failed: {}", outcome.message);
    }
    info!("{}", outcome.message);
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
