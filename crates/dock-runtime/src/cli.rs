use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dock_core::geometry::{PixelSize, WorkspaceBounds};
use dock_core::keybinding::{SHORTCUTS, ShortcutAction};
use dock_layout::{LayoutEngine, LayoutState, PanelId, WorkspaceFrame};
use serde::Serialize;
use tracing::info;

use crate::config::RuntimeConfig;
use crate::error::{DockError, Result};
use crate::file_store::FileStore;
use crate::host::{DockEvent, DockHost};
use crate::logging;
use crate::script::{ReplayReport, parse_script, replay};

#[derive(Debug, Parser)]
#[command(
    name = "dockctl",
    about = "Inspect, replay and reset persisted dockspace layouts",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Runtime config file (TOML).
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Override the layout id from the config.
    #[arg(long, global = true)]
    pub layout: Option<String>,

    /// Override the storage directory from the config.
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the current layout state and rendered frame as JSON.
    Show,

    /// Apply a JSONL event script and print the resulting frame as JSON.
    Replay(ReplayArgs),

    /// Restore the configured initial panel set and persist it.
    Reset,
}

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Script with one event or operation per line.
    pub script: PathBuf,

    /// Initial viewport width in pixels.
    #[arg(long, default_value_t = 1280.0)]
    pub width: f64,

    /// Initial viewport height in pixels.
    #[arg(long, default_value_t = 800.0)]
    pub height: f64,

    /// Start from the initial panels and leave stored layouts untouched.
    #[arg(long)]
    pub ephemeral: bool,
}

#[derive(Debug, Serialize)]
struct ShowOutput<'a> {
    layout_id: &'a str,
    state: &'a LayoutState,
    frame: WorkspaceFrame,
    shortcuts: Vec<ShortcutHelp>,
}

#[derive(Debug, Serialize)]
struct ShortcutHelp {
    keys: String,
    action: ShortcutAction,
    description: &'static str,
}

fn shortcut_help() -> Vec<ShortcutHelp> {
    SHORTCUTS
        .iter()
        .map(|binding| ShortcutHelp {
            keys: binding.chord(),
            action: binding.action,
            description: binding.description,
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct ReplayOutput {
    report: ReplayReport,
    workspace: WorkspaceBounds,
    frame: WorkspaceFrame,
    sizes: Vec<(PanelId, PixelSize)>,
}

impl GlobalArgs {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn runtime_config(&self) -> Result<RuntimeConfig> {
        let mut config = RuntimeConfig::load(self.config.as_deref())?;
        if let Some(layout) = &self.layout {
            config.layout_id.clone_from(layout);
        }
        if let Some(dir) = &self.storage_dir {
            config.storage_dir.clone_from(dir);
        }
        Ok(config)
    }
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.global.runtime_config()?;
    logging::init(&config)?;
    let stdout = io::stdout();
    run(cli.command, &config, &mut stdout.lock())
}

pub fn run(command: Commands, config: &RuntimeConfig, out: &mut dyn Write) -> Result<()> {
    match command {
        Commands::Show => run_show(config, out),
        Commands::Replay(args) => run_replay(&args, config, out),
        Commands::Reset => run_reset(config, out),
    }
}

fn mount(config: &RuntimeConfig) -> Result<LayoutEngine> {
    Ok(LayoutEngine::builder(config.layout_id.clone())
        .config(config.engine.clone())
        .store(FileStore::new(&config.storage_dir))
        .mount(config.panels.iter().cloned())?)
}

fn write_json(out: &mut dyn Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn run_show(config: &RuntimeConfig, out: &mut dyn Write) -> Result<()> {
    let engine = mount(config)?;
    write_json(
        out,
        &ShowOutput {
            layout_id: engine.layout_id(),
            state: engine.state(),
            frame: engine.frame(),
            shortcuts: shortcut_help(),
        },
    )
}

fn run_replay(args: &ReplayArgs, config: &RuntimeConfig, out: &mut dyn Write) -> Result<()> {
    if !args.script.exists() {
        return Err(DockError::MissingPath {
            path: args.script.clone(),
        });
    }
    let steps = parse_script(BufReader::new(File::open(&args.script)?))?;

    let mut config = config.clone();
    if args.ephemeral {
        config.engine.persistence_enabled = false;
    }
    let mut host = DockHost::new(mount(&config)?, WorkspaceBounds::new(args.width, args.height));
    host.handle(&DockEvent::ViewportResize {
        width: args.width,
        height: args.height,
    });
    let report = replay(&mut host, &steps);
    info!(
        script = %args.script.display(),
        events = report.events,
        ops_applied = report.ops_applied,
        ops_rejected = report.ops_rejected.len(),
        "replay finished"
    );

    let workspace = host.workspace();
    let frame = host.engine().frame();
    write_json(
        out,
        &ReplayOutput {
            report,
            workspace,
            sizes: frame.resolve(workspace),
            frame,
        },
    )
}

fn run_reset(config: &RuntimeConfig, out: &mut dyn Write) -> Result<()> {
    let mut engine = mount(config)?;
    engine.reset_layout();
    if let Some(warning) = engine.last_persist_warning() {
        return Err(DockError::exit(3, warning.to_string()));
    }
    info!(layout_id = %engine.layout_id(), "layout reset");
    write_json(out, engine.state())
}
