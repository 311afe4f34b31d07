use std::io::{Write, stdout};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use crossterm::{cursor, execute};
use tracing::debug;

use inspector::config::{Config, load_config, load_config_from_path};
use inspector::logging;
use inspector::procfs::ProcRoot;
use inspector::system::collector::Collector;
use inspector::system::owner::PasswdLookup;
use inspector::system::snapshot::ViewOptions;
use inspector::ui::{live, report};

#[derive(Parser)]
#[command(
    name = "inspector",
    about = "Report system, hardware and task information read from procfs"
)]
struct Cli {
    /// Show every section (same as -r -s -t)
    #[arg(short, long)]
    all: bool,

    /// Show hardware information
    #[arg(short = 'r', long)]
    hardware: bool,

    /// Show system information
    #[arg(short, long)]
    system: bool,

    /// Show task information
    #[arg(short, long)]
    tasks: bool,

    /// Refreshing cpu and memory view; overrides the other views
    #[arg(short, long)]
    live: bool,

    /// Read from an alternate procfs directory
    #[arg(short = 'p', long, value_name = "DIR")]
    procfs_root: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(short, long, conflicts_with = "live")]
    json: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Live view refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    logging::init(&config.logging, cli.verbose)?;

    if cli.procfs_root.is_some() {
        debug!(
            root = %config.general.procfs_root.display(),
            "using alternative proc directory"
        );
    }
    let views = ViewOptions::select(cli.all, cli.hardware, cli.system, cli.tasks, cli.live);
    if views.live && (cli.all || cli.hardware || cli.system || cli.tasks) {
        debug!("live view requested, ignoring other views");
    }
    debug!(?views, "selected views");

    let procfs = ProcRoot::open(&config.general.procfs_root)?
        .with_max_line_len(config.general.max_line_len);

    if views.live {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = execute!(std::io::stdout(), cursor::Show);
            original_hook(panic_info);
        }));

        let refresh = Duration::from_millis(config.general.refresh_interval_ms);
        live::run(procfs, refresh, &mut stdout().lock()).await?;
        return Ok(());
    }

    let sample_interval = Duration::from_millis(config.general.sample_interval_ms);
    let collector = Collector::new(procfs, PasswdLookup::new(), sample_interval);
    let gathered = collector.collect(views);

    let mut out = stdout().lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &gathered)?;
        writeln!(out)?;
    } else {
        report::render(&mut out, &gathered, &config.table)?;
    }
    out.flush()?;
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_interval_ms = rate;
    }
    if let Some(ref root) = cli.procfs_root {
        config.general.procfs_root = root.clone();
    }

    config
}
