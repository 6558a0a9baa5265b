use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::sync::mpsc;

use crate::config::{MonitorConfig, load_storage_config};
use crate::error::Result;
use crate::progress::{PercentListener, ProgressEvent, ProgressMonitor, SharedMonitor, StepBasis};
use crate::storage::{StorageClient, console_reporter};

/// Output format for commands that print progress events
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `progress[/maximum]` line per event
    Human,
    /// One JSON object per event
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "progmon")]
#[command(about = "Step-gated progress reporting for long running transfers", long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub monitor: MonitorArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct MonitorArgs {
    /// Smallest step between two progress events
    #[arg(long, global = true, env = "PROGMON_MIN_STEP", default_value_t = crate::progress::DEFAULT_MIN_STEP_SIZE)]
    pub min_step: u64,

    /// Largest step between two progress events
    #[arg(long, global = true, env = "PROGMON_MAX_STEP", default_value_t = crate::progress::DEFAULT_MAX_STEP_SIZE)]
    pub max_step: u64,

    /// Value the step size is derived from: maximum or progress
    #[arg(long, global = true, env = "PROGMON_STEP_BASIS", default_value = "maximum")]
    pub step_basis: StepBasis,
}

impl From<&MonitorArgs> for MonitorConfig {
    fn from(args: &MonitorArgs) -> Self {
        Self {
            min_step_size: args.min_step,
            max_step_size: args.max_step,
            basis: args.step_basis,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download files from storage
    Get {
        /// Remote file or directory
        remote: String,
        /// Local destination directory
        local: String,
    },
    /// Upload files to storage
    Put {
        /// Local file or directory
        local: String,
        /// Remote destination prefix
        remote: String,
        /// Upload directories recursively
        #[arg(short = 'R', long)]
        recursive: bool,
    },
    /// Print the events a monitor publishes for a run of increments
    Simulate {
        /// Number of increments per pass
        #[arg(long)]
        count: u64,
        /// Maximum value set before the first pass
        #[arg(long)]
        maximum: Option<u64>,
        /// Constant step size, overriding --min-step and --max-step
        #[arg(long)]
        step: Option<u64>,
        /// Number of passes, the monitor is reset between passes
        #[arg(long, default_value_t = 1)]
        passes: u32,
        /// Also print whole percentages (requires --maximum)
        #[arg(long)]
        percent: bool,
        /// Output format for events
        #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },
}

pub async fn run(args: Args) -> Result<()> {
    let monitor_config = MonitorConfig::from(&args.monitor);
    log::debug!("run command={:?} monitor={monitor_config:?}", args.command);

    match args.command {
        Command::Get { remote, local } => {
            let client = StorageClient::new(load_storage_config()?).await?;
            let monitor: SharedMonitor = monitor_config.build()?.into();
            client
                .download_files(&remote, &local, &monitor_with_reporter(monitor, "Downloading"))
                .await?;
        }
        Command::Put {
            local,
            remote,
            recursive,
        } => {
            let client = StorageClient::new(load_storage_config()?).await?;
            let monitor: SharedMonitor = monitor_config.build()?.into();
            client
                .upload_files(
                    &local,
                    &remote,
                    recursive,
                    &monitor_with_reporter(monitor, "Uploading"),
                )
                .await?;
        }
        Command::Simulate {
            count,
            maximum,
            step,
            passes,
            percent,
            format,
        } => {
            let mut monitor = monitor_config.build()?;
            if let Some(step) = step {
                monitor.set_step_size(step)?;
            }
            simulate(monitor, count, maximum, passes, percent, format)?;
        }
    }
    Ok(())
}

fn monitor_with_reporter(monitor: SharedMonitor, label: &str) -> SharedMonitor {
    monitor.add_listener(console_reporter(label));
    monitor
}

fn simulate(
    mut monitor: ProgressMonitor,
    count: u64,
    maximum: Option<u64>,
    passes: u32,
    percent: bool,
    format: OutputFormat,
) -> Result<()> {
    let (tx, rx) = mpsc::channel::<ProgressEvent>();
    monitor.add_listener(move |event: &ProgressEvent| {
        let _ = tx.send(*event);
    });
    if percent {
        monitor.add_listener(PercentListener::new(|pct: &str| println!("{pct}%")));
    }
    if let Some(maximum) = maximum {
        monitor.set_maximum(maximum)?;
    }

    for pass in 1..=passes {
        if pass > 1 {
            monitor.reset();
        }
        for _ in 0..count {
            monitor.increment()?;
            print_events(&rx, format)?;
        }
        monitor.complete();
        print_events(&rx, format)?;
        log::debug!("simulate pass={pass} progress={}", monitor.progress());
    }
    Ok(())
}

fn print_events(rx: &mpsc::Receiver<ProgressEvent>, format: OutputFormat) -> Result<()> {
    for event in rx.try_iter() {
        match format {
            OutputFormat::Human => match event.maximum() {
                Some(maximum) => println!("{}/{maximum}", event.progress()),
                None => println!("{}", event.progress()),
            },
            OutputFormat::Json => println!("{}", serde_json::to_string(&event)?),
        }
    }
    Ok(())
}
