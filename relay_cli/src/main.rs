mod script;
mod simulate;

use std::{fs, path::Path, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use relay_core::GameConfig;

#[derive(Debug, Parser)]
#[command(name = "relay")]
#[command(about = "Record-and-replay rhythm game CLI", long_about = None)]
struct Cli {
    /// Show debug logging (grace-period drops, hits and misses).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    Solo,
    Versus,
}

impl Preset {
    fn config(self) -> GameConfig {
        match self {
            Preset::Solo => GameConfig::solo(),
            Preset::Versus => GameConfig::versus(),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play a scripted timeline of actions and key events.
    Simulate {
        script: PathBuf,
        /// Game config JSON, used instead of the preset config.
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value = "versus")]
        preset: Preset,
        #[arg(long, default_value_t = 16)]
        tick_ms: u64,
    },
    /// Print a preset config as JSON.
    Config {
        #[arg(short, long, value_enum, default_value = "versus")]
        preset: Preset,
    },
    /// Validate a config file.
    CheckConfig { path: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    match cli.command {
        Command::Simulate {
            script,
            config,
            preset,
            tick_ms,
        } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => preset.config(),
            };
            let script = script::load_script_from_path(&script)?;
            info!("simulating {} steps", script.steps.len());

            let mut table = simulate::new_table(preset == Preset::Solo, config);
            let report = simulate::run_simulation(table.as_mut(), &script, tick_ms);
            for line in &report.lines {
                println!("{line}");
            }
            println!("--- {}ms", report.end_ms);
            for line in &report.status {
                println!("{line}");
            }
        }
        Command::Config { preset } => {
            let json = serde_json::to_string_pretty(&preset.config())
                .context("failed to serialize config")?;
            println!("{json}");
        }
        Command::CheckConfig { path } => {
            load_config(&path)?;
            println!("ok: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<GameConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    if let Err(err) = config.validate() {
        warn!("rejecting {}: {err}", path.display());
        return Err(err).with_context(|| format!("invalid config: {}", path.display()));
    }
    Ok(config)
}
