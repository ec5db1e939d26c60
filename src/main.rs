use anyhow::Context;
use clap::{ArgAction, Parser};
use sketch_dispatch::config::Config;
use sketch_dispatch::input::DispatcherSettings;
use sketch_dispatch::replay::{self, Trace};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sketch-dispatch")]
#[command(version, about = "Controller input dispatcher for VR bezier surface sketching")]
struct Cli {
    /// Replay a TOML event trace against headless collaborators
    #[arg(long, short = 'r', value_name = "TRACE")]
    replay: Option<PathBuf>,

    /// Print the replay report as JSON instead of text
    #[arg(long, action = ArgAction::SetTrue, requires = "replay")]
    json: bool,

    /// Use this config file instead of ~/.config/sketch-dispatch/config.toml
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long, action = ArgAction::SetTrue)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    if let Some(trace_path) = &cli.replay {
        let settings = DispatcherSettings::from_config(&config)?;
        let trace = Trace::load(trace_path)?;
        log::info!(
            "Replaying {} events (world file: {})",
            trace.events.len(),
            settings.world_path.display()
        );

        let report = replay::run(&trace, settings);
        if cli.json {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize replay report")?;
            println!("{json}");
        } else {
            print!("{}", report.to_text());
        }

        let errors = report.error_count();
        if errors > 0 {
            log::warn!("{errors} event(s) reported errors during replay");
        }
        return Ok(());
    }

    println!("sketch-dispatch: Controller input dispatcher for VR bezier surface sketching");
    println!();
    println!("Usage:");
    println!("  sketch-dispatch --replay <TRACE>          Replay an event trace");
    println!("  sketch-dispatch --replay <TRACE> --json   Replay and print JSON");
    println!("  sketch-dispatch --print-config            Show the effective config");
    println!("  sketch-dispatch --help                    Show help");
    println!();
    println!("Trace format (TOML):");
    println!("  [[event]]");
    println!("  kind = \"button\"");
    println!("  action = \"toggle_tool\"");
    println!("  source = \"left_hand\"");
    println!("  edge = \"down\"");

    Ok(())
}
