use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use sf_cli::{CliResult, compile, load_scenario};

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(about = "SignalFlow CLI - block-diagram simulation tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and build its model
    Validate {
        /// Path to the scenario file (YAML or JSON)
        scenario_path: PathBuf,
    },
    /// List the signals of a scenario's model
    Signals {
        /// Path to the scenario file (YAML or JSON)
        scenario_path: PathBuf,
    },
    /// Run a scenario
    Run {
        /// Path to the scenario file (YAML or JSON)
        scenario_path: PathBuf,
        /// Output file; `.json` for JSON, anything else for CSV (defaults to CSV on stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Signals { scenario_path } => cmd_signals(&scenario_path),
        Commands::Run {
            scenario_path,
            output,
        } => cmd_run(&scenario_path, output.as_deref()),
    }
}

fn cmd_validate(scenario_path: &Path) -> CliResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = load_scenario(scenario_path)?;
    let compiled = compile(&scenario)?;
    println!("✓ Scenario is valid");
    println!("  Blocks: {}", compiled.model.block_count());
    println!("  Instants: {}", compiled.time.len());
    Ok(())
}

fn cmd_signals(scenario_path: &Path) -> CliResult<()> {
    let scenario = load_scenario(scenario_path)?;
    let compiled = compile(&scenario)?;
    let model = &compiled.model;

    println!("Outputs:");
    for name in model.outputs() {
        println!("  {}", name);
    }

    println!("\nExternal inputs:");
    for name in model.external_inputs() {
        let source = if compiled.parameters.contains_key(&name) {
            "parameter"
        } else {
            "input"
        };
        println!("  {} ({})", name, source);
    }
    Ok(())
}

fn cmd_run(scenario_path: &Path, output: Option<&Path>) -> CliResult<()> {
    let scenario = load_scenario(scenario_path)?;
    let mut compiled = compile(&scenario)?;

    let start = Instant::now();
    let history = compiled.simulate()?;
    let elapsed = start.elapsed().as_secs_f64();

    match output {
        Some(path) => {
            match path.extension().and_then(|e| e.to_str()) {
                Some("json") => history.save_json(path)?,
                _ => history.save_csv(path)?,
            }
            println!("✓ Simulation completed: {}", scenario.name);
            if let (Some(t0), Some(t1)) = (history.t.first(), history.t.last()) {
                println!("  Time range: {:.3} - {:.3} s", t0, t1);
            }
            println!("  Instants: {}", history.len());
            println!("  Signals: {}", history.signals.len());
            println!("  Elapsed: {:.3}s", elapsed);
            println!("✓ Exported to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            history.write_csv(&mut lock)?;
            lock.flush()?;
        }
    }
    Ok(())
}
