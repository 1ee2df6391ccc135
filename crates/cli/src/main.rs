//! VPI simulation driver CLI.
//!
//! This binary boots the simulation kernel and runs a design to completion. It performs:
//! 1. **Run:** Instantiate a built-in design, bootstrap the clock generator and probes,
//!    and drive the fixed callback-and-eval loop until finish or the step limit.
//! 2. **Dump:** Print the scope and signal hierarchy of a design and exit.
//!
//! Arguments after the options are forwarded verbatim to the kernel, so plusargs such
//! as `+vpisim+debugi+2` reach client routines through `vlog_info`.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use vpisim_core::common::constants::TOP_SCOPE;
use vpisim_core::config::{Config, DesignKind};
use vpisim_core::design::{self, Counter, MatrixMultiplier};
use vpisim_core::sim::clock::clock_routine;
use vpisim_core::sim::diag::{internals_dump, probe_routine};
use vpisim_core::sim::{CommandArgs, Kernel, RunSummary, SimulationDriver};
use vpisim_core::vpi::StartupTable;
use vpisim_core::SimError;

#[derive(Parser, Debug)]
#[command(
    name = "vpisim",
    author,
    version,
    about = "VPI-style simulation driver",
    long_about = "Boot the simulation kernel, bootstrap client routines, and drive the callback-and-eval loop until the design finishes.\n\nExamples:\n  vpisim run --design counter --finish-at 100\n  vpisim run --design matrix --max-steps 50 --probe TOP.matrix_multiplier.o_valid\n  vpisim run --config run.json -- +vpisim+debugi+2\n  vpisim dump --design matrix"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a design until it finishes or hits the step limit.
    Run(RunArgs),

    /// Print the scope and signal hierarchy of a design.
    Dump(DesignArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum DesignArg {
    /// Free-running counter.
    Counter,
    /// Registered matrix multiplier.
    Matrix,
}

impl From<DesignArg> for DesignKind {
    fn from(arg: DesignArg) -> Self {
        match arg {
            DesignArg::Counter => Self::Counter,
            DesignArg::Matrix => Self::MatrixMultiplier,
        }
    }
}

#[derive(Args, Debug)]
struct DesignArgs {
    /// JSON configuration file; flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Built-in design to instantiate.
    #[arg(short, long, value_enum)]
    design: Option<DesignArg>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    design: DesignArgs,

    /// Stop after this many evaluation steps.
    #[arg(long)]
    max_steps: Option<u64>,

    /// Counter value at which the counter design finishes.
    #[arg(long)]
    finish_at: Option<u64>,

    /// Kernel debug verbosity (0-9).
    #[arg(long)]
    debug: Option<u8>,

    /// Log the scope and signal hierarchy before bootstrapping.
    #[arg(long)]
    internals_dump: bool,

    /// Signal driven by the clock generator (defaults to the design's clk).
    #[arg(long, conflicts_with = "no_clock")]
    clock: Option<String>,

    /// Ticks between clock toggles.
    #[arg(long)]
    half_period: Option<u64>,

    /// Do not drive any clock.
    #[arg(long)]
    no_clock: bool,

    /// Read a signal at start of simulation; repeatable. A missing signal is fatal.
    #[arg(long)]
    probe: Vec<String>,

    /// Print dispatch statistics after the run.
    #[arg(long)]
    stats: bool,

    /// Arguments forwarded verbatim to the kernel.
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Run(opts) => cmd_run(opts),
        Commands::Dump(opts) => cmd_dump(&opts),
    };
    process::exit(code);
}

/// Loads the configuration file (if any) and applies the design selection.
fn load_config(opts: &DesignArgs) -> Result<Config, SimError> {
    let mut config = match &opts.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(kind) = opts.design {
        config.design.kind = kind.into();
    }
    Ok(config)
}

/// Installs the log subscriber. `RUST_LOG` takes precedence over the debug level.
fn init_logging(debug_level: u8) {
    let default = match debug_level {
        0 => "warn",
        1 => "info",
        2 | 3 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Default clock signal of a built-in design.
fn default_clock(kind: DesignKind) -> String {
    let scope = match kind {
        DesignKind::Counter => Counter::SCOPE,
        DesignKind::MatrixMultiplier => MatrixMultiplier::SCOPE,
    };
    format!("{TOP_SCOPE}.{scope}.clk")
}

/// Kernel argv: program name followed by the forwarded arguments.
fn kernel_args(forwarded: Vec<String>) -> CommandArgs {
    let program = std::env::args().next().unwrap_or_else(|| "vpisim".to_string());
    CommandArgs::parse(std::iter::once(program).chain(forwarded))
}

/// Runs a design; returns the process exit code.
fn cmd_run(opts: RunArgs) -> i32 {
    let mut config = match load_config(&opts.design) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[!] FATAL: {e}");
            return 1;
        }
    };
    if let Some(max) = opts.max_steps {
        config.general.max_steps = Some(max);
    }
    if let Some(limit) = opts.finish_at {
        config.design.counter.finish_at = Some(limit);
    }
    if let Some(level) = opts.debug {
        config.general.debug = level;
    }
    config.general.internals_dump |= opts.internals_dump;
    if let Some(half) = opts.half_period {
        config.clock.half_period = half;
    }
    if opts.no_clock {
        config.clock.signal = None;
    } else if let Some(signal) = opts.clock {
        config.clock.signal = Some(signal);
    } else if config.clock.signal.is_none() {
        config.clock.signal = Some(default_clock(config.design.kind));
    }

    let args = kernel_args(opts.args);
    init_logging(args.debug_level().unwrap_or(config.general.debug));

    match run(&config, args, opts.probe) {
        Ok(summary) => {
            println!(
                "[*] Simulation complete: {} steps, time {} ({:?})",
                summary.steps, summary.final_time, summary.stop
            );
            if opts.stats {
                summary.stats.print();
            }
            0
        }
        Err(e) => {
            error!("{e}");
            eprintln!("[!] FATAL: {e}");
            1
        }
    }
}

fn run(config: &Config, args: CommandArgs, probes: Vec<String>) -> Result<RunSummary, SimError> {
    let design = design::build(&config.design)?;
    let driver = SimulationDriver::new(design, args, &config.general)?;

    let mut table = StartupTable::new();
    if let Some(signal) = &config.clock.signal {
        table.push(clock_routine(signal.clone(), config.clock.half_period));
    }
    if !probes.is_empty() {
        table.push(probe_routine(probes));
    }

    driver.run(table)
}

/// Prints a design's hierarchy; returns the process exit code.
fn cmd_dump(opts: &DesignArgs) -> i32 {
    let dump = load_config(opts)
        .and_then(|config| design::build(&config.design))
        .and_then(|design| Kernel::new(design, kernel_args(Vec::new())))
        .and_then(|kernel| internals_dump(&kernel));
    match dump {
        Ok(text) => {
            print!("{text}");
            0
        }
        Err(e) => {
            eprintln!("[!] FATAL: {e}");
            1
        }
    }
}
