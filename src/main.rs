use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rothsim::config::Config;
use rothsim::faults::{read_bridges, Fault, FaultSimulator};
use rothsim::graph::Circuit;
use rothsim::report::Summary;
use rothsim::session::Session;
use rothsim::stream::{read_commands, read_test_set, read_vector_file};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Five-valued circuit simulation for stuck-at fault analysis
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file (defaults to the nearest rothsim.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print gate counts and the number of signal lines
    Summary {
        /// Circuit description
        bench: PathBuf,
    },

    /// Evaluate every test of a test set and write the circuit state after each one
    Eval {
        /// Circuit description
        bench: PathBuf,

        /// Test set, one `INDEX INPUTS OUTPUTS` test per line
        testset: PathBuf,

        /// Output file (defaults to [report].state_output, then stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replay a command file against the circuit
    Replay {
        /// Circuit description
        bench: PathBuf,

        /// Command file
        commands: PathBuf,
    },

    /// Serial stuck-at fault simulation
    Faultsim {
        /// Circuit description
        bench: PathBuf,

        /// Vector file
        vectors: PathBuf,

        /// Only enumerate stem faults
        #[arg(long)]
        stems_only: bool,

        /// Stop simulating a fault once it is detected
        #[arg(long)]
        drop_detected: bool,

        /// Only simulate the first N vectors
        #[arg(short = 'n', long)]
        max_vectors: Option<usize>,
    },

    /// List the bridge faults of a bridge file
    Bridges {
        /// Bridge file, one `INDEX SITE1 SITE2 TYPE` bridge per line
        file: PathBuf,
    },

    /// Write the circuit graph in DOT format
    Dot {
        /// Circuit description
        bench: PathBuf,

        /// Output file
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let mut config = Config::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            config.resolve_paths(path.parent().unwrap_or(Path::new(".")));
            config
        }
        None => Config::discover()
            .map(|(config, _)| config)
            .unwrap_or_default(),
    };

    // Set up logging
    let log_level = match (cli.verbose, &config.report.verbose) {
        (0, Some(filter)) => filter.clone(),
        (0, None) => "warn".to_string(),
        (1, _) => "info".to_string(),
        (2, _) => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Summary { bench } => {
            let circuit = load_circuit(&bench)?;
            print!("{}", Summary::of(&circuit));
        }
        Commands::Eval {
            bench,
            testset,
            output,
        } => {
            let output = output.or(config.report.state_output.clone());
            eval(&bench, &testset, output.as_deref())?;
        }
        Commands::Replay { bench, commands } => {
            replay(&bench, &commands)?;
        }
        Commands::Faultsim {
            bench,
            vectors,
            stems_only,
            drop_detected,
            max_vectors,
        } => {
            let branches = !stems_only && config.branch_faults();
            let drop_detected = drop_detected || config.drop_detected();
            let max_vectors = max_vectors.or(config.sim.max_vectors);
            faultsim(&bench, &vectors, branches, drop_detected, max_vectors)?;
        }
        Commands::Bridges { file } => {
            let reader = BufReader::new(open(&file)?);
            let bridges = read_bridges(reader)
                .with_context(|| format!("Failed to read bridges from {}", file.display()))?;
            for bridge in &bridges {
                println!("{}", bridge);
            }
            info!(bridges = bridges.len(), "bridges read");
        }
        Commands::Dot { bench, out } => {
            let circuit = load_circuit(&bench)?;
            let file = File::create(&out)
                .with_context(|| format!("Failed to create {}", out.display()))?;
            circuit
                .to_dot(BufWriter::new(file))
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("Wrote {} gates to {}", circuit.len(), out.display());
        }
    }

    Ok(())
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn load_circuit(path: &Path) -> Result<Circuit> {
    let circuit = Circuit::from_path(path)
        .with_context(|| format!("Failed to load circuit {}", path.display()))?;
    info!(
        gates = circuit.len(),
        inputs = circuit.inputs().len(),
        outputs = circuit.output_indices().len(),
        "circuit loaded"
    );
    Ok(circuit)
}

fn eval(bench: &Path, testset: &Path, output: Option<&Path>) -> Result<()> {
    let mut circuit = load_circuit(bench)?;
    let tests = read_test_set(BufReader::new(open(testset)?))
        .with_context(|| format!("Failed to read test set {}", testset.display()))?;

    let mut w: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut mismatches = 0;
    for (i, test) in tests.iter().enumerate() {
        circuit.reset_values();
        circuit
            .set_inputs(&test.inputs)
            .with_context(|| format!("Test {} doesn't fit the circuit", i))?;
        circuit.evaluate()?;

        let outputs: Vec<_> = circuit.outputs().collect();
        if outputs != test.outputs {
            mismatches += 1;
            warn!(test = i, ?outputs, expected = ?test.outputs, "outputs differ");
        }
        circuit.write_state(&mut w)?;
    }
    w.flush()?;

    if mismatches > 0 {
        bail!("{} of {} tests didn't produce the expected outputs", mismatches, tests.len());
    }
    info!(tests = tests.len(), "all tests passed");
    Ok(())
}

fn replay(bench: &Path, commands: &Path) -> Result<()> {
    let circuit = load_circuit(bench)?;
    let commands = read_commands(BufReader::new(open(commands)?))
        .with_context(|| format!("Failed to read commands from {}", commands.display()))?;
    debug!(commands = commands.len(), "commands read");

    let mut session = Session::new(circuit);
    for command in &commands {
        let response = session
            .apply(command)
            .with_context(|| format!("Failed to apply `{}`", command))?;
        println!("{}", response);
    }
    Ok(())
}

fn faultsim(
    bench: &Path,
    vectors: &Path,
    branches: bool,
    drop_detected: bool,
    max_vectors: Option<usize>,
) -> Result<()> {
    let mut circuit = load_circuit(bench)?;
    let file = read_vector_file(BufReader::new(open(vectors)?))
        .with_context(|| format!("Failed to read vectors from {}", vectors.display()))?;
    let mut vectors = file
        .ordered_for(&circuit)
        .context("Vectors don't fit the circuit")?;
    if let Some(max) = max_vectors {
        vectors.truncate(max);
    }

    let faults = Fault::enumerate(&circuit, branches);
    info!(faults = faults.len(), vectors = vectors.len(), "simulating");
    let coverage = FaultSimulator::new(faults)
        .drop_detected(drop_detected)
        .run(&mut circuit, &vectors)?;
    print!("{}", coverage);
    Ok(())
}
