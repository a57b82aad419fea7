use clap::Parser;
use ringtape::{
    AutomatonKind, Catalog, ConfigLoader, Layout, RunConfig, Step, Symbol, TuringMachine,
};
use std::error::Error;
use std::io::{self, Read};
use std::path::Path;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  ringtape-cli --machine merge-sort --tape-len 16 --seed 7
  ringtape-cli --machine sieve --tape-len 100
  echo '{\"kind\": \"sieve\", \"tape_len\": 30}' | ringtape-cli")]
struct Cli {
    /// The automaton to run (insertion-sort, merge-sort or sieve)
    #[clap(short, long, value_parser = parse_machine)]
    machine: Option<AutomatonKind>,

    /// Number of cells on the tape
    #[clap(short, long)]
    tape_len: Option<usize>,

    /// Seed for the starting layout of the sorts
    #[clap(short, long)]
    seed: Option<u64>,

    /// Starting order of the hues (shuffled or reversed)
    #[clap(short, long)]
    layout: Option<Layout>,

    /// A JSON run configuration file. Flags override its fields.
    #[clap(short, long)]
    config: Option<String>,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print the final machine as JSON
    #[clap(short = 'j', long)]
    json: bool,

    /// Stop after this many steps even if the machine has not halted
    #[clap(long)]
    max_steps: Option<usize>,

    /// List the available machines and exit
    #[clap(long)]
    list: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if cli.list {
        for index in 0..Catalog::count() {
            let info = Catalog::info(index)?;
            println!(
                "{:<16} {} ({} states, min {} cells)",
                info.name, info.title, info.state_count, info.min_tape_len
            );
        }
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::info!(
        "running {} on {} cells (seed {:?})",
        config.kind,
        config.tape_len,
        config.seed
    );

    let mut machine = TuringMachine::new(&config)?;
    let limit = cli
        .max_steps
        .unwrap_or_else(|| config.kind.step_budget(config.tape_len));

    let outcome = if cli.debug {
        print_state(&machine);
        let mut outcome = Step::Continue;
        for _ in 0..limit {
            outcome = machine.step();
            if outcome == Step::Halt {
                break;
            }
            print_state(&machine);
        }
        if machine.is_halted() {
            Step::Halt
        } else {
            outcome
        }
    } else {
        machine.run(limit)
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&machine.snapshot())?);
        return Ok(());
    }

    match outcome {
        Step::Halt => println!("\nMachine halted after {} steps.", machine.step_count()),
        Step::Continue => println!(
            "\nStopped after {} steps without halting.",
            machine.step_count()
        ),
    }

    if config.kind.is_sort() {
        println!("{}", format_tape(&machine));
        println!("Sorted: {}", machine.is_sorted_up_to_rotation());
    } else {
        let primes: Vec<String> = machine.primes().iter().map(|p| p.to_string()).collect();
        println!("Primes: {}", primes.join(", "));
    }

    Ok(())
}

/// Builds the run configuration from `--config`, piped stdin or defaults, then applies
/// the individual flags on top.
fn load_config(cli: &Cli) -> Result<RunConfig, Box<dyn Error>> {
    let mut config = if let Some(path) = &cli.config {
        ConfigLoader::load_config(Path::new(path))?
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        if buffer.trim().is_empty() {
            RunConfig::default()
        } else {
            ConfigLoader::load_config_from_string(&buffer)?
        }
    } else {
        RunConfig::default()
    };

    if let Some(kind) = cli.machine {
        config.kind = kind;
    }
    if let Some(tape_len) = cli.tape_len {
        config.tape_len = tape_len;
    }
    if let Some(layout) = cli.layout {
        config.layout = layout;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    config.validate()?;
    Ok(config)
}

/// Accepts a machine name or its title, in any case.
fn parse_machine(name: &str) -> Result<AutomatonKind, String> {
    Catalog::kind_by_name(name).map_err(|_| {
        format!(
            "unknown machine '{}', expected one of: {}",
            name,
            Catalog::list_names().join(", ")
        )
    })
}

fn print_state(machine: &TuringMachine) {
    println!(
        "Step: {}, State: {}, Head: {}, Tape: [{}]",
        machine.step_count(),
        machine.automaton().label(),
        machine.tape().head(),
        format_tape(machine)
    );
}

/// The tape read from the head, hues in degrees and flag cells as their bits.
fn format_tape(machine: &TuringMachine) -> String {
    machine
        .tape()
        .cells_from_head()
        .map(|cell| match cell {
            Symbol::Hue(_) => cell.to_string(),
            Symbol::Flags(flags) => format!("{:03b}", flags.bits()),
        })
        .collect::<Vec<String>>()
        .join(", ")
}
