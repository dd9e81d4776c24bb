mod core;
mod logging;
mod tui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::PathBuf;

use crate::core::config::{self, Settings};
use crate::core::export::{self, Format};
use crate::core::generator::{self, Mode, Request};
use crate::core::pattern::FixedPattern;
use crate::core::prefix::Prefix;

#[derive(Parser)]
#[command(name = "telecrafter", version, about = "Generate unique, pattern-constrained phone numbers")]
struct Cli {
    /// Verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate numbers and print or save them
    #[command(alias = "gen")]
    Generate {
        /// Prefix, one of 0301..0349
        #[arg(short, long)]
        prefix: Option<String>,
        /// random, fix-middle or fix-end
        #[arg(short, long)]
        mode: Option<String>,
        /// Up to 5 fixed digits (non-digits are ignored)
        #[arg(long, default_value = "")]
        pattern: String,
        /// How many numbers, clamped to 1..=1000000
        #[arg(short = 'n', long, allow_hyphen_values = true)]
        count: Option<String>,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        /// Output format: txt, csv or json
        #[arg(short, long, default_value = "txt")]
        format: String,
        /// Write phone-numbers.<format> into this directory instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the selectable prefixes
    Prefixes,

    /// Show or change defaults
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// List stored values
    #[command(alias = "ls")]
    List,
    /// Print one value (env vars take priority)
    Get { key: String },
    /// Store a value
    Set { key: String, value: String },
    /// Remove a stored value
    #[command(alias = "rm")]
    Unset { key: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let interactive = cli.command.is_none();
    if let Err(e) = logging::setup(cli.verbose, !interactive) {
        eprintln!("warning: logging disabled: {:#}", e);
    }

    match cli.command {
        None => cmd_form()?,
        Some(Commands::Generate {
            prefix,
            mode,
            pattern,
            count,
            seed,
            format,
            output,
        }) => cmd_generate(GenerateArgs {
            prefix,
            mode,
            pattern,
            count,
            seed,
            format,
            output,
        })?,
        Some(Commands::Prefixes) => cmd_prefixes()?,
        Some(Commands::Config { action }) => cmd_config(action)?,
    }

    Ok(())
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

fn cmd_form() -> Result<()> {
    let settings = Settings::load();
    tui::run(&settings, make_rng(None))
}

struct GenerateArgs {
    prefix: Option<String>,
    mode: Option<String>,
    pattern: String,
    count: Option<String>,
    seed: Option<u64>,
    format: String,
    output: Option<PathBuf>,
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let settings = Settings::load();
    let format = Format::from_str(&args.format)?;

    let req = Request {
        prefix: match args.prefix {
            Some(p) => Prefix::parse(&p)?,
            None => settings.prefix,
        },
        mode: match args.mode {
            Some(m) => Mode::from_str(&m)?,
            None => settings.mode,
        },
        pattern: FixedPattern::sanitize(&args.pattern),
        count: match args.count {
            Some(c) => generator::parse_count(&c),
            None => settings.count,
        },
    };

    log::info!(
        "generating {} numbers: prefix={} mode={} pattern='{}'",
        req.count,
        req.prefix,
        req.mode,
        req.pattern
    );
    let set = generator::generate(&req, &mut make_rng(args.seed))?;

    match args.output {
        Some(dir) => {
            let path = export::download(&set, format, &dir)?;
            println!("Wrote {} numbers to {}", set.len(), path.display());
        }
        None => {
            let out = export::render(&set, format)?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(out.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn cmd_prefixes() -> Result<()> {
    for p in Prefix::all() {
        println!("{}", p);
    }
    Ok(())
}

fn cmd_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::List => {
            let values = config::list();
            if values.is_empty() {
                println!("No config values. Set one with: telecrafter config set <key> <value>");
                println!("Keys: {}", config::KNOWN_KEYS.join(", "));
                return Ok(());
            }
            let mut keys: Vec<&String> = values.keys().collect();
            keys.sort();
            for k in keys {
                println!("{} = {}", k, values[k]);
            }
        }
        ConfigAction::Get { key } => match config::get(&key) {
            Some(v) => println!("{}", v),
            None => anyhow::bail!("'{}' is not set", key),
        },
        ConfigAction::Set { key, value } => {
            config::set(&key, &value)?;
            println!("Set {} = {}", key, value);
        }
        ConfigAction::Unset { key } => {
            config::unset(&key)?;
            println!("Unset {}", key);
        }
    }
    Ok(())
}
