mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_CONFIG_ERROR, EXIT_FAILURE};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "stratum",
    version,
    about = "Instance dispatch and device validation for container and VM backends"
)]
struct Cli {
    /// Host configuration (storage pools, networks, profiles, OS support).
    #[arg(long, global = true)]
    host: Option<PathBuf>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate the devices of an instance definition.
    Validate {
        /// Path to the instance definition TOML file.
        instance: PathBuf,
        /// Apply profiles first and require exactly one root disk.
        #[arg(long, default_value_t = false)]
        expanded: bool,
    },
    /// Create an instance and print its expanded configuration.
    Create {
        /// Path to the instance definition TOML file.
        instance: PathBuf,
    },
    /// Load an existing instance definition and print its expanded configuration.
    Load {
        /// Path to the instance definition TOML file.
        instance: PathBuf,
    },
    /// Show the root disk of an instance once its profiles are applied.
    RootDisk {
        /// Path to the instance definition TOML file.
        instance: PathBuf,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("STRATUM_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let host = cli.host.as_deref();
    let json = cli.json;

    let result = match cli.command {
        Commands::Validate { instance, expanded } => {
            commands::validate::run(host, &instance, expanded, json)
        }
        Commands::Create { instance } => commands::create::run(host, &instance, json),
        Commands::Load { instance } => commands::load::run(host, &instance, json),
        Commands::RootDisk { instance } => commands::root_disk::run(host, &instance, json),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("config error:") {
                EXIT_CONFIG_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
