use clap::{Parser, Subcommand};
use rehab_core::*;
use rehab_api::{server, AppState};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "rehab-portal")]
#[command(about = "Clinician portal for prescribed rehabilitation exercises", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to $XDG_CONFIG_HOME/rehab-portal/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Default log level, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve {
        /// Override listen host
        #[arg(long)]
        host: Option<String>,

        /// Override listen port
        #[arg(long)]
        port: Option<u16>,

        /// Seed the built-in exercise catalog at startup
        #[arg(long)]
        seed: bool,
    },

    /// Write a config file populated with defaults
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate the built-in exercise catalog
    CheckCatalog,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    rehab_core::logging::init_with_level(&cli.log_level)?;

    match cli.command {
        Some(Commands::Serve { host, port, seed }) => {
            cmd_serve(cli.config, host, port, seed).await
        }
        Some(Commands::InitConfig { force }) => cmd_init_config(cli.config, force),
        Some(Commands::CheckCatalog) => cmd_check_catalog(),
        None => {
            // Default to "serve" command
            cmd_serve(cli.config, None, None, false).await
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(&path),
        None => Config::load(),
    }
}

async fn cmd_serve(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    seed: bool,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;

    let store = Arc::new(InMemoryStore::new());
    if seed || config.catalog.seed_defaults {
        get_default_catalog().seed(store.as_ref())?;
    }

    let state = AppState::new(store, config.feedback.locale);
    let listener = server::bind(&config.bind_addr()).await?;
    server::run(listener, state).await?;
    Ok(())
}

fn cmd_init_config(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_config_path()?,
    };

    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    Config::default().save_to(&path)?;
    println!("✓ Wrote default config to {}", path.display());
    Ok(())
}

fn cmd_check_catalog() -> Result<()> {
    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Config("Invalid catalog".into()));
    }

    println!("✓ Catalog OK: {} exercises", catalog.exercises.len());
    for exercise in &catalog.exercises {
        println!(
            "  {} [{}] {} ({} steps)",
            exercise.id,
            exercise.symptom,
            exercise.title,
            exercise.steps.len()
        );
    }
    Ok(())
}
