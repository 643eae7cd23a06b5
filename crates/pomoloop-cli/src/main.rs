use clap::{Parser, Subcommand};
use pomoloop_core::Settings;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pomoloop", version, about = "Looping work/break interval timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the timer live in this terminal
    Run,
    /// Print the timer state for the saved configuration as JSON
    Status,
    /// List every phase of one loop
    Preview,
    /// Timer configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Application settings
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(settings) => {
            init_tracing(&settings);
            settings
        }
        Err(e) => {
            let settings = Settings::default();
            init_tracing(&settings);
            tracing::warn!("using default settings: {e}");
            settings
        }
    };

    let result = match cli.command {
        Commands::Run => commands::timer::run_live(&settings),
        Commands::Status => commands::timer::status(&settings),
        Commands::Preview => commands::timer::preview(&settings),
        Commands::Config { action } => commands::config::run(action, &settings),
        Commands::Settings { action } => commands::settings::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
