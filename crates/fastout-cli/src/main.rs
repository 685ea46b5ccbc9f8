use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "fastout", version, about = "FastOut CLI")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Profile and progress overview
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Award points directly
    Points {
        #[command(subcommand)]
        action: commands::points::PointsAction,
    },
    /// Workout logging
    Workout {
        #[command(subcommand)]
        action: commands::workout::WorkoutAction,
    },
    /// Fasting sessions
    Fast {
        #[command(subcommand)]
        action: commands::fast::FastAction,
    },
    /// Premium entitlement status
    Premium {
        #[command(subcommand)]
        action: commands::premium::PremiumAction,
    },
    /// Buy a monthly or yearly subscription
    Subscribe {
        /// Plan to buy (monthly, yearly)
        plan: String,
    },
    /// Mini-game results
    Game {
        #[command(subcommand)]
        action: commands::game::GameAction,
    },
    /// Account sign-in and sign-out
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Discard all saved progress
    Reset,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("FASTOUT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Points { action } => commands::points::run(action),
        Commands::Workout { action } => commands::workout::run(action),
        Commands::Fast { action } => commands::fast::run(action),
        Commands::Premium { action } => commands::premium::run(action),
        Commands::Subscribe { plan } => commands::subscribe::run(&plan),
        Commands::Game { action } => commands::game::run(action),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Reset => commands::reset(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}
