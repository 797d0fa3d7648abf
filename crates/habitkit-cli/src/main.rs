use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "habitkit", version, about = "Habit tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Open habit instances and completion
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Streak analytics
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Streak { action } => commands::streak::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
