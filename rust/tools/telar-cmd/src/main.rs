use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "telar-cmd")]
#[command(about = "Command-line utility for Telar dataset operations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a dataset and display summary information
    Inspect {
        /// Increase verbosity (-v lists collection declarations)
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,

        /// Dataset file(s), chained in the given order
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Dump frames of a category as JSON
    Dump {
        /// Category to read
        #[arg(short, long)]
        category: String,

        /// First entry to dump
        #[arg(long, default_value_t = 0)]
        start: u64,

        /// Maximum number of entries to dump
        #[arg(short = 'n', long, default_value_t = 10)]
        count: u64,

        /// Dataset file(s), chained in the given order
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// List datamodel definitions stored in a dataset
    Datamodels {
        /// Print the full definition text of this datamodel
        #[arg(long)]
        name: Option<String>,

        /// Dataset file(s), chained in the given order
        #[arg(required = true)]
        files: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { verbose, files } => commands::inspect::run(verbose, files),
        Commands::Dump {
            category,
            start,
            count,
            files,
        } => commands::dump::run(category, start, count, files),
        Commands::Datamodels { name, files } => commands::datamodels::run(name, files),
    }
}
