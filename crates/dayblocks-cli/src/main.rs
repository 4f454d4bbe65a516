use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dayblocks-cli", version, about = "Dayblocks CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a full day from brain-dump text
    Plan(commands::plan::PlanArgs),
    /// Show fixed commitments extracted from text
    Commitments(commands::commitments::CommitmentsArgs),
    /// Show availability windows around fixed commitments
    Windows(commands::windows::WindowsArgs),
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Commitments(args) => commands::commitments::run(args),
        Commands::Windows(args) => commands::windows::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
