use std::error::Error;

use clap::Args;
use dayblocks_core::CommitmentExtractor;

use super::common::{DayArgs, InputArgs};

#[derive(Args, Debug)]
pub struct CommitmentsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub day: DayArgs,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: CommitmentsArgs) -> Result<(), Box<dyn Error>> {
    let grid = args.day.grid()?;
    let text = args.input.read()?;
    let extraction = CommitmentExtractor::new(grid).extract(&text);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&extraction.commitments)?);
        return Ok(());
    }

    for commitment in &extraction.commitments {
        println!(
            "{}-{}  {}{}",
            commitment.time.format("%H:%M"),
            commitment.end_time().format("%H:%M"),
            commitment.task,
            if commitment.is_deadline { " (deadline)" } else { "" },
        );
    }
    if !extraction.flexible.is_empty() {
        println!();
        println!("flexible tasks:");
        for task in &extraction.flexible {
            println!("  {task}");
        }
    }
    Ok(())
}
