use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use dayblocks_core::{CandidatePlacement, FirstFitProposer, Reconciler, ScheduleResult};

use super::common::{DayArgs, InputArgs};

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub day: DayArgs,

    /// JSON file of candidate placements from an external generator;
    /// the built-in first-fit proposer is used when omitted
    #[arg(long)]
    pub candidates: Option<PathBuf>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn Error>> {
    let grid = args.day.grid()?;
    let text = args.input.read()?;
    let reconciler = Reconciler::new(grid);

    let result = match &args.candidates {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let candidates: Vec<CandidatePlacement> = serde_json::from_str(&json)?;
            reconciler.reconcile(&text, &candidates)?
        }
        None => {
            let proposer = FirstFitProposer::new(grid);
            reconciler.plan_day(&text, &proposer)?
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_result(&result)
}

fn print_result(result: &ScheduleResult) -> Result<(), Box<dyn Error>> {
    if result.success {
        for block in result.blocks() {
            println!(
                "{}-{}  {:8} {}",
                block.start_time.format("%H:%M"),
                block.end_time().format("%H:%M"),
                block.category.as_str(),
                block.task,
            );
        }
        return Ok(());
    }

    for invalid in result.invalid_blocks.iter().flatten() {
        eprintln!("  rejected '{}': {}", invalid.block.task, invalid.reason);
    }
    Err(result
        .error
        .clone()
        .unwrap_or_else(|| "schedule rejected".to_string())
        .into())
}
