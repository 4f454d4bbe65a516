use std::error::Error;

use clap::Args;
use dayblocks_core::{compute_windows, CommitmentExtractor};

use super::common::{DayArgs, InputArgs};

#[derive(Args, Debug)]
pub struct WindowsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub day: DayArgs,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: WindowsArgs) -> Result<(), Box<dyn Error>> {
    let grid = args.day.grid()?;
    let text = args.input.read()?;
    let extraction = CommitmentExtractor::new(grid).extract(&text);
    let windows = compute_windows(&extraction.commitments, &grid);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&windows)?);
        return Ok(());
    }

    for window in &windows {
        let deep = if window.fits_deep_work() {
            format!("up to {} min deep work", window.max_deep_work_capacity)
        } else {
            "too small for deep work".to_string()
        };
        println!(
            "{}-{}  {} min available ({})",
            window.start.format("%H:%M"),
            window.end.format("%H:%M"),
            window.minutes,
            deep,
        );
    }
    Ok(())
}
