//! Shared argument groups for the day window and text input.

use std::error::Error;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use dayblocks_core::GridConfig;

#[derive(Args, Debug)]
pub struct DayArgs {
    /// First hour of the working day
    #[arg(long, default_value_t = 8)]
    pub day_start: u32,

    /// Last hour of the working day (exclusive)
    #[arg(long, default_value_t = 20)]
    pub day_end: u32,

    /// Grid increment in minutes
    #[arg(long, default_value_t = 30)]
    pub increment: i64,
}

impl DayArgs {
    pub fn grid(&self) -> Result<GridConfig, Box<dyn Error>> {
        Ok(GridConfig::new(self.day_start, self.day_end, self.increment)?)
    }
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Brain-dump text passed inline
    #[arg(long)]
    pub text: Option<String>,

    /// Read brain-dump text from a file
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,
}

impl InputArgs {
    /// Inline text, file contents, or stdin, in that order.
    pub fn read(&self) -> Result<String, Box<dyn Error>> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        if let Some(path) = &self.file {
            return Ok(std::fs::read_to_string(path)?);
        }
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}
