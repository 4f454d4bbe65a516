pub mod commitments;
pub mod common;
pub mod plan;
pub mod windows;
