//! # Dayblocks Core Library
//!
//! This library plans a single day's focused-work calendar from free-form
//! task text. It is the scheduling and validation engine behind the
//! Dayblocks CLI: everything here is synchronous, deterministic, and free
//! of I/O, so the same call can run for many requests in parallel with no
//! coordination.
//!
//! ## Architecture
//!
//! - **Grid**: day-window configuration and snap-to-increment arithmetic
//! - **Extractor**: parses free text into time-anchored fixed commitments
//! - **Availability**: derives the open windows between commitments
//! - **Validator**: stateless rule checks (duration, bounds, overlap)
//! - **Reconciler**: two-pass orchestrator that materializes trusted
//!   commitments and then accepts or rejects untrusted candidate placements
//! - **Proposer**: a pluggable source of candidate placements, with a
//!   deterministic first-fit implementation built in
//!
//! ## Key Components
//!
//! - [`GridConfig`]: explicit day bounds and grid increment
//! - [`CommitmentExtractor`]: text to [`FixedCommitment`] list
//! - [`BlockValidator`]: pure candidate validation
//! - [`Reconciler`]: produces a [`ScheduleResult`] for a whole request
//! - [`ProposalGenerator`]: trait for external placement sources

pub mod availability;
pub mod block;
pub mod error;
pub mod extract;
pub mod grid;
pub mod propose;
pub mod reconcile;
pub mod validate;

pub use availability::{compute_windows, AvailabilityWindow, MAX_DEEP_WORK_MINUTES};
pub use block::{BlockCategory, CandidatePlacement, InvalidBlock, RejectedBlock, ScheduleResult, TimeBlock};
pub use error::{EngineError, ValidationError};
pub use extract::{
    CommitmentExtractor, Extraction, FixedCommitment, Meridiem, RegexTokenizer, TimeToken, TimeTokenizer,
};
pub use grid::GridConfig;
pub use propose::{FirstFitProposer, ProposalGenerator};
pub use reconcile::Reconciler;
pub use validate::{BlockValidator, KeywordDurations};
