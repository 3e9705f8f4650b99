//! Core types for jjprep.
//!
//! This crate provides the shared pieces used by jjprep-cli:
//! - `plan` for generated prep plans and their on-disk JSON format
//! - `date` for local calendar-date arithmetic
//! - `preview` for projecting a plan onto concrete dates
//! - `protocol` for the calendar API wire types

pub mod date;
pub mod error;
pub mod plan;
pub mod preview;
pub mod protocol;

pub use error::{PlanError, PlanResult};
