//! Capacity metrics from Oracle AWR (html) and Statspack (text) reports.
//!
//! Every report of a batch becomes one global row, plus one row per
//! instance for cluster reports, with a fixed set of columns.

pub mod awr;
pub mod calc;
pub mod config;
pub mod error;
pub mod export;
pub mod markup;
pub mod patterns;
pub mod pipeline;
pub mod rac;
pub mod record;
pub mod sidedata;
pub mod sqlclass;
pub mod staticdata;
pub mod statspack;
pub mod tools;
pub mod value;

pub use awr::SqlSource;
pub use pipeline::{run, InputFile, Options};
pub use record::{DatabaseRecord, Status};
