//! Exports RescueTime hourly analytics into a per-day table that can be opened in any
//! spreadsheet. The overview and productivity reports are fetched for a date range, pivoted so
//! that every category and productivity score becomes a column, merged by date and written
//! into a delimited file.
//!

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod utils;
