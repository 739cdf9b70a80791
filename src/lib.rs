//! Occupation automation probability explorer.
//!
//! Loads the cumulative (CDF) and incremental (PDF) probability tables,
//! searches them by SOC code or title, keeps a per-session selection,
//! projects the selection into chart series and exports tables as CSV or
//! spreadsheet files.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod export;
pub mod session;
pub mod state;
pub mod ui;
