// src/view/mod.rs
mod report;
mod status_view;

pub use report::{StatusReport, DEFAULT_CITY};
pub use status_view::{ProbeHandle, StatusView};
