//! Solar Dashboard: explore tabular measurement data grouped by
//! country, region and site.
//!
//! The [`data`] module holds the whole load → inspect → aggregate pipeline
//! and has no UI dependencies; [`app`], [`state`] and [`ui`] render it with
//! egui.

pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
