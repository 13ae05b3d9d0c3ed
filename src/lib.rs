//! Core library for the nyt-bestsellers command line application.
//!
//! The library fetches the current New York Times bestseller lists and turns
//! them into a print-ready workbook. The modules keep responsibilities narrow:
//! settings live in [`config`], network and spreadsheet adapters under
//! [`io`], the fetched data in [`model`], the per-sheet layout in [`layout`],
//! and the run orchestration in [`sync`].

pub mod config;
pub mod error;
pub mod io;
pub mod layout;
pub mod model;
pub mod sync;

pub use error::{Result, ToolError};
