//! Structural validation for Azure Monitor workbook definitions.
//!
//! The `workbook-validate` binary loads a workbook JSON document and its
//! companion changelog, flattens the nested item tree, derives query and
//! chart views, and runs a fixed battery of validation suites. Results are
//! written as an NUnit-shaped XML report under `test-results/`.
//!
//! The `report_summary` binary is an independent downstream consumer: it
//! reads a previously written report and renders a condensed Markdown table.
//! Its only coupling to the runner is the report file's schema.

#![forbid(unsafe_code)]

pub mod cli;
pub mod document;
pub mod engine;
pub mod error;
pub mod extract;
pub mod flatten;
pub mod report;
pub mod suites;
pub mod summary;

pub use error::{Error, Result};
