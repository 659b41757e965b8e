//! Kardex CLI tools.
//!
//! This crate provides the `kardex-report` command, which reads a JSON
//! document of inventory movements for one product and warehouse,
//! reconstructs its kardex and prints or exports it.
//!
//! # Example Usage
//!
//! ```bash
//! kardex-report item.json lines
//! kardex-report item.json totals
//! kardex-report item.json export --format workbook --output kardex.xml
//! kardex-report item.json export --format html --output kardex.html
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod input;
