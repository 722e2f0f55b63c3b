//! # Align Module
//!
//! Drives the TM-align and US-align executables and turns their reports into
//! [`ProteinAlignment`] records.
//!
//! The tools are treated as black boxes: structures go in as temporary PDB files, a
//! fixed set of switches ([`AlignerOptions`]) selects the alignment mode, and the scores
//! come back as text that [`parser::parse_alignment_output`] extracts with regular
//! expressions. [`build::compile_tool`] builds the tools from their published C++ source
//! and [`ToolLocator`] finds the resulting binaries.

pub mod build;
pub mod comparator;
pub mod error;
pub mod locator;
pub mod method;
pub mod parser;

pub use comparator::{Comparator, ProteinAlignment};
pub use error::AlignError;
pub use locator::ToolLocator;
pub use method::{AlignerOptions, AlignmentMethod, ExternalTool};
