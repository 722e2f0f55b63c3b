//! # plmbench Core Library
//!
//! Building blocks for evaluating protein language models against reference protein
//! structures.
//!
//! ## Architectural Philosophy
//!
//! The library is network-free and synchronous apart from
//! [`datasets::Dataset::load_or_build`], which awaits a caller-supplied builder. Everything
//! that talks to a remote service lives in the command-line crate; this crate owns the data
//! models, the file formats and the scoring logic those services feed into.
//!
//! - **[`core`]: The Foundation.** Stateless structure models (`Structure`, `Chain`,
//!   `Residue`, `Atom`), PDB and FASTA I/O, and native structural metrics (Kabsch RMSD,
//!   Cα lDDT, TM-score).
//!
//! - **[`align`]: External Aligners.** Drives the TM-align and US-align executables over
//!   temporary files and turns their textual report into [`align::ProteinAlignment`]
//!   records.
//!
//! - **[`datasets`]: Reference Tables.** Record types for the CASP and ThermoMutDB test
//!   sets and a format-aware table that persists them as JSON or CSV.
//!
//! - **[`model`]: Language Model Interface.** The prediction tasks, the
//!   [`model::ProteinLanguageModel`] trait, and the ESM3 wire format (including the
//!   37-atom coordinate layout).
//!
//! - **[`view`]: Visualization.** Renders one or more structures into a standalone
//!   3Dmol.js HTML page.

pub mod align;
pub mod core;
pub mod datasets;
pub mod model;
pub mod view;
