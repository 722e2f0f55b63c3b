//! # Core Module
//!
//! Fundamental data structures and algorithms shared by every other layer.
//!
//! - **Structure Representation** ([`models`]) - Atoms, residues, chains and whole structures
//! - **File I/O** ([`io`]) - Reading and writing PDB and FASTA files
//! - **Structural Metrics** ([`metrics`]) - Superposition, RMSD, lDDT and TM-score computed natively

pub mod io;
pub mod metrics;
pub mod models;
