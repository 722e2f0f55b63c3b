//! Data models for protein structures.
//!
//! A [`structure::Structure`] is an ordered list of [`chain::Chain`]s, each holding its
//! [`residue::Residue`]s in file order, each holding its [`atom::Atom`]s. The hierarchy is
//! plain owned data: structures are parsed once, inspected, and dropped.

pub mod amino_acids;
pub mod atom;
pub mod chain;
pub mod residue;
pub mod structure;
