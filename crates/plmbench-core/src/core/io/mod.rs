//! Provides input/output functionality for structure and sequence files.
//!
//! Structures are read and written through the [`traits::StructureFile`] trait, which
//! [`pdb::PdbFile`] implements. Sequences use the plain FASTA helpers in [`fasta`].

pub mod fasta;
pub mod pdb;
pub mod traits;
