//! Reference datasets: CASP targets and ThermoMutDB point mutations.
//!
//! Everything here works on local files. Fetching from the network (git, RCSB, the
//! ThermoMutDB API) is left to the caller, which hands the results to these types.

pub mod casp;
pub mod error;
pub mod mutation;
pub mod table;
pub mod thermomutdb;

pub use casp::{CaspCheckout, CaspRecord, CaspTarget, CaspVersion};
pub use error::DatasetError;
pub use mutation::Mutation;
pub use table::{Dataset, DatasetRecord, TableFormat, default_table_path};
pub use thermomutdb::{MutationManifestRow, ThermoMutRecord, VariantInformation, read_manifest};
