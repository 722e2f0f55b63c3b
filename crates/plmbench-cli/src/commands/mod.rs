pub mod compare;
pub mod data;
pub mod dataset;
pub mod evaluate;
pub mod predict;
pub mod rcsb;
