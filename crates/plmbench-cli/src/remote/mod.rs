//! Clients for the remote services the datasets and the model live behind.

pub mod casp;
pub mod forge;
pub mod rcsb;
pub mod thermomutdb;

use crate::error::Result;

pub fn http_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("plmbench/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
