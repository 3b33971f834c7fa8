#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

pub mod authentication;
pub mod configuration;
pub mod domain;
pub mod errors;
pub mod startup;
pub mod store;
pub mod telemetry;
pub mod utils;
