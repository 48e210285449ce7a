pub mod config;
pub mod errors;
pub mod translation;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

pub use errors::*;
pub use validation::*;
