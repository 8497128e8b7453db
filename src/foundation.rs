/// Error taxonomy.
pub mod error;
