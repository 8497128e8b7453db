/// Source and output path validation.
pub mod paths;
