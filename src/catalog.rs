/// Built-in variant catalog.
pub mod formats;
