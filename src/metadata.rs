/// Link markup, filename listings and JSON records.
pub mod markup;
