/// Background color parsing.
pub mod color;
/// Vector source preparation (SVG to temporary PNG).
pub mod svg_raster;
