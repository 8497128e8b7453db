/// Pixel-level compositing and scale-and-pad.
pub mod composite;
/// Generation pipeline and its options.
pub mod pipeline;
/// Single-variant rendering.
pub mod variant;
