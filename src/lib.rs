//! Generate a complete favicon set from one source image.
//!
//! A single raster (`png`, `jpg`/`jpeg`, `tif`/`tiff`) or vector (`svg`) source is turned into a
//! fixed catalog of variants (ICO and PNG at assorted sizes), each composited onto a background
//! color and padded to keep the source's aspect ratio. The same catalog drives the `<link>`
//! markup, filename listings and a JSON description of the set.
//!
//! # Pipeline overview
//!
//! 1. **Validate**: check the source path and format, create the output directory.
//! 2. **Prepare**: rasterize SVG sources into a temporary PNG owned by the pipeline.
//! 3. **Render**: for every catalog entry, composite, scale-and-pad, encode and write.
//! 4. **Tear down**: remove the temporary PNG, whatever happened before.
//!
//! Rendering runs either sequentially ([`Favicons::generate_sync`], fail-fast) or as independent
//! tasks on a `rayon` pool ([`Favicons::generate_concurrent`], failures aggregated).
//!
//! ```no_run
//! use favicons::{ColorSpec, Favicons, FaviconsOpts};
//!
//! let opts = FaviconsOpts {
//!     background: ColorSpec::parse("white")?,
//!     transparent: false,
//!     ..FaviconsOpts::default()
//! };
//! let written = Favicons::scoped("logo.svg", "public/icons", opts, |fav| {
//!     fav.generate_concurrent()
//! })?;
//! println!("wrote {} files", written.len());
//! # Ok::<(), favicons::FaviconError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod catalog;
mod foundation;
mod io;
mod metadata;
mod render;

pub use assets::color::ColorSpec;
pub use assets::svg_raster::{PreparedSource, TempRaster, prepare_source, rasterize_svg_file};
pub use catalog::formats::{FormatRecord, ImageEncoding, VariantDescriptor, catalog};
pub use foundation::error::{FaviconError, FaviconResult};
pub use io::paths::{
    SUPPORTED_SOURCE_EXTENSIONS, is_supported_source, is_vector_source, validate_output_dir,
    validate_path, validate_source,
};
pub use metadata::markup::{filenames, formats, formats_json, link_tag, links};
pub use render::pipeline::{Favicons, FaviconsOpts, PipelineState};
pub use render::variant::{VariantRenderer, encode_variant};
