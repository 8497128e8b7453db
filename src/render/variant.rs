use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    assets::color::ColorSpec,
    catalog::formats::VariantDescriptor,
    foundation::error::{FaviconError, FaviconResult},
    render::composite::{composite_over_background, scale_and_pad},
};

// ICO directory entries store width/height in one byte each.
const ICO_MAX_DIM: u32 = 256;

/// Everything a single variant render needs, shared read-only between workers.
///
/// The source bitmap is reopened by every [`VariantRenderer::render`] call; no decoder state is
/// shared.
#[derive(Debug, Clone, Copy)]
pub struct VariantRenderer<'a> {
    /// Raster source (already rasterized when the original was vector).
    pub source: &'a Path,
    /// Existing output directory.
    pub output_dir: &'a Path,
    /// Background color; only its RGB channels are used.
    pub background: ColorSpec,
    /// Whether the backing canvas is fully transparent instead of opaque.
    pub transparent: bool,
    /// Incremented once per written file.
    pub completed: &'a AtomicUsize,
}

impl VariantRenderer<'_> {
    /// Render, encode and write one variant; returns the written path.
    #[tracing::instrument(skip(self, desc), fields(variant = %desc.filename()))]
    pub fn render(&self, desc: &VariantDescriptor) -> FaviconResult<PathBuf> {
        let bytes = self.render_bytes(desc)?;

        let out_path = self.output_dir.join(desc.filename());
        std::fs::write(&out_path, &bytes).map_err(|source| FaviconError::Write {
            path: out_path.clone(),
            source,
        })?;

        let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(path = %out_path.display(), completed = done, "wrote variant");
        Ok(out_path)
    }

    /// Render and encode one variant in memory without touching the output directory.
    pub fn render_bytes(&self, desc: &VariantDescriptor) -> FaviconResult<Vec<u8>> {
        let src = image::open(self.source)
            .map_err(|source| FaviconError::ImageRead {
                path: self.source.to_path_buf(),
                source,
            })?
            .to_rgba8();

        let bg = self.background.background_rgba8(self.transparent);
        let composited = composite_over_background(&src, bg);
        let sized = scale_and_pad(&composited, desc.width, desc.height, bg)?;

        encode_variant(sized, desc)
    }
}

/// Encode an already-sized RGBA bitmap in the descriptor's encoding.
pub fn encode_variant(img: image::RgbaImage, desc: &VariantDescriptor) -> FaviconResult<Vec<u8>> {
    if img.dimensions() != desc.dimensions() {
        return Err(FaviconError::encoding(format!(
            "{}: bitmap is {}x{}, expected {}x{}",
            desc.filename(),
            img.width(),
            img.height(),
            desc.width,
            desc.height
        )));
    }
    let format = desc.encoding.image_format();
    if format == image::ImageFormat::Ico && (desc.width > ICO_MAX_DIM || desc.height > ICO_MAX_DIM)
    {
        return Err(FaviconError::encoding(format!(
            "{}: ico supports at most {ICO_MAX_DIM}x{ICO_MAX_DIM}",
            desc.filename()
        )));
    }

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), format)
        .map_err(|e| FaviconError::encoding(format!("{}: {e}", desc.filename())))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/render/variant.rs"]
mod tests;
