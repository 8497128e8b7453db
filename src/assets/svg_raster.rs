use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{FaviconError, FaviconResult};
use crate::io::paths::is_vector_source;

// Avoid pathological allocations for huge or malformed intrinsic sizes.
const MAX_DIM: u32 = 16_384;

/// Temporary PNG produced from a vector source.
///
/// Removed exactly once, either by [`TempRaster::release`] or on drop. A file that is already
/// gone is not an error; any other removal failure is logged and swallowed.
#[derive(Debug)]
pub struct TempRaster {
    path: Option<tempfile::TempPath>,
}

impl TempRaster {
    /// Location of the temporary PNG, `None` once released.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Delete the temporary file now.
    pub fn release(&mut self) {
        let Some(tmp) = self.path.take() else {
            return;
        };
        let path = tmp.to_path_buf();
        match tmp.close() {
            Ok(()) => tracing::debug!(path = %path.display(), "removed temporary raster"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to remove temporary raster"
            ),
        }
    }
}

impl Drop for TempRaster {
    fn drop(&mut self) {
        self.release();
    }
}

/// The bitmap the renderer should read, plus the temporary it may own.
#[derive(Debug)]
pub struct PreparedSource {
    path: PathBuf,
    temp: Option<TempRaster>,
}

impl PreparedSource {
    /// Path of the raster image to render from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` when [`PreparedSource::path`] is a temporary this value will delete.
    pub fn owns_temporary(&self) -> bool {
        self.temp.as_ref().is_some_and(|t| t.path().is_some())
    }

    /// Delete the owned temporary, if any. Idempotent.
    pub fn release(&mut self) {
        if let Some(temp) = self.temp.as_mut() {
            temp.release();
        }
    }
}

/// Pass raster sources through untouched; rasterize vector sources into a temporary PNG whose
/// longer side is at least `min_side` pixels.
#[tracing::instrument(skip_all, fields(source = %source.display()))]
pub fn prepare_source(source: &Path, min_side: u32) -> FaviconResult<PreparedSource> {
    if !is_vector_source(source) {
        return Ok(PreparedSource {
            path: source.to_path_buf(),
            temp: None,
        });
    }

    let img = rasterize_svg_file(source, min_side)?;
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| FaviconError::rasterization(format!("encode rasterized svg: {e}")))?;

    let mut file = tempfile::Builder::new()
        .prefix("favicons_")
        .suffix(".png")
        .tempfile()
        .context("create temporary raster file")?;
    let path = file.path().to_path_buf();
    file.write_all(&png)
        .and_then(|()| file.flush())
        .with_context(|| format!("write temporary raster '{}'", path.display()))?;

    let tmp = file.into_temp_path();
    tracing::debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "rasterized vector source"
    );

    Ok(PreparedSource {
        path,
        temp: Some(TempRaster { path: Some(tmp) }),
    })
}

/// Parse and render an SVG file to a straight-alpha RGBA bitmap.
pub fn rasterize_svg_file(path: &Path, min_side: u32) -> FaviconResult<image::RgbaImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        FaviconError::rasterization(format!("read svg '{}': {e}", path.display()))
    })?;

    let resources_dir = path.parent().map(Path::to_path_buf);
    let fontdb = build_svg_fontdb(resources_dir.as_deref());
    let opts = usvg::Options {
        resources_dir,
        fontdb,
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(&bytes, &opts).map_err(|e| {
        FaviconError::rasterization(format!("parse svg '{}': {e}", path.display()))
    })?;

    let size = tree.size();
    let (width, height) = svg_raster_size(size.width(), size.height(), min_side)?;
    let mut data = rasterize_svg_to_premul_rgba8(&tree, width, height)?;
    demultiply_rgba8_in_place(&mut data);

    image::RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| FaviconError::rasterization("svg pixmap size mismatch"))
}

/// Pixel size for rasterizing an SVG of intrinsic size `width` x `height`.
///
/// The intrinsic size is rounded up and, when its longer side is below `min_side`, scaled up
/// uniformly so that side reaches `min_side`.
pub fn svg_raster_size(width: f32, height: f32, min_side: u32) -> FaviconResult<(u32, u32)> {
    fn to_px(v: f32) -> FaviconResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(FaviconError::rasterization("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let base_w = to_px(width)?;
    let base_h = to_px(height)?;
    let longer = base_w.max(base_h);

    let (w, h) = if longer < min_side {
        let scale = f64::from(min_side) / f64::from(longer);
        (
            (f64::from(base_w) * scale).round().max(1.0) as u32,
            (f64::from(base_h) * scale).round().max(1.0) as u32,
        )
    } else {
        (base_w, base_h)
    };

    if w > MAX_DIM || h > MAX_DIM {
        return Err(FaviconError::rasterization(format!(
            "svg raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok((w, h))
}

fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> FaviconResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| FaviconError::rasterization("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.take())
}

fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn build_svg_fontdb(resources_dir: Option<&Path>) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();

    if let Some(dir) = resources_dir {
        load_fonts_from_dir(&mut db, dir);
        load_fonts_from_dir(&mut db, &dir.join("fonts"));
    }

    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        let _ = db.load_font_file(&path);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
