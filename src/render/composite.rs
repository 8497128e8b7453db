use image::{RgbaImage, imageops};

use crate::foundation::error::{FaviconError, FaviconResult};

pub type PremulRgba8 = [u8; 4];

/// Source-over on premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(src[3], mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(src[i], dc);
    }
    out
}

pub fn premultiply(px: [u8; 4]) -> PremulRgba8 {
    let a = u16::from(px[3]);
    if a == 255 {
        return px;
    }
    if a == 0 {
        return [0, 0, 0, 0];
    }
    [
        mul_div255(u16::from(px[0]), a),
        mul_div255(u16::from(px[1]), a),
        mul_div255(u16::from(px[2]), a),
        px[3],
    ]
}

pub fn demultiply(px: PremulRgba8) -> [u8; 4] {
    let a = u16::from(px[3]);
    if a == 255 || a == 0 {
        return px;
    }
    let un = |c: u8| ((u16::from(c) * 255 + a / 2) / a).min(255) as u8;
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

/// Composite straight-alpha `src` over a canvas of the same size filled with straight-alpha
/// `background`.
pub fn composite_over_background(src: &RgbaImage, background: [u8; 4]) -> RgbaImage {
    let bg = premultiply(background);
    let mut out = RgbaImage::from_pixel(src.width(), src.height(), image::Rgba(background));
    for (dst, s) in out.pixels_mut().zip(src.pixels()) {
        dst.0 = demultiply(over(bg, premultiply(s.0)));
    }
    out
}

/// Largest `(w, h)` with the aspect ratio of `src_w x src_h` that fits in `box_w x box_h`.
///
/// The constrained axis takes the box size exactly; the other is rounded and at least 1.
pub fn fit_within(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> (u32, u32) {
    let lhs = u64::from(src_w) * u64::from(box_h);
    let rhs = u64::from(src_h) * u64::from(box_w);
    if lhs == rhs {
        return (box_w, box_h);
    }

    let ratio = f64::from(src_w) / f64::from(src_h);
    if lhs > rhs {
        let h = (f64::from(box_w) / ratio).round().clamp(1.0, f64::from(box_h)) as u32;
        (box_w, h)
    } else {
        let w = (f64::from(box_h) * ratio).round().clamp(1.0, f64::from(box_w)) as u32;
        (w, box_h)
    }
}

/// Scale `img` to fit inside `width x height` without changing its aspect ratio, centre it,
/// and fill the remainder with `fill`. Never crops.
pub fn scale_and_pad(
    img: &RgbaImage,
    width: u32,
    height: u32,
    fill: [u8; 4],
) -> FaviconResult<RgbaImage> {
    if img.width() == 0 || img.height() == 0 {
        return Err(FaviconError::encoding("cannot resize an empty image"));
    }
    if width == 0 || height == 0 {
        return Err(FaviconError::encoding(format!(
            "invalid target size {width}x{height}"
        )));
    }

    let (w, h) = fit_within(img.width(), img.height(), width, height);
    let scaled = if (w, h) == img.dimensions() {
        img.clone()
    } else {
        imageops::resize(img, w, h, imageops::FilterType::CatmullRom)
    };
    if (w, h) == (width, height) {
        return Ok(scaled);
    }

    let mut canvas = RgbaImage::from_pixel(width, height, image::Rgba(fill));
    let x = i64::from(pad_offset(width - w));
    let y = i64::from(pad_offset(height - h));
    imageops::replace(&mut canvas, &scaled, x, y);
    Ok(canvas)
}

/// Leading padding for `slack` spare pixels: `slack / 2` rounded half to even, so odd slack
/// alternates between favoring the leading and trailing edge.
fn pad_offset(slack: u32) -> u32 {
    let half = slack / 2;
    if slack % 2 == 1 && half % 2 == 1 {
        half + 1
    } else {
        half
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
