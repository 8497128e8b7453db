use serde::{Deserialize, Serialize};

/// Output encodings a variant can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageEncoding {
    /// Portable Network Graphics.
    Png,
    /// Windows icon container.
    Ico,
}

impl ImageEncoding {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Ico => "ico",
        }
    }

    /// MIME type used in link markup.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Ico => "image/x-icon",
        }
    }

    /// Matching `image` crate output format.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Ico => image::ImageFormat::Ico,
        }
    }
}

/// Static description of one favicon variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantDescriptor {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output encoding.
    pub encoding: ImageEncoding,
    /// Filename stem.
    pub prefix: &'static str,
    /// `rel` attribute for link markup, if the variant is referenced by a `<link>`.
    pub rel: Option<&'static str>,
}

impl VariantDescriptor {
    const fn png(prefix: &'static str, rel: Option<&'static str>, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            encoding: ImageEncoding::Png,
            prefix,
            rel,
        }
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Output file name: `{prefix}.ico` for icons, `{prefix}-{w}x{h}.{ext}` otherwise.
    pub fn filename(&self) -> String {
        match self.encoding {
            ImageEncoding::Ico => format!("{}.{}", self.prefix, self.encoding.extension()),
            ImageEncoding::Png => format!(
                "{}-{}x{}.{}",
                self.prefix,
                self.width,
                self.height,
                self.encoding.extension()
            ),
        }
    }

    /// Serializable record of this descriptor.
    pub fn record(&self) -> FormatRecord {
        FormatRecord {
            image_fmt: self.encoding,
            rel: self.rel.map(str::to_owned),
            dimensions: [self.width, self.height],
            prefix: self.prefix.to_owned(),
            filename: self.filename(),
        }
    }
}

/// Structured-serialization form of a [`VariantDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatRecord {
    /// Output encoding.
    pub image_fmt: ImageEncoding,
    /// Link relation, `null` when the variant has none.
    pub rel: Option<String>,
    /// `[width, height]` in pixels.
    pub dimensions: [u32; 2],
    /// Filename stem.
    pub prefix: String,
    /// Full output filename.
    pub filename: String,
}

const FAVICON: &str = "favicon";
const APPLE_TOUCH: &str = "apple-touch-icon";
const MSTILE: &str = "mstile";

static BUILTIN: [VariantDescriptor; 21] = [
    VariantDescriptor {
        width: 64,
        height: 64,
        encoding: ImageEncoding::Ico,
        prefix: FAVICON,
        rel: None,
    },
    VariantDescriptor::png(FAVICON, Some("icon"), 16, 16),
    VariantDescriptor::png(FAVICON, Some("icon"), 32, 32),
    VariantDescriptor::png(FAVICON, Some("icon"), 64, 64),
    VariantDescriptor::png(FAVICON, Some("icon"), 96, 96),
    VariantDescriptor::png(FAVICON, Some("icon"), 180, 180),
    VariantDescriptor::png(APPLE_TOUCH, Some(APPLE_TOUCH), 57, 57),
    VariantDescriptor::png(APPLE_TOUCH, Some(APPLE_TOUCH), 60, 60),
    VariantDescriptor::png(APPLE_TOUCH, Some(APPLE_TOUCH), 72, 72),
    VariantDescriptor::png(APPLE_TOUCH, Some(APPLE_TOUCH), 76, 76),
    VariantDescriptor::png(APPLE_TOUCH, Some(APPLE_TOUCH), 114, 114),
    VariantDescriptor::png(APPLE_TOUCH, Some(APPLE_TOUCH), 120, 120),
    VariantDescriptor::png(APPLE_TOUCH, Some(APPLE_TOUCH), 144, 144),
    VariantDescriptor::png(APPLE_TOUCH, Some(APPLE_TOUCH), 152, 152),
    VariantDescriptor::png(APPLE_TOUCH, Some(APPLE_TOUCH), 167, 167),
    VariantDescriptor::png(APPLE_TOUCH, Some(APPLE_TOUCH), 180, 180),
    VariantDescriptor::png(MSTILE, None, 70, 70),
    VariantDescriptor::png(MSTILE, None, 270, 270),
    VariantDescriptor::png(MSTILE, None, 310, 310),
    VariantDescriptor::png(MSTILE, None, 310, 150),
    VariantDescriptor::png(FAVICON, Some("shortcut icon"), 196, 196),
];

/// The built-in variant catalog, in generation order.
pub fn catalog() -> &'static [VariantDescriptor] {
    &BUILTIN
}

/// Largest width or height across a catalog; 0 for an empty one.
pub fn max_dimension(catalog: &[VariantDescriptor]) -> u32 {
    catalog
        .iter()
        .map(|d| d.width.max(d.height))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/formats.rs"]
mod tests;
