use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{FaviconError, FaviconResult};

/// Background color for composited variants, straight (non-premultiplied) RGBA8.
///
/// Accepts hex strings (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `#` optional), CSS/SVG color
/// names, and integer channel tuples of length 3 or 4. Alpha defaults to 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorSpec {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

impl ColorSpec {
    /// Opaque color from three channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from four channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex string or a color name.
    pub fn parse(s: &str) -> FaviconResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FaviconError::invalid_color("empty color string"));
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if looks_like_bare_hex(s) {
            return parse_hex(s);
        }
        parse_named(s)
    }

    /// Build from a 3 or 4 element channel tuple; each channel must be within `0..=255`.
    pub fn from_channels(channels: &[i64]) -> FaviconResult<Self> {
        fn channel(v: i64) -> FaviconResult<u8> {
            u8::try_from(v).map_err(|_| {
                FaviconError::invalid_color(format!("channel value {v} is outside 0..=255"))
            })
        }

        match *channels {
            [r, g, b] => Ok(Self::rgb(channel(r)?, channel(g)?, channel(b)?)),
            [r, g, b, a] => Ok(Self::rgba(
                channel(r)?,
                channel(g)?,
                channel(b)?,
                channel(a)?,
            )),
            _ => Err(FaviconError::invalid_color(format!(
                "channel tuple must have 3 ([r,g,b]) or 4 ([r,g,b,a]) values, got {}",
                channels.len()
            ))),
        }
    }

    /// Normalized 4-channel form.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Fill color for a background canvas: this color's RGB with alpha 0 when `transparent`,
    /// otherwise alpha 255. This color's own alpha is ignored.
    pub fn background_rgba8(self, transparent: bool) -> [u8; 4] {
        [self.r, self.g, self.b, if transparent { 0 } else { 255 }]
    }
}

impl FromStr for ColorSpec {
    type Err = FaviconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&[i64]> for ColorSpec {
    type Error = FaviconError;

    fn try_from(channels: &[i64]) -> Result<Self, Self::Error> {
        Self::from_channels(channels)
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl Serialize for ColorSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ColorSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            Arr(Vec<i64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Str(s) => Self::parse(&s).map_err(serde::de::Error::custom),
            Repr::Arr(v) => Self::from_channels(&v).map_err(serde::de::Error::custom),
        }
    }
}

fn looks_like_bare_hex(s: &str) -> bool {
    matches!(s.len(), 3 | 4 | 6 | 8) && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn parse_hex(s: &str) -> FaviconResult<ColorSpec> {
    fn hex_byte(pair: &str) -> FaviconResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| FaviconError::invalid_color(format!("invalid hex byte \"{pair}\"")))
    }

    fn hex_nibble(c: &str) -> FaviconResult<u8> {
        let v = hex_byte(c)?;
        Ok(v * 17)
    }

    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FaviconError::invalid_color(format!(
            "invalid hex color \"#{s}\""
        )));
    }

    let (r, g, b, a) = match s.len() {
        3 => (
            hex_nibble(&s[0..1])?,
            hex_nibble(&s[1..2])?,
            hex_nibble(&s[2..3])?,
            255,
        ),
        4 => (
            hex_nibble(&s[0..1])?,
            hex_nibble(&s[1..2])?,
            hex_nibble(&s[2..3])?,
            hex_nibble(&s[3..4])?,
        ),
        6 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            255,
        ),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err(FaviconError::invalid_color(
                "hex color must be #RGB, #RGBA, #RRGGBB or #RRGGBBAA (case-insensitive)",
            ));
        }
    };

    Ok(ColorSpec::rgba(r, g, b, a))
}

fn parse_named(s: &str) -> FaviconResult<ColorSpec> {
    let lowered = s.to_ascii_lowercase();
    check_rgb_function_range(&lowered)?;
    let c = svgtypes::Color::from_str(&lowered)
        .map_err(|e| FaviconError::invalid_color(format!("unknown color \"{s}\": {e}")))?;
    Ok(ColorSpec::rgba(c.red, c.green, c.blue, c.alpha))
}

// svgtypes clamps out-of-range `rgb()`/`rgba()` components; those must be errors here.
fn check_rgb_function_range(s: &str) -> FaviconResult<()> {
    let Some(args) = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))
        .and_then(|rest| rest.trim_end().strip_suffix(')'))
    else {
        return Ok(());
    };

    let parts = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty());
    for (idx, part) in parts.enumerate() {
        let (digits, max) = match part.strip_suffix('%') {
            Some(pct) => (pct, 100.0),
            None if idx == 3 => (part, 1.0),
            None => (part, 255.0),
        };
        // Unparseable components are left to svgtypes to report.
        let Ok(v) = digits.parse::<f64>() else {
            continue;
        };
        if !(0.0..=max).contains(&v) {
            return Err(FaviconError::invalid_color(format!(
                "channel value {part} in \"{s}\" is outside 0..={max}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
