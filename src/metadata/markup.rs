use anyhow::Context as _;

use crate::{
    catalog::formats::{FormatRecord, VariantDescriptor},
    foundation::error::FaviconResult,
};

/// `<link>` element referencing `base_url + filename` for one variant.
///
/// Variants without a link relation render without a `rel` attribute.
/// Attribute values are HTML-escaped, so `href` decodes to `base_url + filename`.
pub fn link_tag(desc: &VariantDescriptor, base_url: &str) -> String {
    let href = escape_attr(&format!("{base_url}{}", desc.filename()));
    let mime = desc.encoding.mime();
    match desc.rel {
        Some(rel) => format!(
            r#"<link rel="{}" type="{mime}" href="{href}" />"#,
            escape_attr(rel)
        ),
        None => format!(r#"<link type="{mime}" href="{href}" />"#),
    }
}

/// One `<link>` element per catalog entry, in catalog order.
///
/// The iterator is `Clone`, so a listing can be walked any number of times.
pub fn links<'a>(
    catalog: &'a [VariantDescriptor],
    base_url: &'a str,
) -> impl Iterator<Item = String> + Clone + 'a {
    catalog.iter().map(move |d| link_tag(d, base_url))
}

/// Output filenames in catalog order, each prefixed with `base_url` when `prefix` is set.
pub fn filenames<'a>(
    catalog: &'a [VariantDescriptor],
    base_url: &'a str,
    prefix: bool,
) -> impl Iterator<Item = String> + Clone + 'a {
    catalog.iter().map(move |d| {
        if prefix {
            format!("{base_url}{}", d.filename())
        } else {
            d.filename()
        }
    })
}

/// Serializable records for every catalog entry.
pub fn formats(catalog: &[VariantDescriptor]) -> Vec<FormatRecord> {
    catalog.iter().map(VariantDescriptor::record).collect()
}

/// [`formats`] as JSON text.
pub fn formats_json(catalog: &[VariantDescriptor], pretty: bool) -> FaviconResult<String> {
    let records = formats(catalog);
    let json = if pretty {
        serde_json::to_string_pretty(&records)
    } else {
        serde_json::to_string(&records)
    };
    Ok(json.context("serialize format records")?)
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/metadata/markup.rs"]
mod tests;
