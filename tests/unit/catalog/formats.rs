use std::collections::HashSet;

use super::*;

#[test]
fn catalog_order_is_declaration_order() {
    let names = catalog().iter().map(|d| d.filename()).collect::<Vec<_>>();
    assert_eq!(names.first().map(String::as_str), Some("favicon.ico"));
    assert_eq!(names[1], "favicon-16x16.png");
    assert_eq!(names[6], "apple-touch-icon-57x57.png");
    assert_eq!(names[19], "mstile-310x150.png");
    assert_eq!(names.last().map(String::as_str), Some("favicon-196x196.png"));
    assert_eq!(catalog().len(), 21);
}

#[test]
fn filenames_are_unique_and_dimensions_positive() {
    let mut seen = HashSet::new();
    for d in catalog() {
        assert!(d.width > 0 && d.height > 0, "{d:?}");
        assert!(seen.insert(d.filename()), "duplicate {}", d.filename());
    }
}

#[test]
fn encodings_expose_mime_and_extension() {
    assert_eq!(ImageEncoding::Png.mime(), "image/png");
    assert_eq!(ImageEncoding::Ico.mime(), "image/x-icon");
    assert_eq!(ImageEncoding::Ico.extension(), "ico");
    assert_eq!(
        ImageEncoding::Png.image_format(),
        image::ImageFormat::Png
    );
}

#[test]
fn record_serializes_with_stable_keys() {
    let rec = catalog()[1].record();
    let v = serde_json::to_value(&rec).unwrap();
    assert_eq!(v["image_fmt"], "png");
    assert_eq!(v["rel"], "icon");
    assert_eq!(v["dimensions"], serde_json::json!([16, 16]));
    assert_eq!(v["prefix"], "favicon");
    assert_eq!(v["filename"], "favicon-16x16.png");

    let ico = serde_json::to_value(catalog()[0].record()).unwrap();
    assert!(ico["rel"].is_null());
}

#[test]
fn max_dimension_covers_wide_tile() {
    assert_eq!(max_dimension(catalog()), 310);
    assert_eq!(max_dimension(&[]), 0);
}
