use super::*;

const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
<rect x="0" y="0" width="20" height="10" fill="#ff0000"/>
</svg>"##;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "favicons_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn raster_size_scales_small_svgs_up_uniformly() {
    assert_eq!(svg_raster_size(20.0, 10.0, 310).unwrap(), (310, 155));
    assert_eq!(svg_raster_size(512.0, 256.0, 310).unwrap(), (512, 256));
    assert_eq!(svg_raster_size(10.2, 10.0, 0).unwrap(), (11, 10));
}

#[test]
fn raster_size_rejects_degenerate_and_huge() {
    assert!(svg_raster_size(0.0, 10.0, 16).is_err());
    assert!(svg_raster_size(f32::NAN, 10.0, 16).is_err());
    assert!(svg_raster_size(20_000.0, 10.0, 16).is_err());
}

#[test]
fn demultiply_restores_straight_alpha() {
    let mut px = vec![64u8, 32, 0, 128, 10, 20, 30, 0, 1, 2, 3, 255];
    demultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[128, 64, 0, 128]);
    assert_eq!(&px[4..8], &[10, 20, 30, 0]);
    assert_eq!(&px[8..12], &[1, 2, 3, 255]);
}

#[test]
fn raster_source_passes_through_without_ownership() {
    let src = Path::new("logo.png");
    let prepared = prepare_source(src, 64).unwrap();
    assert_eq!(prepared.path(), src);
    assert!(!prepared.owns_temporary());
}

#[test]
fn svg_source_is_rasterized_to_owned_temporary() {
    let dir = temp_dir("svg_raster_prepare");
    std::fs::create_dir_all(&dir).unwrap();
    let svg = dir.join("logo.svg");
    std::fs::write(&svg, SQUARE_SVG).unwrap();

    let mut prepared = prepare_source(&svg, 40).unwrap();
    assert!(prepared.owns_temporary());
    let tmp = prepared.path().to_path_buf();
    assert_ne!(tmp, svg);
    assert!(tmp.exists());

    let img = image::open(&tmp).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (40, 20));
    assert_eq!(img.get_pixel(10, 10).0, [255, 0, 0, 255]);

    prepared.release();
    assert!(!tmp.exists());
    assert!(!prepared.owns_temporary());
    prepared.release();

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn temporary_is_removed_on_drop_even_if_already_gone() {
    let dir = temp_dir("svg_raster_drop");
    std::fs::create_dir_all(&dir).unwrap();
    let svg = dir.join("logo.svg");
    std::fs::write(&svg, SQUARE_SVG).unwrap();

    let prepared = prepare_source(&svg, 0).unwrap();
    let tmp = prepared.path().to_path_buf();
    std::fs::remove_file(&tmp).unwrap();
    drop(prepared);
    assert!(!tmp.exists());

    let prepared = prepare_source(&svg, 0).unwrap();
    let tmp = prepared.path().to_path_buf();
    drop(prepared);
    assert!(!tmp.exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn malformed_svg_is_a_rasterization_error() {
    let dir = temp_dir("svg_raster_bad");
    std::fs::create_dir_all(&dir).unwrap();
    let svg = dir.join("broken.svg");
    std::fs::write(&svg, "<svg").unwrap();

    let err = prepare_source(&svg, 16).unwrap_err();
    assert!(matches!(err, FaviconError::Rasterization(_)), "{err}");

    std::fs::remove_dir_all(&dir).ok();
}
