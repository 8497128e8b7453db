use crate::catalog::formats::{ImageEncoding, catalog};

use super::*;

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

fn write_red_png(dir: &Path, w: u32, h: u32) -> PathBuf {
    let path = dir.join("src.png");
    image::RgbaImage::from_pixel(w, h, image::Rgba([255, 0, 0, 255]))
        .save(&path)
        .unwrap();
    path
}

fn png_desc(w: u32, h: u32) -> VariantDescriptor {
    VariantDescriptor {
        width: w,
        height: h,
        encoding: ImageEncoding::Png,
        prefix: "test",
        rel: None,
    }
}

#[test]
fn wide_source_is_padded_top_and_bottom() {
    let dir = temp_dir("variant_pad");
    std::fs::create_dir_all(&dir).unwrap();
    let src = write_red_png(&dir, 40, 20);
    let completed = AtomicUsize::new(0);

    let renderer = VariantRenderer {
        source: &src,
        output_dir: &dir,
        background: ColorSpec::rgb(0, 0, 255),
        transparent: false,
        completed: &completed,
    };
    let out = renderer.render(&png_desc(16, 16)).unwrap();
    assert_eq!(out, dir.join("test-16x16.png"));
    assert_eq!(completed.load(Ordering::SeqCst), 1);

    let img = image::open(&out).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (16, 16));
    assert_eq!(img.get_pixel(8, 0).0, [0, 0, 255, 255]);
    assert_eq!(img.get_pixel(8, 15).0, [0, 0, 255, 255]);
    assert_eq!(img.get_pixel(8, 8).0, [255, 0, 0, 255]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn transparent_background_pads_with_clear_pixels() {
    let dir = temp_dir("variant_clear");
    std::fs::create_dir_all(&dir).unwrap();
    let src = write_red_png(&dir, 10, 20);
    let completed = AtomicUsize::new(0);

    let renderer = VariantRenderer {
        source: &src,
        output_dir: &dir,
        background: ColorSpec::rgb(0, 0, 255),
        transparent: true,
        completed: &completed,
    };
    let bytes = renderer.render_bytes(&png_desc(20, 20)).unwrap();
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(0, 10).0[3], 0);
    assert_eq!(img.get_pixel(10, 10).0, [255, 0, 0, 255]);
    assert_eq!(completed.load(Ordering::SeqCst), 0);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn ico_variant_is_an_icon_of_declared_size() {
    let dir = temp_dir("variant_ico");
    std::fs::create_dir_all(&dir).unwrap();
    let src = write_red_png(&dir, 32, 32);
    let completed = AtomicUsize::new(0);

    let renderer = VariantRenderer {
        source: &src,
        output_dir: &dir,
        background: ColorSpec::default(),
        transparent: true,
        completed: &completed,
    };
    let ico = catalog()[0];
    let out = renderer.render(&ico).unwrap();
    assert_eq!(out.file_name().unwrap(), "favicon.ico");

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(
        image::guess_format(&bytes).unwrap(),
        image::ImageFormat::Ico
    );
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 64));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_source_is_an_image_read_error() {
    let dir = temp_dir("variant_missing");
    let completed = AtomicUsize::new(0);
    let src = dir.join("absent.png");

    let renderer = VariantRenderer {
        source: &src,
        output_dir: &dir,
        background: ColorSpec::default(),
        transparent: true,
        completed: &completed,
    };
    let err = renderer.render(&png_desc(16, 16)).unwrap_err();
    assert!(matches!(err, FaviconError::ImageRead { .. }), "{err}");
    assert_eq!(completed.load(Ordering::SeqCst), 0);
}

#[test]
fn unwritable_output_is_a_write_error() {
    let dir = temp_dir("variant_write");
    std::fs::create_dir_all(&dir).unwrap();
    let src = write_red_png(&dir, 8, 8);
    let missing_out = dir.join("not").join("created");
    let completed = AtomicUsize::new(0);

    let renderer = VariantRenderer {
        source: &src,
        output_dir: &missing_out,
        background: ColorSpec::default(),
        transparent: true,
        completed: &completed,
    };
    let err = renderer.render(&png_desc(16, 16)).unwrap_err();
    assert!(matches!(err, FaviconError::Write { .. }), "{err}");
    assert_eq!(completed.load(Ordering::SeqCst), 0);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn encode_rejects_wrong_size_and_oversized_ico() {
    let img = image::RgbaImage::new(8, 8);
    let err = encode_variant(img, &png_desc(16, 16)).unwrap_err();
    assert!(matches!(err, FaviconError::Encoding(_)));

    let big = VariantDescriptor {
        width: 512,
        height: 512,
        encoding: ImageEncoding::Ico,
        prefix: "big",
        rel: None,
    };
    let err = encode_variant(image::RgbaImage::new(512, 512), &big).unwrap_err();
    assert!(matches!(err, FaviconError::Encoding(_)));
}
