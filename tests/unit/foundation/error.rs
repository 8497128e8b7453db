use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FaviconError::PathNotFound(PathBuf::from("a.png"))
            .to_string()
            .contains("path not found:")
    );
    assert!(
        FaviconError::UnsupportedFormat(PathBuf::from("a.txt"))
            .to_string()
            .contains("unsupported format:")
    );
    assert!(
        FaviconError::invalid_color("x")
            .to_string()
            .contains("invalid color:")
    );
    assert!(
        FaviconError::rasterization("x")
            .to_string()
            .contains("rasterization error:")
    );
    assert!(
        FaviconError::encoding("x")
            .to_string()
            .contains("encoding error:")
    );
    assert!(
        FaviconError::invalid_path("d", "x")
            .to_string()
            .contains("invalid path:")
    );
    assert!(
        FaviconError::config("x")
            .to_string()
            .contains("invalid config:")
    );
}

#[test]
fn write_error_carries_path_and_source() {
    let err = FaviconError::Write {
        path: PathBuf::from("out/favicon.ico"),
        source: std::io::Error::other("disk full"),
    };
    let msg = err.to_string();
    assert!(msg.starts_with("write error:"));
    assert!(msg.contains("favicon.ico"));
    assert!(msg.contains("disk full"));
}

#[test]
fn batch_lists_every_failure() {
    let err = FaviconError::Batch(vec![
        FaviconError::encoding("first"),
        FaviconError::encoding("second"),
    ]);
    let msg = err.to_string();
    assert!(msg.starts_with("2 variant(s) failed:"));
    assert!(msg.contains("first"));
    assert!(msg.contains("second"));
    assert_eq!(err.failures().len(), 2);
}

#[test]
fn failures_of_single_error_is_itself() {
    let err = FaviconError::invalid_color("nope");
    assert_eq!(err.failures().len(), 1);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FaviconError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
