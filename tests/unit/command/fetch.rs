use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn scratch_dir() -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!("image-toolbox-fetch-{}-{n}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

struct Broken;

impl ImageFetcher for Broken {
    fn fetch(&self, _url: &str) -> Result<FetchedImage, FetchError> {
        Err(FetchError::Other(anyhow::anyhow!("backend exploded")))
    }
}

#[test]
fn file_fetcher_reads_relative_and_file_urls() {
    let dir = scratch_dir();
    write_output(&dir.join("a.png"), &png_bytes()).unwrap();

    let fetcher = FileFetcher::with_root(&dir);
    let fetched = fetcher.fetch("a.png").unwrap();
    assert_eq!(fetched.mime, "image/png");

    let url = format!("file://{}", dir.join("a.png").display());
    let img = load_image(&FileFetcher::new(), &url).unwrap();
    assert_eq!(img.dimensions(), (3, 2));
}

#[test]
fn unreachable_source_maps_to_fetch_failure() {
    let dir = scratch_dir();
    let err = load_image(&FileFetcher::with_root(&dir), "missing.png").unwrap_err();
    assert_eq!(
        err.as_operation(),
        Some(&OperationError::FetchImageFailed {
            url: "missing.png".to_string()
        })
    );
}

#[test]
fn undecodable_bytes_map_to_invalid_image() {
    let dir = scratch_dir();
    write_output(&dir.join("junk.png"), b"definitely not an image").unwrap();
    let err = load_image(&FileFetcher::with_root(&dir), "junk.png").unwrap_err();
    assert_eq!(err.as_operation().map(|e| e.key()), Some("invalid-image"));
}

#[test]
fn other_fetch_errors_pass_through() {
    let err = load_image(&Broken, "x").unwrap_err();
    assert!(err.as_operation().is_none());
    assert!(matches!(err, ToolboxError::Other(_)));
}

#[test]
fn load_images_keeps_order() {
    let dir = scratch_dir();
    write_output(&dir.join("one.png"), &png_bytes()).unwrap();
    let fetcher = FileFetcher::with_root(&dir);
    let urls = vec!["one.png".to_string(), "one.png".to_string()];
    assert_eq!(load_images(&fetcher, &urls).unwrap().len(), 2);
}
