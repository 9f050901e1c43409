#![allow(dead_code)]

use image::{DynamicImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use qr_render::application::services::QrService;
use qr_render::domain::entities::StyleDefaults;
use qr_render::infrastructure::assets::FsLogoRepository;
use qr_render::infrastructure::cache::{CacheService, FileCache, NullCache};
use qr_render::infrastructure::render::StyledQrRenderer;
use qr_render::state::{AppState, DefaultQrService};

pub const TEST_TTL: u64 = 3600;
pub const LOGO_REF: &str = "brand";

/// Temporary directories backing a test service. Dropping it deletes them.
pub struct TestDirs {
    pub root: TempDir,
}

impl TestDirs {
    pub fn cache_dir(&self) -> std::path::PathBuf {
        self.root.path().join("cache")
    }

    pub fn logo_dir(&self) -> std::path::PathBuf {
        self.root.path().join("logos")
    }
}

pub fn png_bytes(image: RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

pub fn write_logo(dir: &Path, name: &str) {
    std::fs::create_dir_all(dir).unwrap();
    let logo = RgbaImage::from_pixel(32, 32, Rgba([255, 0, 0, 255]));
    std::fs::write(dir.join(format!("{name}.png")), png_bytes(logo)).unwrap();
}

fn build_service(cache: Arc<dyn CacheService>, logo_dir: &Path) -> DefaultQrService {
    QrService::new(
        Arc::new(StyledQrRenderer::default()),
        Arc::new(FsLogoRepository::new(logo_dir)),
        cache,
        StyleDefaults::default(),
        TEST_TTL,
    )
}

/// Service backed by a file cache in a fresh temp directory, with one logo
/// asset available under [`LOGO_REF`].
pub async fn create_file_service() -> (DefaultQrService, TestDirs) {
    let dirs = TestDirs {
        root: tempfile::tempdir().unwrap(),
    };
    write_logo(&dirs.logo_dir(), LOGO_REF);

    let cache = FileCache::open(dirs.cache_dir(), TEST_TTL).await.unwrap();
    let service = build_service(Arc::new(cache), &dirs.logo_dir());

    (service, dirs)
}

pub async fn create_test_state() -> (AppState, TestDirs) {
    let (service, dirs) = create_file_service().await;
    (AppState::new(Arc::new(service)), dirs)
}

pub fn create_uncached_state() -> (AppState, TestDirs) {
    let dirs = TestDirs {
        root: tempfile::tempdir().unwrap(),
    };
    let service = build_service(Arc::new(NullCache::new()), &dirs.logo_dir());

    (AppState::new(Arc::new(service)), dirs)
}

/// Number of committed entries in a file cache namespace directory.
pub fn cached_files(dirs: &TestDirs, namespace: &str) -> usize {
    match std::fs::read_dir(dirs.cache_dir().join(namespace)) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "cache"))
            .count(),
        Err(_) => 0,
    }
}
