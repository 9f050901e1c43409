//! Filesystem-backed logo asset lookup.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tokio::fs;
use tracing::debug;

use crate::domain::repositories::{LogoError, LogoRepository};

/// Accepted logo reference alphabet: asset ids and plain file names.
static LOGO_REF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,127}$").unwrap());

/// File extensions tried, in order, when a reference has no extension.
const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// Resolves logo references to files under a single asset directory.
///
/// A reference such as `asset-5` resolves to the first existing
/// `asset-5.{png,jpg,jpeg,webp,gif}`; a reference with an extension is used
/// as-is. References outside the safe alphabet are rejected before touching
/// the filesystem.
pub struct FsLogoRepository {
    root: PathBuf,
}

impl FsLogoRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn candidates(&self, logo_ref: &str) -> Vec<PathBuf> {
        let has_extension = logo_ref
            .rsplit_once('.')
            .is_some_and(|(_, ext)| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));

        if has_extension {
            vec![self.root.join(logo_ref)]
        } else {
            EXTENSIONS
                .iter()
                .map(|ext| self.root.join(format!("{logo_ref}.{ext}")))
                .collect()
        }
    }
}

#[async_trait]
impl LogoRepository for FsLogoRepository {
    async fn resolve(&self, logo_ref: &str) -> Result<Vec<u8>, LogoError> {
        if !LOGO_REF_REGEX.is_match(logo_ref) || logo_ref.contains("..") {
            return Err(LogoError::InvalidReference(logo_ref.to_string()));
        }

        for path in self.candidates(logo_ref) {
            match fs::read(&path).await {
                Ok(bytes) => {
                    debug!("Resolved logo {} -> {}", logo_ref, path.display());
                    return Ok(bytes);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(LogoError::Io(e)),
            }
        }

        Err(LogoError::NotFound(logo_ref.to_string()))
    }
}
