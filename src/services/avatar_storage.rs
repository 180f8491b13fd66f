// src/services/avatar_storage.rs
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::{info, warn};
use regex::Regex;
use tokio::fs;
use unicode_normalization::UnicodeNormalization;

use crate::models::user::AVATAR_URL_PREFIX;

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("static regex"));

/// True when the name carries one of the allowed image extensions.
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Reduces a client-supplied name to something safe to put on disk.
/// Accented letters fold to their ASCII base; `/` separates path parts.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename.nfkd().filter(char::is_ascii).collect();
    let spaced = ascii.replace('/', " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let stripped = UNSAFE_CHARS.replace_all(&joined, "");
    let trimmed = stripped.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn avatar_filename(user_id: i32, unix_time: i64, original: &str) -> String {
    format!("avatar_{}_{}_{}", user_id, unix_time, secure_filename(original))
}

pub fn avatar_url(filename: &str) -> String {
    format!("{}/{}", AVATAR_URL_PREFIX, filename)
}

/// Local directory that stored avatars are written to.
#[derive(Clone, Debug)]
pub struct AvatarStore {
    dir: PathBuf,
}

impl AvatarStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn save(&self, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(filename);
        fs::write(&path, bytes).await?;
        info!("stored avatar at {}", path.display());
        Ok(path)
    }

    /// Best-effort cleanup of a file whose database update did not land.
    pub async fn discard(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            warn!("failed to remove orphaned avatar {}: {}", path.display(), e);
        }
    }
}
