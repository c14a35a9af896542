use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;

use crate::error::Result;

/// Stores product images under `<data_dir>/uploads` and hands back the
/// URL path recorded on the variant row. Filenames are prefixed with the
/// current epoch millis; two identical names in the same millisecond
/// collide, which is accepted for this workload.
#[derive(Clone)]
pub struct UploadStorage {
    base_path: PathBuf,
}

impl UploadStorage {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            base_path: data_dir.join("uploads"),
        }
    }

    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<String> {
        fs::create_dir_all(&self.base_path).await?;

        let file_name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(original_name)
        );
        fs::write(self.base_path.join(&file_name), data).await?;

        Ok(format!("/uploads/{file_name}"))
    }
}

/// Keeps only the final path component and replaces characters that are
/// unsafe in filenames.
fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_writes_file_and_returns_url_path() {
        let temp = TempDir::new().unwrap();
        let storage = UploadStorage::new(temp.path());

        let url = storage.save("photo.png", b"img-bytes").await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("-photo.png"));

        let on_disk = temp
            .path()
            .join("uploads")
            .join(url.strip_prefix("/uploads/").unwrap());
        assert_eq!(std::fs::read(on_disk).unwrap(), b"img-bytes");
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\temp\\shot.png"), "shot.png");
        assert_eq!(sanitize_file_name("my photo.png"), "my_photo.png");
        assert_eq!(sanitize_file_name(""), "upload");
    }
}
