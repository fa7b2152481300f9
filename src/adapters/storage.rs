use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // 同名檔案直接覆寫
        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_file_creates_directory_and_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("docs-v7"));

        tokio_test::block_on(async {
            storage.write_file("plugin-foo.md", b"first").await.unwrap();
            storage.write_file("plugin-foo.md", b"second").await.unwrap();
        });

        assert_eq!(storage.base_path(), temp_dir.path().join("docs-v7"));
        let content = std::fs::read_to_string(storage.base_path().join("plugin-foo.md")).unwrap();
        assert_eq!(content, "second");
    }
}
