use serde::{Deserialize, Serialize};
use std::fmt;

/// GitHub contents API 回傳的條目類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Dir,
    File,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.branch)
    }
}

/// 一個 repository 的 packages 目錄列表
#[derive(Debug, Clone)]
pub struct Listing {
    pub repository: RepositoryRef,
    pub entries: Vec<DirectoryEntry>,
}

/// 待下載的 README
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub uri: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub sidebar_label: String,
    pub body: String,
}

impl Document {
    /// 加上 front matter 後的完整 Markdown 內容
    pub fn render(&self) -> String {
        format!(
            "---\ntitle: {}\nsidebar_label: {}\n---\n\n{}\n",
            self.title, self.sidebar_label, self.body
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedCandidate {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub written: Vec<String>,
    pub failed: Vec<FailedCandidate>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_entry_deserializes_github_payload() {
        let payload = serde_json::json!([
            {"name": "babel-core", "path": "packages/babel-core", "type": "dir", "sha": "abc"},
            {"name": "README.md", "path": "packages/README.md", "type": "file"},
            {"name": "weird", "path": "packages/weird", "type": "something-new"}
        ]);

        let entries: Vec<DirectoryEntry> = serde_json::from_value(payload).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].entry_type, EntryType::Dir);
        assert_eq!(entries[1].entry_type, EntryType::File);
        assert_eq!(entries[2].entry_type, EntryType::Other);
    }

    #[test]
    fn test_document_render() {
        let document = Document {
            title: "babel-plugin-foo".to_string(),
            sidebar_label: "foo".to_string(),
            body: "Body".to_string(),
        };

        assert_eq!(
            document.render(),
            "---\ntitle: babel-plugin-foo\nsidebar_label: foo\n---\n\nBody\n"
        );
    }

    #[test]
    fn test_repository_ref_display() {
        let repo = RepositoryRef::new("babel", "babel", "6.x");
        assert_eq!(repo.to_string(), "babel/babel@6.x");
    }
}
