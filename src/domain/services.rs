use crate::domain::model::{Candidate, Document, EntryType, Listing};
use crate::utils::error::Result;
use regex::Regex;

/// 將目錄列表轉換為候選 README，只保留目錄條目
pub fn map_entries(listing: &Listing) -> Vec<Candidate> {
    let repo = &listing.repository;
    listing
        .entries
        .iter()
        .filter(|entry| entry.entry_type == EntryType::Dir)
        .map(|entry| Candidate {
            name: entry.name.clone(),
            uri: format!(
                "/{}/{}/{}/{}/README.md",
                repo.owner, repo.repo, repo.branch, entry.path
            ),
        })
        .collect()
}

/// Drops the first `count` lines of `text`. Shorter input yields an empty string.
pub fn strip_leading_lines(text: &str, count: usize) -> String {
    text.split('\n').skip(count).collect::<Vec<_>>().join("\n")
}

/// Package naming convention: `<scope>-<kind>-<rest>`.
#[derive(Debug, Clone)]
pub struct NamingScheme {
    scope: String,
    allowed_kinds: Vec<String>,
    package_pattern: Regex,
    label_prefix: Regex,
}

impl NamingScheme {
    pub fn new(scope: &str, allowed_kinds: &[String]) -> Result<Self> {
        let escaped_scope = regex::escape(scope);
        let kinds = allowed_kinds
            .iter()
            .map(|kind| regex::escape(kind))
            .collect::<Vec<_>>()
            .join("|");

        Ok(Self {
            scope: scope.to_string(),
            allowed_kinds: allowed_kinds.to_vec(),
            package_pattern: Regex::new(&format!(r"^{}-([^-\s]+)-.*", escaped_scope))?,
            label_prefix: Regex::new(&format!(r"^{}-({})-", escaped_scope, kinds))?,
        })
    }

    pub fn accepts(&self, name: &str) -> bool {
        self.package_pattern
            .captures(name)
            .and_then(|caps| caps.get(1))
            .map(|kind| self.allowed_kinds.iter().any(|allowed| allowed == kind.as_str()))
            .unwrap_or(false)
    }

    pub fn filter(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates
            .into_iter()
            .filter(|candidate| {
                let keep = self.accepts(&candidate.name);
                if !keep {
                    tracing::trace!("Skipping {}", candidate.name);
                }
                keep
            })
            .collect()
    }

    pub fn output_filename(&self, name: &str) -> String {
        let prefix = format!("{}-", self.scope);
        let stem = name.strip_prefix(prefix.as_str()).unwrap_or(name);
        format!("{}.md", stem)
    }

    pub fn sidebar_label(&self, name: &str) -> String {
        self.label_prefix.replace(name, "").into_owned()
    }

    pub fn build_document(&self, name: &str, text: &str, strip_lines: usize) -> Document {
        Document {
            title: name.to_string(),
            sidebar_label: self.sidebar_label(name),
            body: strip_leading_lines(text, strip_lines),
        }
    }
}
