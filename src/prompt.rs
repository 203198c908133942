use crate::changes::Categories;
use crate::error::Result;
use tracing::debug;

const NEW_FILE_PREVIEW_CHARS: usize = 500;

pub const OUTPUT_CONTRACT: &str = r#"You are a git commit message expert. Based on the changes:
1. What is the main purpose of these changes?
2. What functionality is being modified?
3. Are there any significant code changes?

IMPORTANT: Return ONLY the commit message, without any analysis, explanation or preamble.
Format:
- First line: type(scope): brief description
- Optional second line: brief explanation if needed
- Max 72 chars per line
- Focus on the purpose of changes"#;

/// Per-file detail lookups backing the prompt. Failures are tolerated: the
/// file is left out of the prompt.
pub trait DetailSource {
    fn staged_diff(&self, path: &str) -> Result<String>;
    fn file_content(&self, path: &str) -> Result<String>;
}

pub fn build_prompt(categories: &Categories, source: &dyn DetailSource) -> String {
    let sections = [
        section("Added", added_details(&categories.added, source)),
        section("Modified", modified_details(&categories.modified, source)),
        section(
            "Deleted",
            categories
                .deleted
                .iter()
                .map(|path| format!("- {path} (removed)"))
                .collect(),
        ),
    ];

    let changes = sections.into_iter().flatten().collect::<Vec<_>>().join("\n");

    format!(
        "Analyze these repository changes and create a meaningful commit message:\n\n{}\n\n{}",
        changes, OUTPUT_CONTRACT
    )
}

fn section(label: &str, details: Vec<String>) -> Option<String> {
    if details.is_empty() {
        return None;
    }
    Some(format!("{label} files:\n{}", details.join("\n")))
}

fn added_details(paths: &[String], source: &dyn DetailSource) -> Vec<String> {
    paths
        .iter()
        .filter_map(|path| match source.file_content(path) {
            Ok(content) if !content.is_empty() => {
                let preview: String = content.chars().take(NEW_FILE_PREVIEW_CHARS).collect();
                Some(format!("- {path}\nNew content:\n{preview}"))
            }
            Ok(_) => None,
            Err(err) => {
                debug!(%path, %err, "skipping unreadable new file");
                None
            }
        })
        .collect()
}

fn modified_details(paths: &[String], source: &dyn DetailSource) -> Vec<String> {
    paths
        .iter()
        .filter_map(|path| match source.staged_diff(path) {
            Ok(diff) if !diff.is_empty() => Some(format!("- {path}\nDiff:\n{diff}")),
            Ok(_) => None,
            Err(err) => {
                debug!(%path, %err, "skipping file without staged diff");
                None
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashMap;

    /// In-memory lookups; paths missing from a map fail like an unreadable file.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        pub diffs: HashMap<String, String>,
        pub contents: HashMap<String, String>,
    }

    impl FakeSource {
        pub(crate) fn with_diff(mut self, path: &str, diff: &str) -> Self {
            self.diffs.insert(path.to_string(), diff.to_string());
            self
        }

        pub(crate) fn with_content(mut self, path: &str, content: &str) -> Self {
            self.contents.insert(path.to_string(), content.to_string());
            self
        }
    }

    impl DetailSource for FakeSource {
        fn staged_diff(&self, path: &str) -> Result<String> {
            self.diffs
                .get(path)
                .cloned()
                .ok_or_else(|| Error::Git(git2::Error::from_str(&format!("no diff for {path}"))))
        }

        fn file_content(&self, path: &str) -> Result<String> {
            self.contents.get(path).cloned().ok_or_else(|| {
                Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, path.to_string()))
            })
        }
    }

    fn categories(added: &[&str], modified: &[&str], deleted: &[&str]) -> Categories {
        let owned = |xs: &[&str]| -> Vec<String> { xs.iter().map(|s| s.to_string()).collect() };
        Categories {
            added: owned(added),
            modified: owned(modified),
            deleted: owned(deleted),
        }
    }

    #[test]
    fn build_prompt_includes_each_kind_of_detail() {
        let source = FakeSource::default()
            .with_content("a.txt", "hello")
            .with_diff("b.txt", "@@ -1 +1 @@\n-old\n+new\n");
        let prompt = build_prompt(&categories(&["a.txt"], &["b.txt"], &["c.txt"]), &source);

        assert!(prompt.contains("Added files:\n- a.txt\nNew content:\nhello"));
        assert!(prompt.contains("Modified files:\n- b.txt\nDiff:\n@@ -1 +1 @@\n-old\n+new\n"));
        assert!(prompt.contains("Deleted files:\n- c.txt (removed)"));

        let added = prompt.find("Added files:").unwrap();
        let modified = prompt.find("Modified files:").unwrap();
        let deleted = prompt.find("Deleted files:").unwrap();
        assert!(added < modified && modified < deleted);
    }

    #[test]
    fn build_prompt_omits_files_whose_lookup_failed() {
        let source = FakeSource::default()
            .with_content("empty.txt", "")
            .with_diff("same.txt", "");
        let cats = categories(
            &["missing.txt", "empty.txt"],
            &["broken.txt", "same.txt"],
            &[],
        );

        let prompt = build_prompt(&cats, &source);

        for path in ["missing.txt", "empty.txt", "broken.txt", "same.txt"] {
            assert!(!prompt.contains(path), "{path} should be omitted");
        }
        assert!(!prompt.contains("Added files:"));
        assert!(!prompt.contains("Modified files:"));
        assert_eq!(cats.len(), 4);
    }

    #[test]
    fn build_prompt_caps_new_file_content_at_500_chars() {
        let long = "é".repeat(600);
        let source = FakeSource::default().with_content("big.txt", &long);

        let prompt = build_prompt(&categories(&["big.txt"], &[], &[]), &source);

        assert!(prompt.contains(&"é".repeat(500)));
        assert!(!prompt.contains(&"é".repeat(501)));
    }

    #[test]
    fn build_prompt_ends_with_output_contract() {
        let prompt = build_prompt(&categories(&[], &[], &["gone.rs"]), &FakeSource::default());

        assert!(prompt.starts_with("Analyze these repository changes"));
        assert!(prompt.ends_with(OUTPUT_CONTRACT));
        assert!(prompt.contains("type(scope): brief description"));
        assert!(prompt.contains("Max 72 chars per line"));
    }
}
