use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Untracked,
    Renamed,
    Other(String),
}

impl ChangeStatus {
    pub fn from_delta(delta: git2::Delta) -> Self {
        match delta {
            git2::Delta::Added => ChangeStatus::Added,
            git2::Delta::Modified => ChangeStatus::Modified,
            git2::Delta::Deleted => ChangeStatus::Deleted,
            git2::Delta::Untracked => ChangeStatus::Untracked,
            git2::Delta::Renamed => ChangeStatus::Renamed,
            git2::Delta::Copied => ChangeStatus::Other("C".to_string()),
            git2::Delta::Typechange => ChangeStatus::Other("T".to_string()),
            git2::Delta::Conflicted => ChangeStatus::Other("U".to_string()),
            other => ChangeStatus::Other(format!("{other:?}")),
        }
    }

    /// Short-status marker.
    pub fn code(&self) -> &str {
        match self {
            ChangeStatus::Added => "A",
            ChangeStatus::Modified => "M",
            ChangeStatus::Deleted => "D",
            ChangeStatus::Untracked => "??",
            ChangeStatus::Renamed => "R",
            ChangeStatus::Other(code) => code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub status: ChangeStatus,
    pub path: String,
}

impl Change {
    pub fn new(status: ChangeStatus, path: impl Into<String>) -> Self {
        Self {
            status,
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
}

impl Categories {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len()
    }
}

/// Renames count as modifications of the new path. Anything else outside
/// A/M/D/?? is dropped.
pub fn categorize(changes: &[Change]) -> Categories {
    let mut categories = Categories::default();

    for change in changes {
        let bucket = match change.status {
            ChangeStatus::Added | ChangeStatus::Untracked => &mut categories.added,
            ChangeStatus::Modified | ChangeStatus::Renamed => &mut categories.modified,
            ChangeStatus::Deleted => &mut categories.deleted,
            ChangeStatus::Other(ref code) => {
                debug!(path = %change.path, code = %code, "dropping change with unrecognized status");
                continue;
            }
        };
        bucket.push(change.path.clone());
    }

    categories
}
