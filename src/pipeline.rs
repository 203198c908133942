//! One invocation: list, categorize, draft, optionally edit, commit.

use crate::args::Args;
use crate::changes;
use crate::draft::{Console, Draft, Drafter, TextGenerator};
use crate::editor;
use crate::error::Result;
use crate::git::{self, GitRepo};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing in the index.
    NothingStaged,
    /// Changes were listed but no message could be produced.
    Aborted,
    DryRun(String),
    Committed(String),
}

pub fn run_pipeline(
    repo: &GitRepo,
    generator: &dyn TextGenerator,
    console: &mut dyn Console,
    args: &Args,
) -> Result<Outcome> {
    let changes = repo.staged_changes()?;
    if changes.is_empty() {
        console.notice("No changes to commit!");
        return Ok(Outcome::NothingStaged);
    }
    for change in &changes {
        debug!(status = change.status.code(), path = %change.path, "staged");
    }

    let categories = changes::categorize(&changes);
    debug!(files = categories.len(), "categorized");

    let draft = Drafter::new(generator, &mut *console).draft(&categories, repo);
    debug!(
        fallback = matches!(draft, Draft::Fallback(_)),
        chars = draft.message().len(),
        "draft ready"
    );

    let mut message = draft.into_message();
    if message.is_empty() {
        return Ok(Outcome::Aborted);
    }

    if args.edit {
        let editor = editor::resolve_editor(repo);
        message = editor::edit_message(&editor, &message, console);
    }

    if args.dry_run {
        console.show_message("Dry run, not committing:", &message);
        return Ok(Outcome::DryRun(message));
    }

    git::commit_with_git_cli(&repo.root(), &message)?;
    console.notice(&format!("Committed with message:\n{message}"));
    Ok(Outcome::Committed(message))
}
