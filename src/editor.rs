//! Editing a message through an external program.
//!
//! The message is written to a temp file, the editor runs against its path,
//! and the file is read back. The temp file is owned by a [`tempfile::TempPath`]
//! guard, so it is removed when [`edit_in_editor`] returns on any path.

use crate::draft::Console;
use crate::error::EditorError;
use crate::git::GitRepo;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// `core.editor`, then `$EDITOR`, then a platform default.
pub fn resolve_editor(repo: &GitRepo) -> String {
    repo.config_string("core.editor")
        .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
        .unwrap_or_else(platform_default_editor)
}

fn platform_default_editor() -> String {
    if cfg!(target_os = "windows") {
        "notepad".to_string()
    } else {
        ["nano", "vi"]
            .into_iter()
            .find(|candidate| which::which(candidate).is_ok())
            .unwrap_or("vi")
            .to_string()
    }
}

pub fn edit_in_editor(editor: &str, message: &str) -> Result<String, EditorError> {
    let mut file = tempfile::Builder::new()
        .prefix("commitsmith_msg_")
        .suffix(".txt")
        .tempfile()?;
    file.write_all(message.as_bytes())?;
    file.flush()?;

    // Close our handle; the guard still deletes the path on drop.
    let path = file.into_temp_path();

    run_editor(editor, &path)?;
    Ok(fs::read_to_string(&path)?.trim().to_string())
}

fn run_editor(editor: &str, path: &Path) -> Result<(), EditorError> {
    if editor.trim().is_empty() {
        return Err(EditorError::NoEditor);
    }

    debug!(%editor, path = %path.display(), "launching editor");
    let status = editor_command(editor, path)?
        .status()
        .map_err(|source| EditorError::Spawn {
            editor: editor.to_string(),
            source,
        })?;

    if !status.success() {
        return Err(EditorError::Failed(status));
    }
    Ok(())
}

/// The editor string goes through the shell, the same way git runs
/// `core.editor`, so quoted paths and extra arguments survive.
#[cfg(not(windows))]
fn editor_command(editor: &str, path: &Path) -> Result<Command, EditorError> {
    let mut command = Command::new("sh");
    command
        .arg("-c")
        .arg(format!("{editor} \"$@\""))
        .arg(editor)
        .arg(path);
    Ok(command)
}

#[cfg(windows)]
fn editor_command(editor: &str, path: &Path) -> Result<Command, EditorError> {
    let mut parts = split_command(editor).into_iter();
    let program = parts.next().ok_or(EditorError::NoEditor)?;
    let mut command = Command::new(program);
    command.args(parts).arg(path);
    Ok(command)
}

/// Splits on whitespace outside single or double quotes.
#[cfg(any(windows, test))]
fn split_command(command: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote = None;
    let mut in_word = false;

    for c in command.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    parts.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        parts.push(current);
    }
    parts
}

/// Editor failures and empty results keep the original message.
pub fn edit_message(editor: &str, message: &str, console: &mut dyn Console) -> String {
    match edit_in_editor(editor, message) {
        Ok(edited) if !edited.is_empty() => edited,
        Ok(_) => {
            console.warn("Edited message is empty, keeping original message");
            message.to_string()
        }
        Err(err) => {
            debug!(%err, "editor failed");
            console.warn(&format!(
                "Editor '{editor}' failed, keeping original message ({err})"
            ));
            message.to_string()
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::draft::tests::ScriptedConsole;
    use std::path::PathBuf;

    /// A `sh <script>` editor command. The script records the path it was
    /// given if that path existed when it ran, then runs `body`.
    fn fake_editor(dir: &Path, body: &str) -> (String, PathBuf) {
        let record = dir.join("record.txt");
        let script = dir.join("editor.sh");
        let text = format!(
            "if [ -f \"$1\" ]; then echo \"$1\" > '{}'; fi\n{}\n",
            record.display(),
            body
        );
        fs::write(&script, text).unwrap();
        (format!("sh {}", script.display()), record)
    }

    fn recorded_path(record: &Path) -> PathBuf {
        let line = fs::read_to_string(record).expect("editor did not see the temp file");
        PathBuf::from(line.trim())
    }

    #[test]
    fn edit_in_editor_returns_edited_text_and_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let (editor, record) = fake_editor(dir.path(), "printf 'fix(git): edited\\n\\n' > \"$1\"");

        let edited = edit_in_editor(&editor, "feat: original").unwrap();

        assert_eq!(edited, "fix(git): edited");
        let temp_path = recorded_path(&record);
        assert!(temp_path.to_string_lossy().ends_with(".txt"));
        assert!(!temp_path.exists());
    }

    #[test]
    fn edit_in_editor_passes_original_content() {
        let dir = tempfile::tempdir().unwrap();
        let copy = dir.path().join("seen.txt");
        let (editor, _) = fake_editor(dir.path(), &format!("cp \"$1\" '{}'", copy.display()));

        let edited = edit_in_editor(&editor, "feat: keep me").unwrap();

        assert_eq!(fs::read_to_string(copy).unwrap(), "feat: keep me");
        assert_eq!(edited, "feat: keep me");
    }

    #[test]
    fn edit_in_editor_removes_temp_file_when_editor_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (editor, record) = fake_editor(dir.path(), "exit 3");

        let result = edit_in_editor(&editor, "feat: original");

        assert!(matches!(result, Err(EditorError::Failed(_))));
        assert!(!recorded_path(&record).exists());
    }

    #[test]
    fn edit_in_editor_reports_missing_program() {
        let result = edit_in_editor("/nonexistent/commitsmith-editor", "feat: x");
        assert!(matches!(result, Err(EditorError::Failed(_))));
        assert!(matches!(edit_in_editor("   ", "feat: x"), Err(EditorError::NoEditor)));
    }

    #[test]
    fn edit_in_editor_handles_quoted_path_with_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let tools = dir.path().join("My Tools");
        fs::create_dir(&tools).unwrap();
        let script = tools.join("edit.sh");
        fs::write(&script, "printf 'docs: from spaced path\\n' > \"$1\"\n").unwrap();

        let editor = format!("sh \"{}\"", script.display());
        let edited = edit_in_editor(&editor, "feat: original").unwrap();

        assert_eq!(edited, "docs: from spaced path");
    }

    #[test]
    fn split_command_honours_quotes() {
        assert_eq!(
            split_command(r#""C:\Program Files\Editor\edit.exe" --wait"#),
            vec![r"C:\Program Files\Editor\edit.exe", "--wait"]
        );
        assert_eq!(split_command("code  -w 'a b'"), vec!["code", "-w", "a b"]);
        assert_eq!(split_command(r#"vim """#), vec!["vim", ""]);
        assert!(split_command("   ").is_empty());
    }

    #[test]
    fn edit_message_keeps_original_on_failure_or_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let (failing, _) = fake_editor(dir.path(), "exit 1");
        let mut console = ScriptedConsole::default();

        let kept = edit_message(&failing, "feat: original", &mut console);

        assert_eq!(kept, "feat: original");
        assert!(console.warnings[0].starts_with(&format!("Editor '{failing}' failed")));

        let empty_dir = tempfile::tempdir().unwrap();
        let (emptying, _) = fake_editor(empty_dir.path(), ": > \"$1\"");
        let kept = edit_message(&emptying, "feat: original", &mut console);

        assert_eq!(kept, "feat: original");
        assert_eq!(console.warnings.len(), 2);
    }

    #[test]
    fn resolve_editor_prefers_git_config() {
        let dir = tempfile::tempdir().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();
        repo.config().unwrap().set_str("core.editor", "micro").unwrap();

        let repo = GitRepo::from_repository(repo);

        assert_eq!(resolve_editor(&repo), "micro");
    }
}
