use crate::changes::Categories;
use crate::error::GenerationError;
use crate::prompt::{DetailSource, build_prompt};
use tracing::debug;

const NOTHING_STAGED: &str = "No changes staged for commit. Please use 'git add' first.";

/// A text-generation backend. One synchronous call per draft.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Everything the pipeline says to or asks of the user.
pub trait Console {
    fn notice(&mut self, text: &str);
    fn warn(&mut self, text: &str);
    fn show_message(&mut self, title: &str, message: &str);
    /// Raw answer to a question; `None` when input is closed.
    fn ask(&mut self, question: &str) -> Option<String>;
    /// Offer `initial` for revision and return what the user typed.
    fn revise(&mut self, initial: &str) -> String;

    /// Re-asks until the answer is `y` or `n`. Closed input counts as `n`.
    fn confirm(&mut self, question: &str) -> bool {
        loop {
            match self.ask(question) {
                None => return false,
                Some(answer) => match answer.trim().to_lowercase().as_str() {
                    "y" => return true,
                    "n" => return false,
                    _ => self.notice("Please enter 'y' or 'n'"),
                },
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draft {
    Approved(String),
    Edited(String),
    Fallback(String),
}

impl Draft {
    pub fn message(&self) -> &str {
        match self {
            Draft::Approved(m) | Draft::Edited(m) | Draft::Fallback(m) => m,
        }
    }

    pub fn into_message(self) -> String {
        match self {
            Draft::Approved(m) | Draft::Edited(m) | Draft::Fallback(m) => m,
        }
    }
}

/// Count-based summary used when the service is unavailable or untrusted.
/// Empty categories yield an empty message.
pub fn fallback_message(categories: &Categories) -> String {
    [
        ("add", categories.added.len()),
        ("update", categories.modified.len()),
        ("remove", categories.deleted.len()),
    ]
    .into_iter()
    .filter(|(_, count)| *count > 0)
    .map(|(verb, count)| format!("{verb}: {count} files"))
    .collect::<Vec<_>>()
    .join(" | ")
}

/// Rejects empty answers and the `update:` prefix, which mimics the
/// fallback summary rather than describing the change.
pub fn validate_response(raw: &str) -> Result<String, GenerationError> {
    let message = raw.trim();
    if message.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    if message.to_lowercase().starts_with("update:") {
        return Err(GenerationError::LowQualityResponse(
            "message starts with 'update:'".to_string(),
        ));
    }
    Ok(message.to_string())
}

pub struct Drafter<'a> {
    generator: &'a dyn TextGenerator,
    console: &'a mut dyn Console,
}

impl<'a> Drafter<'a> {
    pub fn new(generator: &'a dyn TextGenerator, console: &'a mut dyn Console) -> Self {
        Self { generator, console }
    }

    pub fn draft(&mut self, categories: &Categories, source: &dyn DetailSource) -> Draft {
        if categories.is_empty() {
            debug!("no categorized changes, skipping generation");
            return self.fallback(categories);
        }

        match self.generate(categories, source) {
            Ok(message) => self.review(message),
            Err(err) => {
                debug!(%err, "generation failed");
                self.console
                    .warn(&format!("Using fallback message ({err})"));
                self.fallback(categories)
            }
        }
    }

    fn generate(
        &mut self,
        categories: &Categories,
        source: &dyn DetailSource,
    ) -> Result<String, GenerationError> {
        let prompt = build_prompt(categories, source);
        self.console.notice("Analyzing changes...");
        let raw = self.generator.generate(&prompt)?;
        validate_response(&raw)
    }

    fn review(&mut self, message: String) -> Draft {
        self.console.show_message("Generated commit message:", &message);

        if !self.console.confirm("Would you like to edit this message? (y/n): ") {
            return Draft::Approved(message);
        }

        let revised = self.console.revise(&message);
        let revised = revised.trim();
        if revised.is_empty() {
            Draft::Approved(message)
        } else {
            Draft::Edited(revised.to_string())
        }
    }

    fn fallback(&mut self, categories: &Categories) -> Draft {
        let message = fallback_message(categories);
        if message.is_empty() {
            self.console.notice(NOTHING_STAGED);
        }
        Draft::Fallback(message)
    }
}
