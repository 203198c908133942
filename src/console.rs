use crate::draft::Console;
use crossterm::style::Stylize;
use std::io::{self, BufRead, Write};

const RULE_WIDTH: usize = 50;

/// Plain stdin/stdout console. Warnings go to stderr.
pub struct TerminalConsole<R> {
    input: R,
}

impl TerminalConsole<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self {
            input: io::stdin().lock(),
        }
    }
}

impl<R: BufRead> TerminalConsole<R> {
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl<R: BufRead> Console for TerminalConsole<R> {
    fn notice(&mut self, text: &str) {
        println!("{text}");
    }

    fn warn(&mut self, text: &str) {
        eprintln!("{} {}", "Warning:".yellow().bold(), text);
    }

    fn show_message(&mut self, title: &str, message: &str) {
        let rule = "-".repeat(RULE_WIDTH);
        println!("\n{}", title.bold());
        println!("{}", rule.as_str().dark_grey());
        println!("{message}");
        println!("{}", rule.as_str().dark_grey());
    }

    fn ask(&mut self, question: &str) -> Option<String> {
        print!("\n{question}");
        let _ = io::stdout().flush();
        self.read_line()
    }

    fn revise(&mut self, initial: &str) -> String {
        println!("Edit commit message (empty line keeps it):");
        println!("{}", initial.dark_grey());
        print!("> ");
        let _ = io::stdout().flush();
        self.read_line().unwrap_or_default()
    }
}
