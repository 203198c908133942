use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "commitsmith",
    version,
    about = "Draft commit messages for your staged changes",
    long_about = "Reads the staged changes of the current git repository, asks Gemini for a conventional commit message, lets you review it, and commits."
)]
pub struct Args {
    #[arg(long, help = "Open the final message in your editor before committing")]
    pub edit: bool,

    #[arg(long, help = "Print the message without committing")]
    pub dry_run: bool,

    #[arg(long, help = "Gemini model to use (overrides the config file)")]
    pub model: Option<String>,

    #[arg(short, long, help = "Log debug output to stderr")]
    pub verbose: bool,
}
