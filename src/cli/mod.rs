use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive chat (default)
    Chat,

    /// Ask a single question and print the answer
    Ask {
        question: String,
    },
}
