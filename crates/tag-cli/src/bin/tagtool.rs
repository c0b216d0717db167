use clap::{Parser, Subcommand};

use tag_cli::commands::{complete_ops, config_ops, scan_ops};

#[derive(Parser)]
#[command(name = "tagtool", about = "Trigger autocomplete diagnostics")]
struct Cli {
    /// Custom settings TOML (defaults to the embedded settings)
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the trigger token ending at the caret
    Scan {
        /// Document text; each line is a block
        text: String,
        /// Caret offset in chars within the last line (default: end)
        #[arg(long)]
        caret: Option<usize>,
        /// Trigger char (default: from settings)
        #[arg(long)]
        trigger: Option<char>,
    },
    /// Filter a candidate list by query
    Filter {
        /// JSON array of candidates
        candidates_file: String,
        /// Query text (without the trigger)
        query: String,
        /// Match keywords case-insensitively
        #[arg(long)]
        ignore_case: bool,
        /// Maximum number of results (default: from settings)
        #[arg(short, long)]
        n: Option<usize>,
    },
    /// Replace the token at the caret with a candidate as a tag entity
    Complete {
        /// Document text; each line is a block
        text: String,
        /// JSON array of candidates
        candidates_file: String,
        /// Value of the candidate to commit
        value: String,
        /// Caret offset in chars within the last line (default: end)
        #[arg(long)]
        caret: Option<usize>,
        /// Print the resulting document as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render every block of a JSON document as HTML
    Render {
        /// Serialized document
        document_file: String,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Some(file) = &cli.config {
        config_ops::load_config(file);
    }

    match cli.command {
        Command::Scan {
            text,
            caret,
            trigger,
        } => scan_ops::scan_cmd(&text, caret, trigger),
        Command::Filter {
            candidates_file,
            query,
            ignore_case,
            n,
        } => scan_ops::filter_cmd(&candidates_file, &query, ignore_case, n),
        Command::Complete {
            text,
            candidates_file,
            value,
            caret,
            json,
        } => complete_ops::complete_cmd(&text, &candidates_file, &value, caret, json),
        Command::Render { document_file } => complete_ops::render_cmd(&document_file),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
