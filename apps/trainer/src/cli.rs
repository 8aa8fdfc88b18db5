use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vocab-trainer",
    about = "Vocabulary trainer: review scheduling over a CSV word list",
    version
)]
pub struct Cli {
    /// Data directory holding vocab.csv, history.csv and config.json
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// A pre-recorded answer for one review entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Answer {
    Correct,
    Wrong,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the next review batch for the configured language and level
    Due {
        /// Batch size
        #[arg(long)]
        top: Option<usize>,
    },

    /// Show new entries the next learn session would offer
    New {
        /// Number of new entries
        #[arg(long, default_value_t = 5)]
        goal: usize,
    },

    /// Grade the next review batch with answers given in batch order
    Review {
        /// One answer per entry; the batch stops where the answers run out
        #[arg(long = "answer", value_enum, value_delimiter = ',')]
        answers: Vec<Answer>,

        /// Accept an offered level advancement
        #[arg(long)]
        accept_advance: bool,
    },

    /// Mark new entries as learned
    Learn {
        /// Number of new entries offered
        #[arg(long, default_value_t = 5)]
        goal: usize,

        /// Words to mark as learned (default: every offered entry)
        #[arg(long = "mark", value_delimiter = ',')]
        marks: Vec<String>,
    },

    /// Look up a word in the configured language
    Lookup {
        word: String,
    },

    /// Add a word, or extend the existing entry if it is already stored
    Add {
        #[arg(long)]
        word: String,

        #[arg(long)]
        meaning: String,

        #[arg(long)]
        language: String,

        /// Difficulty level 1-5
        #[arg(long)]
        level: String,

        #[arg(long, default_value = "")]
        phonetic: String,

        /// Part of speech
        #[arg(long = "type", default_value = "")]
        word_type: String,

        #[arg(long, default_value = "")]
        category: String,

        #[arg(long, default_value = "")]
        example: String,
    },

    /// Append a meaning and/or example to an existing word
    Augment {
        word: String,

        #[arg(long)]
        meaning: Option<String>,

        #[arg(long)]
        example: Option<String>,
    },

    /// Show the learner level, or set it
    Level {
        level: Option<u8>,
    },

    /// Show the study language, or switch it
    Language {
        language: Option<String>,
    },

    /// Words most recently answered wrong
    Mistakes {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// Learning summary over the history log
    Summary,
}
