//! Command handlers for the `vocab-trainer` binary.

use crate::cli::{Answer, Commands};
use crate::config::ConfigProvider;
use crate::session::{Grade, Learner};
use crate::state::AppState;
use crate::store::date_utils::adjusted_today;
use anyhow::{bail, Context};
use serde::Serialize;
use serde_json::json;
use std::collections::{HashSet, VecDeque};
use vocab_core::ingest::{Augmentation, NewEntry};
use vocab_core::types::{normalize_key, Language, Level, VocabEntry};

/// Learner driven by answers supplied up front.
pub struct PresetLearner {
    answers: VecDeque<Answer>,
    marks: Option<HashSet<String>>,
    accept_advance: bool,
}

impl PresetLearner {
    pub fn new(answers: Vec<Answer>, marks: Vec<String>, accept_advance: bool) -> Self {
        let marks = (!marks.is_empty()).then(|| marks.iter().map(|w| normalize_key(w)).collect());
        Self {
            answers: answers.into(),
            marks,
            accept_advance,
        }
    }
}

impl Learner for PresetLearner {
    fn grade(&mut self, _entry: &VocabEntry) -> Grade {
        match self.answers.pop_front() {
            Some(Answer::Correct) => Grade::Correct,
            Some(Answer::Wrong) => Grade::Wrong,
            None => Grade::Stop,
        }
    }

    fn mark_learned(&mut self, entry: &VocabEntry) -> Grade {
        match &self.marks {
            Some(marks) if !marks.contains(&entry.key()) => Grade::Wrong,
            _ => Grade::Correct,
        }
    }

    fn confirm_advance(&mut self, _from: Level, _to: Level, _ratio: f64) -> bool {
        self.accept_advance
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn execute(state: &AppState, command: Commands) -> anyhow::Result<()> {
    let trainer = &state.trainer;
    // Level and language changes must work while config.json is invalid,
    // so the config is only read by commands that use it.
    let config = || trainer.config().current();
    let today = || -> anyhow::Result<_> { Ok(adjusted_today(config()?.daily_reset_hour)) };

    match command {
        Commands::Due { top } => print_json(&trainer.due(today()?, top)?),

        Commands::New { goal } => print_json(&trainer.learn_candidates(goal)?),

        Commands::Review {
            answers,
            accept_advance,
        } => {
            let mut learner = PresetLearner::new(answers, Vec::new(), accept_advance);
            let report = trainer.review_batch(&mut learner, today()?)?;
            let mistakes = trainer.recent_wrong(crate::session::RECENT_WRONG_LIMIT)?;
            print_json(&json!({ "review": report, "recent_wrong": mistakes }))
        }

        Commands::Learn { goal, marks } => {
            let mut learner = PresetLearner::new(Vec::new(), marks, false);
            print_json(&trainer.learn_batch(&mut learner, goal, today()?)?)
        }

        Commands::Lookup { word } => match trainer.lookup(&word)? {
            Some(entry) => print_json(&entry),
            None => bail!("{word:?} not found in {}", config()?.language),
        },

        Commands::Add {
            word,
            meaning,
            language,
            level,
            phonetic,
            word_type,
            category,
            example,
        } => {
            let new = NewEntry {
                word,
                meaning,
                phonetic,
                language,
                word_type,
                category,
                example,
                level,
            };
            print_json(&trainer.add(&new, today()?)?)
        }

        Commands::Augment {
            word,
            meaning,
            example,
        } => print_json(&trainer.augment(&word, &Augmentation { meaning, example })?),

        Commands::Level { level: None } => {
            let config = config()?;
            print_json(&json!({
                "level": config.user_level,
                "name": config.user_level.name(),
                "language": config.language,
            }))
        }

        Commands::Level { level: Some(n) } => {
            let level = Level::try_from(n).context("level must be between 1 and 5")?;
            let level = trainer.set_level(level)?;
            print_json(&json!({ "level": level, "name": level.name() }))
        }

        Commands::Language { language: None } => {
            print_json(&json!({ "language": config()?.language }))
        }

        Commands::Language {
            language: Some(name),
        } => {
            if name.trim().is_empty() {
                bail!("language must not be empty");
            }
            let language = trainer.set_language(Language::parse(&name))?;
            print_json(&json!({ "language": language }))
        }

        Commands::Mistakes { limit } => print_json(&trainer.recent_wrong(limit)?),

        Commands::Summary => print_json(&trainer.summary()?),
    }
}
