//! The prompt fragments a run is configured with, and their assembly into the
//! full title-pass and abstract-pass prompts.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use papersift_core::{Candidate, PaperSiftError};

use crate::paper::{render_paper, render_title};
use crate::PromptTemplate;

pub const SYSTEM_PROMPT_FILE: &str = "system_prompt.txt";
pub const TOPICS_FILE: &str = "paper_topics.txt";
pub const SCORE_CRITERIA_FILE: &str = "score_criteria.txt";
pub const TITLE_POSTFIX_FILE: &str = "postfix_prompt_title.txt";
pub const ABSTRACT_POSTFIX_FILE: &str = "postfix_prompt_abstract.txt";

pub const DEFAULT_TITLE_INSTRUCTION: &str = "## Instruction\n\n\
Identify any papers that are absolutely and completely irrelevant to the criteria, and you are absolutely sure your friend will not enjoy, formatted as a list of arxiv ids like [\"ID1\", \"ID2\", \"ID3\"..].\n\
Be extremely cautious, and if you are unsure at all, do not add a paper in this list. You will check it in detail later.\n\
Directly respond with the list, do not add ANY extra text before or after the list.";

const TITLE_TEMPLATE: &str = "{{system}}\n\n{{topics}}\n\n## Papers\n\n{{papers}}\n\n{{instruction}}";
const ABSTRACT_TEMPLATE: &str =
    "{{system}}\n\n{{topics}}\n\n{{criteria}}\n\n## Papers\n\n{{papers}}\n\n{{instruction}}";

#[derive(Debug, Clone)]
pub struct PromptSet {
    system: String,
    topics: String,
    score_criteria: String,
    title_instruction: String,
    abstract_instruction: String,
}

impl PromptSet {
    pub fn new(
        system: impl Into<String>,
        topics: impl Into<String>,
        score_criteria: impl Into<String>,
        abstract_instruction: impl Into<String>,
    ) -> Self {
        Self {
            system: system.into(),
            topics: topics.into(),
            score_criteria: score_criteria.into(),
            title_instruction: DEFAULT_TITLE_INSTRUCTION.to_string(),
            abstract_instruction: abstract_instruction.into(),
        }
    }

    /// Reads the prompt files from `dir`. The title instruction file is
    /// optional; every other file must exist.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, PaperSiftError> {
        let dir = dir.as_ref();
        let read = |name: &str| -> Result<String, PaperSiftError> {
            let path = dir.join(name);
            fs::read_to_string(&path).map_err(|err| {
                PaperSiftError::InvalidConfig(format!(
                    "failed to read prompt file {}: {err}",
                    path.display()
                ))
            })
        };

        let mut prompts = Self::new(
            read(SYSTEM_PROMPT_FILE)?,
            read(TOPICS_FILE)?,
            read(SCORE_CRITERIA_FILE)?,
            read(ABSTRACT_POSTFIX_FILE)?,
        );

        let title_path = dir.join(TITLE_POSTFIX_FILE);
        if title_path.is_file() {
            prompts.title_instruction = read(TITLE_POSTFIX_FILE)?;
        } else {
            tracing::debug!(path = %title_path.display(), "using built-in title instruction");
        }

        Ok(prompts)
    }

    /// Prompt asking the model to list the certainly irrelevant papers of
    /// `batch` by id.
    pub fn title_prompt(&self, batch: &[Candidate]) -> String {
        let papers: Vec<String> = batch.iter().map(render_title).collect();
        let vars = HashMap::from([
            ("system", self.system.clone()),
            ("topics", self.topics.clone()),
            ("papers", papers.join("\n\n")),
            ("instruction", self.title_instruction.clone()),
        ]);
        PromptTemplate::new(TITLE_TEMPLATE).render(&vars)
    }

    /// Prompt asking the model for one scored JSON record per paper.
    pub fn abstract_prompt(&self, batch: &[Candidate]) -> String {
        let papers: Vec<String> = batch.iter().map(render_paper).collect();
        let vars = HashMap::from([
            ("system", self.system.clone()),
            ("topics", self.topics.clone()),
            ("criteria", self.score_criteria.clone()),
            ("papers", papers.join("\n\n")),
            ("instruction", self.abstract_instruction.clone()),
        ]);
        PromptTemplate::new(ABSTRACT_TEMPLATE).render(&vars)
    }
}
