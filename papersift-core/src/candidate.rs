use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// One paper under consideration for the report.
///
/// Identity is the external id alone: two candidates with the same id are the
/// same paper even if an upstream re-fetch changed the other fields.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Candidate {
    #[serde(alias = "arxiv_id")]
    id: String,
    title: String,
    #[serde(rename = "abstract")]
    summary: String,
    #[serde(default)]
    authors: Vec<String>,
}

impl Candidate {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
        authors: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            summary: summary.into(),
            authors,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The paper abstract.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Candidate {}

impl Hash for Candidate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.title)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Scores {
    pub relevance: i64,
    pub novelty: i64,
}

impl Scores {
    pub fn total(&self) -> i64 {
        self.relevance + self.novelty
    }

    /// Both criteria must reach their cutoff; boundaries are inclusive.
    pub fn passes(&self, cutoffs: &Cutoffs) -> bool {
        self.relevance >= cutoffs.relevance_min && self.novelty >= cutoffs.novelty_min
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Cutoffs {
    pub relevance_min: i64,
    pub novelty_min: i64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub candidate: Candidate,
    #[serde(flatten)]
    pub scores: Scores,
    pub score: i64,
    pub comment: String,
}

impl ScoredRecord {
    pub fn new(candidate: Candidate, scores: Scores, comment: impl Into<String>) -> Self {
        Self {
            candidate,
            score: scores.total(),
            scores,
            comment: comment.into(),
        }
    }

    pub fn id(&self) -> &str {
        self.candidate.id()
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    TitleFiltered,
    ScoreFiltered,
    AuthorMatch,
    HIndexFiltered,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Rejection {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub reason: RejectionReason,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Scores>,
}

impl Rejection {
    pub fn title_filtered(candidate: Candidate) -> Self {
        Self {
            candidate,
            reason: RejectionReason::TitleFiltered,
            detail: "Title filtered".to_string(),
            scores: None,
        }
    }

    pub fn score_filtered(record: ScoredRecord) -> Self {
        let detail = format!(
            "Score filtered (relevance={}, novelty={}): {}",
            record.scores.relevance, record.scores.novelty, record.comment
        );
        Self {
            candidate: record.candidate,
            reason: RejectionReason::ScoreFiltered,
            detail,
            scores: Some(record.scores),
        }
    }

    pub fn id(&self) -> &str {
        self.candidate.id()
    }
}

/// A candidate that survived filtering.
///
/// `Unscored` only occurs when the abstract pass is switched off.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Accepted {
    Scored(ScoredRecord),
    Unscored(Candidate),
}

impl Accepted {
    pub fn id(&self) -> &str {
        match self {
            Accepted::Scored(record) => record.id(),
            Accepted::Unscored(candidate) => candidate.id(),
        }
    }

    pub fn score(&self) -> i64 {
        match self {
            Accepted::Scored(record) => record.score,
            Accepted::Unscored(_) => 0,
        }
    }

    pub fn relevance(&self) -> i64 {
        match self {
            Accepted::Scored(record) => record.scores.relevance,
            Accepted::Unscored(_) => 0,
        }
    }
}

/// Orders accepted papers best first: score, then relevance, then id.
pub fn sort_accepted(accepted: &mut [Accepted]) {
    accepted.sort_by(|a, b| {
        b.score()
            .cmp(&a.score())
            .then_with(|| b.relevance().cmp(&a.relevance()))
            .then_with(|| a.id().cmp(b.id()))
    });
}
