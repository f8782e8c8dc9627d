use std::path::PathBuf;

use papersift_core::{Candidate, PaperSiftError};
use papersift_filter::CandidateSource;

/// Candidates from a JSON array file, as written by the feed fetcher.
///
/// Records are returned as stored; repeated ids are collapsed by the pipeline.
#[derive(Debug, Clone)]
pub struct JsonCandidateSource {
    path: PathBuf,
}

impl JsonCandidateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl CandidateSource for JsonCandidateSource {
    async fn candidates(&self) -> Result<Vec<Candidate>, PaperSiftError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        let candidates: Vec<Candidate> = serde_json::from_str(&text)?;
        tracing::info!(path = %self.path.display(), papers = candidates.len(), "loaded candidates");
        Ok(candidates)
    }
}
