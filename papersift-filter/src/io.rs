use papersift_core::{Candidate, PaperSiftError};

use crate::PipelineReport;

/// Supplies the candidates for one run, ordered and unique by id.
#[async_trait::async_trait]
pub trait CandidateSource: Send + Sync {
    async fn candidates(&self) -> Result<Vec<Candidate>, PaperSiftError>;
}

#[async_trait::async_trait]
impl CandidateSource for Vec<Candidate> {
    async fn candidates(&self) -> Result<Vec<Candidate>, PaperSiftError> {
        Ok(self.clone())
    }
}

/// Receives the finished report.
#[async_trait::async_trait]
pub trait ReportSink: Send + Sync {
    async fn publish(&self, report: &PipelineReport) -> Result<(), PaperSiftError>;
}
