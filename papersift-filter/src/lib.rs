//! Two-stage LLM filtering of candidate papers.
//!
//! The title stage drops papers the model is certain are irrelevant; the
//! abstract stage scores the survivors for relevance and novelty and keeps
//! those meeting both cutoffs.

mod abstract_pass;
mod config;
mod io;
mod pipeline;
mod record;
mod stage;
mod title;

pub use abstract_pass::{filter_by_abstract, AbstractOutcome, AbstractPass};
pub use config::FilterConfig;
pub use io::{CandidateSource, ReportSink};
pub use pipeline::{Pipeline, PipelineReport};
pub use record::ModelScore;
pub use stage::StageContext;
pub use title::{filter_by_title, TitleOutcome, TitlePass};
