mod batch;
mod candidate;
mod error;
mod llm;
pub mod output_parsers;
mod pricing;
pub mod retry;

pub use batch::{batched, BatchSizing};
pub use candidate::{
    sort_accepted, Accepted, Candidate, Cutoffs, Rejection, RejectionReason, ScoredRecord, Scores,
};
pub use error::{is_retryable, PaperSiftError};
pub use llm::{CompletionLlm, LlmRequest, LlmResponse, Message, Role, TokenUsage, DEFAULT_SEED};
pub use output_parsers::{parse_id_list, parse_record_stream, RecordStream};
pub use pricing::{CallCost, CostAccumulator, ModelPrice, PricingTable};
pub use retry::{resolve_with_retry, Exhaustion, PassOutput, PassResult, ResolvingPass, Resolved};
