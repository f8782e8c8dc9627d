pub mod app;
pub mod cli;
pub mod config;
pub mod sink;
pub mod source;

pub use app::{run, NoLlm};
pub use cli::{Cli, Commands, RunArgs};
pub use config::AppConfig;
pub use sink::JsonReportSink;
pub use source::JsonCandidateSource;
