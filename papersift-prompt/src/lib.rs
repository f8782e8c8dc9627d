mod paper;
mod prompt_set;
mod template;

pub use paper::{render_paper, render_title, ABSTRACT_CUTOFF};
pub use prompt_set::{PromptSet, DEFAULT_TITLE_INSTRUCTION};
pub use template::PromptTemplate;
