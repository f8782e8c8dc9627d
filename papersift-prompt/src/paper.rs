use papersift_core::Candidate;

/// Abstracts are cut to this many characters to bound prompt size.
pub const ABSTRACT_CUTOFF: usize = 4000;

/// Id and title only, for the title pass.
pub fn render_title(candidate: &Candidate) -> String {
    format!("ArXiv ID: {}\nTitle: {}", candidate.id(), candidate.title())
}

/// Full paper text for the abstract pass.
pub fn render_paper(candidate: &Candidate) -> String {
    let summary: String = candidate.summary().chars().take(ABSTRACT_CUTOFF).collect();
    format!(
        "ArXiv ID: {}\nTitle: {}\nAuthors: {}\nAbstract: {}",
        candidate.id(),
        candidate.title(),
        candidate.authors().join(", "),
        summary
    )
}
