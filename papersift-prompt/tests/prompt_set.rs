use std::fs;

use papersift_core::{Candidate, PaperSiftError};
use papersift_prompt::{render_paper, PromptSet, ABSTRACT_CUTOFF, DEFAULT_TITLE_INSTRUCTION};

fn candidate(id: &str, title: &str, summary: &str) -> Candidate {
    Candidate::new(
        id,
        title,
        summary,
        vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()],
    )
}

fn prompts() -> PromptSet {
    PromptSet::new("SYSTEM", "TOPICS", "CRITERIA", "RESPOND WITH JSON LINES")
}

#[test]
fn title_prompt_lists_ids_and_titles_only() {
    let batch = vec![
        candidate("2401.00001", "First", "abstract one"),
        candidate("2401.00002", "Second", "abstract two"),
    ];
    let prompt = prompts().title_prompt(&batch);

    let expected = format!(
        "SYSTEM\n\nTOPICS\n\n## Papers\n\n\
ArXiv ID: 2401.00001\nTitle: First\n\n\
ArXiv ID: 2401.00002\nTitle: Second\n\n{DEFAULT_TITLE_INSTRUCTION}"
    );
    assert_eq!(prompt, expected);
    assert!(!prompt.contains("abstract one"));
}

#[test]
fn abstract_prompt_includes_criteria_and_full_text() {
    let batch = vec![candidate("2401.00001", "First", "abstract one")];
    let prompt = prompts().abstract_prompt(&batch);

    assert_eq!(
        prompt,
        "SYSTEM\n\nTOPICS\n\nCRITERIA\n\n## Papers\n\n\
ArXiv ID: 2401.00001\nTitle: First\nAuthors: Ada Lovelace, Alan Turing\nAbstract: abstract one\n\n\
RESPOND WITH JSON LINES"
    );
}

#[test]
fn long_abstracts_are_truncated_by_characters() {
    let summary = "é".repeat(ABSTRACT_CUTOFF + 10);
    let rendered = render_paper(&candidate("x", "t", &summary));
    let body = rendered.split("Abstract: ").nth(1).unwrap();
    assert_eq!(body.chars().count(), ABSTRACT_CUTOFF);
}

#[test]
fn load_reads_files_and_defaults_title_instruction() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("system_prompt.txt"), "S").unwrap();
    fs::write(dir.path().join("paper_topics.txt"), "T").unwrap();
    fs::write(dir.path().join("score_criteria.txt"), "C").unwrap();
    fs::write(dir.path().join("postfix_prompt_abstract.txt"), "P").unwrap();

    let prompts = PromptSet::load(dir.path()).unwrap();
    assert!(prompts.title_prompt(&[]).ends_with(DEFAULT_TITLE_INSTRUCTION));

    fs::write(dir.path().join("postfix_prompt_title.txt"), "LIST IDS").unwrap();
    let prompts = PromptSet::load(dir.path()).unwrap();
    assert!(prompts.title_prompt(&[]).ends_with("LIST IDS"));
}

#[test]
fn load_fails_on_missing_required_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("system_prompt.txt"), "S").unwrap();

    let err = PromptSet::load(dir.path()).unwrap_err();
    match err {
        PaperSiftError::InvalidConfig(message) => assert!(message.contains("paper_topics.txt")),
        other => panic!("unexpected error: {other:?}"),
    }
}
