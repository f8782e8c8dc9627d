use std::collections::BTreeMap;
use std::fs;

use chrono::NaiveDate;
use papersift_cli::{JsonCandidateSource, JsonReportSink};
use papersift_core::{Accepted, Candidate, CostAccumulator, Rejection, ScoredRecord, Scores};
use papersift_filter::{CandidateSource, PipelineReport, ReportSink};
use serde_json::Value;

fn paper(id: &str) -> Candidate {
    Candidate::new(id, format!("Title {id}"), format!("Abstract {id}"), vec!["B. Author".to_string()])
}

fn report() -> PipelineReport {
    let scored = ScoredRecord::new(
        paper("2401.00001"),
        Scores {
            relevance: 8,
            novelty: 7,
        },
        "great",
    );
    let mut rejected = BTreeMap::new();
    rejected.insert(
        "2401.00002".to_string(),
        Rejection::title_filtered(paper("2401.00002")),
    );

    PipelineReport {
        accepted: vec![Accepted::Scored(scored.clone())],
        rejected,
        unresolved: vec![paper("2401.00003")],
        cost: CostAccumulator {
            prompt_cost: 0.01,
            completion_cost: 0.02,
            prompt_tokens: 100,
            completion_tokens: 10,
        },
        scored_batches: vec![vec![scored]],
    }
}

#[tokio::test]
async fn source_reads_array_in_file_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("papers.json");
    fs::write(
        &path,
        r#"[
            {"arxiv_id": "1", "title": "first", "abstract": "a", "authors": ["X"]},
            {"id": "2", "title": "second", "abstract": "b"},
            {"id": "1", "title": "first again", "abstract": "c"}
        ]"#,
    )
    .unwrap();

    let candidates = JsonCandidateSource::new(&path).candidates().await.unwrap();

    assert_eq!(candidates.len(), 3);
    assert_eq!(candidates[0].title(), "first");
    assert_eq!(candidates[0].authors(), ["X".to_string()]);
    assert!(candidates[1].authors().is_empty());
    assert_eq!(candidates[2].title(), "first again");
}

#[tokio::test]
async fn source_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = JsonCandidateSource::new(dir.path().join("absent.json"))
        .candidates()
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn sink_writes_dated_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
    let sink = JsonReportSink::new(dir.path(), date);

    sink.publish(&report()).await.unwrap();

    let path = dir.path().join("json/2025-03/2025-03-07-output.json");
    assert_eq!(sink.output_file(), path);
    let written: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    let first = &written[0];
    assert_eq!(first["id"], "2401.00001");
    assert_eq!(first["score"], 15);
    assert_eq!(first["relevance"], 8);
    assert_eq!(first["abstract"], "Abstract 2401.00001");
    assert!(!dir.path().join("debug").exists());
}

#[tokio::test]
async fn sink_dumps_debug_files_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
    let sink = JsonReportSink::new(dir.path(), date)
        .dump_json(false)
        .dump_debug(true)
        .with_config_snapshot(serde_json::json!({"selection": {"model": "gpt-4o"}}));

    sink.publish(&report()).await.unwrap();

    let debug = dir.path().join("debug/2025-12/2025-12-31");
    for name in ["rejected", "unresolved", "scored_batches", "cost", "config"] {
        assert!(debug.join(format!("{name}.json")).is_file(), "{name}.json missing");
    }
    assert!(!sink.output_file().exists());

    let rejected: Value =
        serde_json::from_str(&fs::read_to_string(debug.join("rejected.json")).unwrap()).unwrap();
    assert_eq!(rejected["2401.00002"]["reason"], "TitleFiltered");
    let cost: Value = serde_json::from_str(&fs::read_to_string(debug.join("cost.json")).unwrap()).unwrap();
    assert_eq!(cost["prompt_tokens"], 100);
}
