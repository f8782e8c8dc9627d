use papersift_core::Scores;
use serde::{Deserialize, Deserializer};

/// One line of the abstract-pass reply.
///
/// Scores may arrive as integers, floats or numeric strings; fractional
/// values are truncated.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ModelScore {
    #[serde(rename = "ARXIVID", alias = "id", alias = "arxiv_id")]
    pub id: String,
    #[serde(
        rename = "RELEVANCE",
        alias = "relevance",
        deserialize_with = "lenient_score"
    )]
    pub relevance: i64,
    #[serde(rename = "NOVELTY", alias = "novelty", deserialize_with = "lenient_score")]
    pub novelty: i64,
    #[serde(rename = "COMMENT", alias = "comment", default)]
    pub comment: String,
}

impl ModelScore {
    pub fn scores(&self) -> Scores {
        Scores {
            relevance: self.relevance,
            novelty: self.novelty,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScore {
    Int(i64),
    Float(f64),
    Text(String),
}

fn lenient_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match RawScore::deserialize(deserializer)? {
        RawScore::Int(value) => Ok(value),
        RawScore::Float(value) if value.is_finite() => Ok(value.trunc() as i64),
        RawScore::Float(value) => Err(D::Error::custom(format!("invalid score {value}"))),
        RawScore::Text(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .or_else(|_| {
                    text.parse::<f64>()
                        .ok()
                        .filter(|value| value.is_finite())
                        .map(|value| value.trunc() as i64)
                        .ok_or(())
                })
                .map_err(|_| D::Error::custom(format!("invalid score {text:?}")))
        }
    }
}
