//! Evaluation result returned by the scoring service.
//!
//! Field names follow the service's JSON. Scores and the scorecard are kept
//! optional so that consumers can apply their own defaults; lists collapse
//! `null`/missing into empty values, and a malformed GitHub block degrades to
//! unknown instead of failing the whole result.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Stands in for an absent or empty AI scorecard.
pub const NO_SCORECARD_PLACEHOLDER: &str = "No scorecard generated.";

/// The authoritative output of an evaluation. Replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub resume_metrics: ResumeMetrics,
    #[serde(default)]
    pub github_metrics: GithubMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeMetrics {
    /// 0 – 100
    #[serde(default)]
    pub ats_score: Option<f64>,
    /// Service-defined scale.
    #[serde(default)]
    pub semantic_score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matched_skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub ai_scorecard: Option<String>,
}

/// GitHub data is best-effort: the service omits it for unknown handles and
/// may send placeholders in place of numbers. Each field decodes on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GithubMetrics {
    /// `None` means unknown, not zero.
    pub total_repos: Option<u32>,
    pub top_languages: Vec<String>,
}

impl GithubMetrics {
    /// Reads whatever is usable from `value`; anything else is unknown.
    pub fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };
        Self {
            total_repos: fields
                .get("total_repos")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok()),
            top_languages: fields
                .get("top_languages")
                .and_then(Value::as_array)
                .map(|langs| {
                    langs
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

impl<'de> Deserialize<'de> for GithubMetrics {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_value(&Value::deserialize(deserializer)?))
    }
}

impl EvaluationResult {
    pub fn missing_skills(&self) -> &[String] {
        &self.resume_metrics.missing_skills
    }

    pub fn is_fully_qualified(&self) -> bool {
        self.resume_metrics.missing_skills.is_empty()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
