//! Plain-text rendering of session results for the terminal.

use std::fmt::Write;

use crate::models::evaluation::{EvaluationResult, NO_SCORECARD_PLACEHOLDER};
use crate::models::request::Operation;
use crate::state::SessionState;

const NONE_FOUND: &str = "None found";

/// Renders an evaluation the way the results card lays it out:
/// scores, skills, GitHub metrics, then the scorecard.
pub fn render_evaluation(result: &EvaluationResult) -> String {
    let metrics = &result.resume_metrics;
    let github = &result.github_metrics;
    let mut out = String::new();

    let _ = writeln!(out, "Evaluation Results");
    let _ = writeln!(out, "==================");
    let _ = writeln!(
        out,
        "ATS Match Score:     {}%",
        format_score(metrics.ats_score)
    );
    let _ = writeln!(
        out,
        "Semantic Similarity: {}",
        format_score(metrics.semantic_score)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Matched Skills: {}", join_or_none(&metrics.matched_skills));
    let _ = writeln!(out, "Missing Skills: {}", join_or_none(&metrics.missing_skills));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "GitHub Repositories: {}",
        github
            .total_repos
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    );
    let _ = writeln!(out, "Top Languages:       {}", join_or_none(&github.top_languages));
    let _ = writeln!(out);
    let _ = writeln!(out, "AI Scorecard");
    let _ = writeln!(out, "------------");
    let scorecard = metrics
        .ai_scorecard
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_SCORECARD_PLACEHOLDER);
    let _ = writeln!(out, "{scorecard}");
    out
}

/// One line per operation: `<operation>: <state>`.
pub fn render_request_states(state: &SessionState) -> String {
    let mut out = String::new();
    for operation in Operation::ALL {
        let _ = writeln!(out, "{operation}: {}", state.request(operation));
    }
    out
}

/// Whole numbers print without a fraction; anything else as returned.
fn format_score(score: Option<f64>) -> String {
    let score = score.unwrap_or(0.0);
    if score.fract() == 0.0 && score.abs() < 1e15 {
        format!("{}", score as i64)
    } else {
        score.to_string()
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        NONE_FOUND.to_string()
    } else {
        items.join(", ")
    }
}
