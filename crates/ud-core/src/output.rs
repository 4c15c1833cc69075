//! Command payloads and their human renderings.
//!
//! JSON payloads are typed so `ud-core schema` can describe them. The
//! Markdown and one-line summary renderings are built here rather than in
//! the binary so they can be tested.

use crate::config::ResolvedConfig;
use crate::decision::{Decision, UtilityTable, VoiAnalysis};
use crate::evaluate::{Evaluation, EvaluationInput};
use crate::inference::Weather;
use crate::network::DecisionNetwork;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use ud_common::{EvaluationId, SCHEMA_VERSION};

/// Where the model behind a payload came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelProvenance {
    /// "CLI argument", "environment variable", "XDG config", ...
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Preset used when no model file was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    /// SHA-256 of the model file, or of the built-in model's JSON.
    pub hash: String,
    /// Whether command-line flags replaced any model value.
    pub overridden: bool,
}

impl ModelProvenance {
    pub fn from_config(config: &ResolvedConfig, overridden: bool) -> Self {
        let snapshot = config.snapshot();
        ModelProvenance {
            source: snapshot.source,
            path: snapshot.path,
            preset: config.preset.map(|p| p.to_string()),
            hash: snapshot.hash,
            overridden,
        }
    }

    fn describe(&self) -> String {
        match (&self.path, &self.preset) {
            (Some(path), _) => format!("{} ({})", path, self.source),
            (None, Some(preset)) => format!("preset `{}`", preset),
            (None, None) => self.source.clone(),
        }
    }
}

/// Common header of every JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Envelope {
    pub schema_version: String,
    pub evaluation_id: EvaluationId,
    pub generated_at: DateTime<Utc>,
}

impl Envelope {
    pub fn new(evaluation_id: EvaluationId) -> Self {
        Envelope {
            schema_version: SCHEMA_VERSION.to_string(),
            evaluation_id,
            generated_at: Utc::now(),
        }
    }
}

/// `ud-core evaluate` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluateResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    pub model: ModelProvenance,
    pub input: EvaluationInput,
    pub result: Evaluation,
}

/// `ud-core voi` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VoiResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    pub model: ModelProvenance,
    pub input: EvaluationInput,
    pub analysis: VoiAnalysis,
}

/// `ud-core network` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NetworkResponse {
    #[serde(flatten)]
    pub envelope: Envelope,
    pub network: DecisionNetwork,
}

fn prob(p: f64) -> String {
    format!("{:.2}", p)
}

fn utility_rows(out: &mut String, utilities: &UtilityTable) {
    out.push_str("| Weather | Umbrella | No umbrella |\n");
    out.push_str("|---------|---------:|------------:|\n");
    for weather in Weather::ALL {
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            weather,
            utilities.get(weather, Decision::Umbrella),
            utilities.get(weather, Decision::NoUmbrella)
        );
    }
}

impl EvaluateResponse {
    /// One line: id, forecast, posterior, both EUs and the recommendation.
    pub fn summary(&self) -> String {
        format!(
            "[{}] evaluate: forecast={} P(rain)={} EU(umbrella)={:.2} EU(no_umbrella)={:.2} -> {}",
            self.envelope.evaluation_id,
            self.result.observation,
            prob(self.result.posterior_rain),
            self.result.eu_umbrella,
            self.result.eu_no_umbrella,
            self.result.recommendation
        )
    }

    pub fn markdown(&self) -> String {
        let result = &self.result;
        let mut out = String::from("# Umbrella decision\n\n");
        let _ = writeln!(out, "**{}.**\n", result.recommendation.phrase());

        let _ = writeln!(out, "Forecast: {}", result.observation);
        let _ = writeln!(out, "Updated P(rain): {}", prob(result.posterior_rain));
        let _ = writeln!(out, "Model: {}\n", self.model.describe());

        out.push_str("## Utilities\n\n");
        utility_rows(&mut out, &self.input.utilities);
        out.push('\n');

        // The belief table only says something once a forecast was read.
        if result.observation.is_observed() {
            out.push_str("## Belief\n\n");
            out.push_str("| Weather | P(Weather) | P(Weather given Forecast) |\n");
            out.push_str("|---------|-----------:|--------------------------:|\n");
            for row in result.belief_table() {
                let _ = writeln!(
                    out,
                    "| {} | {} | {} |",
                    row.weather,
                    prob(row.prior),
                    prob(row.posterior)
                );
            }
            out.push('\n');
        }

        out.push_str("## Expected utility\n\n");
        out.push_str("| Decision | EU |\n");
        out.push_str("|----------|---:|\n");
        for decision in Decision::ALL {
            let _ = writeln!(
                out,
                "| {} | {:.2} |",
                decision,
                result.expected_utility(decision)
            );
        }

        if let Some(evidence) = &result.evidence {
            out.push_str("\n## Evidence\n\n");
            let _ = writeln!(
                out,
                "Likelihood ratio {:.3} ({:.2} bits): {} evidence, {}",
                evidence.likelihood_ratio,
                evidence.bits,
                evidence.strength,
                evidence.lean.phrase()
            );
        }

        let _ = write!(out, "\nEvaluation: {}\n", self.envelope.evaluation_id);
        out
    }
}

impl VoiResponse {
    pub fn summary(&self) -> String {
        let analysis = &self.analysis;
        format!(
            "[{}] voi: {:.4} (prior {} EU={:.2}, with forecast EU={:.2}, changes decision: {})",
            self.envelope.evaluation_id,
            analysis.voi,
            analysis.prior_recommendation,
            analysis.prior_best_eu,
            analysis.expected_eu_with_forecast,
            if analysis.forecast_can_change_decision {
                "yes"
            } else {
                "no"
            }
        )
    }

    pub fn markdown(&self) -> String {
        let analysis = &self.analysis;
        let mut out = String::from("# Value of information\n\n");
        let _ = writeln!(out, "VOI: **{:.4}**\n", analysis.voi);
        let _ = writeln!(out, "Model: {}\n", self.model.describe());
        let _ = writeln!(
            out,
            "Without the forecast: {} (EU {:.2})\n",
            analysis.prior_recommendation.phrase(),
            analysis.prior_best_eu
        );

        out.push_str("| Forecast | P(Forecast) | P(Rain given Forecast) | Decision | EU |\n");
        out.push_str("|----------|------------:|-----------------------:|----------|---:|\n");
        for branch in &analysis.branches {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {:.2} |",
                branch.observation,
                prob(branch.probability),
                prob(branch.posterior_rain),
                branch.recommendation,
                branch.best_eu
            );
        }

        let _ = write!(
            out,
            "\nExpected EU with the forecast: {:.2}\n",
            analysis.expected_eu_with_forecast
        );
        let _ = write!(out, "\nEvaluation: {}\n", self.envelope.evaluation_id);
        out
    }
}

impl NetworkResponse {
    pub fn summary(&self) -> String {
        let nodes: Vec<&str> = self.network.nodes.iter().map(|n| n.label.as_str()).collect();
        format!(
            "[{}] network: {} nodes ({}), {} edges",
            self.envelope.evaluation_id,
            nodes.len(),
            nodes.join(", "),
            self.network.edges.len()
        )
    }

    pub fn markdown(&self) -> String {
        let mut out = String::from("# Decision network\n\n");
        out.push_str("| Node | Kind | Shape |\n");
        out.push_str("|------|------|-------|\n");
        for node in &self.network.nodes {
            let _ = writeln!(
                out,
                "| {} | {:?} | {} |",
                node.label,
                node.kind,
                node.shape.as_str()
            );
        }
        out.push_str("\n```dot\n");
        out.push_str(&self.network.to_dot());
        out.push_str("```\n");
        out
    }
}
