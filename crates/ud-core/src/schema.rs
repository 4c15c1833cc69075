//! JSON Schema generation for output types.
//!
//! ```bash
//! ud-core schema --list
//! ud-core schema EvaluateResponse
//! ud-core schema --all
//! ```

use schemars::schema_for;
use serde_json::Value;
use std::collections::BTreeMap;

pub use crate::decision::{Decision, ForecastBranch, Recommendation, UtilityTable, VoiAnalysis};
pub use crate::evaluate::{BeliefRow, Evaluation, EvaluationInput, EvidenceValue, ForecastEvidence};
pub use crate::inference::{ForecastObservation, ForecastReliability, Prior, Weather};
pub use crate::network::DecisionNetwork;
pub use crate::output::{EvaluateResponse, ModelProvenance, NetworkResponse, VoiResponse};
pub use ud_common::EvaluationId;

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        // Payloads
        ("EvaluateResponse", "Payload of `ud-core evaluate`"),
        ("VoiResponse", "Payload of `ud-core voi`"),
        ("NetworkResponse", "Payload of `ud-core network`"),
        ("ModelProvenance", "Where the model behind a payload came from"),
        ("EvaluationId", "Evaluation identifier"),
        // Evaluator
        ("EvaluationInput", "Observation, prior, forecast reliability and utilities"),
        ("Evaluation", "Posterior, expected utilities and recommendation"),
        ("BeliefRow", "Prior and posterior probability of one weather state"),
        ("ForecastEvidence", "Bayes factor of the observed forecast"),
        ("EvidenceValue", "A number, or \"inf\" / \"-inf\" when one likelihood is zero"),
        ("Prior", "P(Rain) before any forecast"),
        ("ForecastReliability", "P(Good | Rain) and P(Good | Sunny)"),
        ("UtilityTable", "Utility of every weather/decision outcome"),
        ("ForecastObservation", "none, good or bad"),
        ("Weather", "rain or sunny"),
        ("Decision", "umbrella or no_umbrella"),
        ("Recommendation", "take_umbrella or leave_umbrella"),
        // Value of information
        ("VoiAnalysis", "Value of consulting the forecast"),
        ("ForecastBranch", "Outcome of one possible forecast"),
        // Network
        ("DecisionNetwork", "Nodes and edges of the decision network"),
    ]
}

/// Generate JSON Schema for a type by name.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "EvaluateResponse" => schema_for!(EvaluateResponse),
        "VoiResponse" => schema_for!(VoiResponse),
        "NetworkResponse" => schema_for!(NetworkResponse),
        "ModelProvenance" => schema_for!(ModelProvenance),
        "EvaluationId" => schema_for!(EvaluationId),
        "EvaluationInput" => schema_for!(EvaluationInput),
        "Evaluation" => schema_for!(Evaluation),
        "BeliefRow" => schema_for!(BeliefRow),
        "ForecastEvidence" => schema_for!(ForecastEvidence),
        "EvidenceValue" => schema_for!(EvidenceValue),
        "Prior" => schema_for!(Prior),
        "ForecastReliability" => schema_for!(ForecastReliability),
        "UtilityTable" => schema_for!(UtilityTable),
        "ForecastObservation" => schema_for!(ForecastObservation),
        "Weather" => schema_for!(Weather),
        "Decision" => schema_for!(Decision),
        "Recommendation" => schema_for!(Recommendation),
        "VoiAnalysis" => schema_for!(VoiAnalysis),
        "ForecastBranch" => schema_for!(ForecastBranch),
        "DecisionNetwork" => schema_for!(DecisionNetwork),
        _ => return None,
    };

    serde_json::to_value(schema).ok()
}

/// Generate all schemas as a map from type name to schema.
pub fn generate_all_schemas() -> BTreeMap<String, Value> {
    available_schemas()
        .into_iter()
        .filter_map(|(name, _)| generate_schema(name).map(|schema| (name.to_string(), schema)))
        .collect()
}

/// Schema output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// Pretty-printed JSON (default)
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

pub fn format_schema(schema: &Value, format: SchemaFormat) -> String {
    match format {
        SchemaFormat::Json => serde_json::to_string_pretty(schema),
        SchemaFormat::JsonCompact => serde_json::to_string(schema),
    }
    .unwrap_or_else(|_| schema.to_string())
}
