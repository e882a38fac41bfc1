use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{flexible_optional_int, StructuredResponse};
use crate::timeline::TimelineStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RiskSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Risk {
    pub id: String,
    /// supplier, production, timeline or quality.
    pub category: String,
    pub severity: RiskSeverity,
    pub description: String,
    #[serde(default, deserialize_with = "flexible_optional_int")]
    #[schemars(with = "Option<i64>")]
    pub impact_days: Option<i64>,
    #[serde(default)]
    pub impact_cost: Option<f64>,
    /// Mitigation strategy.
    pub recommendation: String,
    /// Confidence between 0 and 1.
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Recommendation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub cost_impact: Option<f64>,
    #[serde(default, deserialize_with = "flexible_optional_int")]
    #[schemars(with = "Option<i64>")]
    pub time_impact: Option<i64>,
    pub feasibility: String,
    pub priority: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CommercializationInsights {
    /// One entry per commercialization stage with its predicted duration.
    pub tasks: Vec<TimelineStage>,
    pub risks: Vec<Risk>,
    pub recommendations: Vec<Recommendation>,
}

impl StructuredResponse for CommercializationInsights {
    const NAME: &'static str = "commercialization_insights";

    fn validate(&self) -> Result<(), String> {
        if let Some(stage) = self
            .tasks
            .iter()
            .find(|s| !s.duration_weeks.is_finite() || s.duration_weeks < 0.0)
        {
            return Err(format!(
                "stage '{}' has an invalid duration of {} weeks",
                stage.stage_name, stage.duration_weeks
            ));
        }
        if let Some(risk) = self
            .risks
            .iter()
            .find(|r| !(0.0..=1.0).contains(&r.confidence))
        {
            return Err(format!(
                "risk '{}' has confidence {} outside [0, 1]",
                risk.id, risk.confidence
            ));
        }
        Ok(())
    }
}

/// Free-form supplier assessment keyed by ingredient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SupplierAnalysis(pub Map<String, Value>);

impl StructuredResponse for SupplierAnalysis {
    const NAME: &'static str = "supplier_analysis";
}

/// Free-form cost breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct CostAnalysis(pub Map<String, Value>);

impl StructuredResponse for CostAnalysis {
    const NAME: &'static str = "cost_analysis";
}
