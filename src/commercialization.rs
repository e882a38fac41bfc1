use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai_provider::AiProvider;
use crate::api_connection::ChatTransport;
use crate::error::AiProviderError;
use crate::schemas::{
    CommercializationInsights, CostAnalysis, Recommendation, Risk, StructuredResponse,
    SupplierAnalysis,
};
use crate::timeline::{StageAdjustment, Timeline, TimelineError, UnmatchedStagePolicy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackagingSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    pub material: String,
    #[serde(default)]
    pub supplier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowIngredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub lead_time_days: Option<u32>,
    #[serde(default)]
    pub cost_per_unit: Option<f64>,
}

fn default_market() -> String {
    "US".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRequest {
    pub product_id: String,
    pub product_name: String,
    pub ingredients: Vec<WorkflowIngredient>,
    pub packaging: PackagingSpec,
    pub target_volume: u64,
    pub batch_size: u64,
    #[serde(default)]
    pub target_launch_date: Option<String>,
    #[serde(default)]
    pub budget_limit: Option<f64>,
    #[serde(default = "default_market")]
    pub market: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommercializationAnalysis {
    pub product_id: String,
    pub product_name: String,
    pub generated_at: DateTime<Utc>,
    pub timeline_data: Timeline,
    pub risks: Vec<Risk>,
    pub recommendations: Vec<Recommendation>,
    pub supplier_analysis: SupplierAnalysis,
    pub cost_analysis: CostAnalysis,
}

pub struct CommercializationService<T> {
    provider: Arc<AiProvider<T>>,
    unmatched_policy: UnmatchedStagePolicy,
}

impl<T: ChatTransport> CommercializationService<T> {
    pub fn new(provider: Arc<AiProvider<T>>, unmatched_policy: UnmatchedStagePolicy) -> Self {
        Self {
            provider,
            unmatched_policy,
        }
    }

    /// Runs the insight, supplier and cost calls concurrently; any failure
    /// fails the whole analysis.
    pub async fn analyze(
        &self,
        request: &WorkflowRequest,
    ) -> Result<CommercializationAnalysis, AiProviderError> {
        let details = serde_json::to_string_pretty(request)
            .map_err(|e| AiProviderError::Transport(e.into()))?;

        let (insights, supplier_analysis, cost_analysis) = tokio::try_join!(
            self.provider.generate_commercialization_insights(&details),
            self.provider.analyze_suppliers(&details),
            self.provider.analyze_costs(&details),
        )?;

        let timeline_data = Timeline::from_stages(insights.tasks).map_err(|e| {
            AiProviderError::schema_violation(CommercializationInsights::NAME, e.to_string())
        })?;

        info!(
            product = %request.product_id,
            sequential_weeks = timeline_data.sequential_weeks,
            optimized_weeks = timeline_data.optimized_weeks,
            risks = insights.risks.len(),
            "commercialization analysis complete"
        );

        Ok(CommercializationAnalysis {
            product_id: request.product_id.clone(),
            product_name: request.product_name.clone(),
            generated_at: Utc::now(),
            timeline_data,
            risks: insights.risks,
            recommendations: insights.recommendations,
            supplier_analysis,
            cost_analysis,
        })
    }

    pub fn adjust_timeline(
        &self,
        timeline: &Timeline,
        adjustments: &[StageAdjustment],
    ) -> Result<Timeline, TimelineError> {
        timeline.apply_adjustments(adjustments, self.unmatched_policy)
    }
}
