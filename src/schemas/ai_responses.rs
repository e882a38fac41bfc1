use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{flexible_int_map, flexible_optional_int, StructuredResponse};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SummaryAndSentiment {
    /// A concise, one-paragraph summary.
    pub summary: String,
    /// Positive, Negative or Neutral.
    pub sentiment: String,
}

impl StructuredResponse for SummaryAndSentiment {
    const NAME: &'static str = "summary_and_sentiment";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrendSignals {
    /// Trend signals formatted as "<item> ↑" or "<item> ↓".
    pub signals: Vec<String>,
}

impl StructuredResponse for TrendSignals {
    const NAME: &'static str = "trend_signals";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TrendCategory {
    Beverage,
    Snack,
    Protein,
    Supplement,
    Uncategorized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrendData {
    pub title: String,
    pub summary: String,
    pub keywords: Vec<String>,
    pub category: TrendCategory,
    pub sentiment: String,
    /// Impact score from 1 to 10, 10 being highest.
    pub impact_score: i64,
}

impl StructuredResponse for TrendData {
    const NAME: &'static str = "trend_data";

    fn validate(&self) -> Result<(), String> {
        if !(1..=10).contains(&self.impact_score) {
            return Err(format!(
                "impact_score must be between 1 and 10, got {}",
                self.impact_score
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrendCategoryAndTags {
    /// The determined category for the trend.
    pub category: TrendCategory,
    /// A list of relevant tags or keywords for the trend.
    pub tags: Vec<String>,
}

impl StructuredResponse for TrendCategoryAndTags {
    const NAME: &'static str = "trend_category_and_tags";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IngredientSubstitutions {
    /// Functionally similar alternative ingredient names.
    pub alternatives: Vec<String>,
}

impl StructuredResponse for IngredientSubstitutions {
    const NAME: &'static str = "ingredient_substitutions";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IngredientEnrichment {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub benefits: Option<String>,
    #[serde(default)]
    pub claims: Option<String>,
    #[serde(default)]
    pub regulatory_notes: Option<String>,
    #[serde(default)]
    pub function: Option<String>,
    /// Typical weight as a whole number.
    #[serde(default, deserialize_with = "flexible_optional_int")]
    #[schemars(with = "Option<i64>")]
    pub weight: Option<i64>,
    #[serde(default)]
    pub unit: Option<String>,
    /// Comma-separated list of common allergies.
    #[serde(default)]
    pub allergies: Option<String>,
}

impl StructuredResponse for IngredientEnrichment {
    const NAME: &'static str = "ingredient_enrichment";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SharedProductConcept {
    pub image: String,
    pub title: String,
    pub key_ingredients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AssistantRecommendations {
    pub opportunity: String,
    pub risk: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GenderBias {
    pub male: f64,
    pub female: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InsightPortalData {
    pub shared_product_concepts: Vec<SharedProductConcept>,
    pub company_competitors: Vec<String>,
    pub assistant_recommendations: AssistantRecommendations,
    /// Age range (18-24, 25-34, 35-44, 45-54, 55-64, 65+) to integer count.
    #[serde(deserialize_with = "flexible_int_map")]
    #[schemars(with = "BTreeMap<String, i64>")]
    pub demography_data: BTreeMap<String, i64>,
    /// Male and female ratios summing to 1.0.
    pub gender_bias: GenderBias,
    pub top_geographic_locations: Vec<String>,
}

impl StructuredResponse for InsightPortalData {
    const NAME: &'static str = "insight_portal_data";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormulaIngredient {
    pub name: String,
    pub quantity: f64,
    pub estimated_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormulaDetails {
    pub formula_name: String,
    pub formula_description: String,
    pub ingredients: Vec<FormulaIngredient>,
}

impl StructuredResponse for FormulaDetails {
    const NAME: &'static str = "formula_details";

    fn validate(&self) -> Result<(), String> {
        if let Some(bad) = self
            .ingredients
            .iter()
            .find(|i| i.quantity < 0.0 || i.estimated_cost < 0.0)
        {
            return Err(format!(
                "ingredient '{}' has a negative quantity or cost",
                bad.name
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NutritionalFact {
    /// e.g. Total Fat, Sodium, Carbohydrates, Protein.
    pub nutrient: String,
    /// Amount per serving, e.g. "5g".
    pub amount: String,
    /// Percentage of daily value, e.g. "7%".
    pub daily_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CostEstimate {
    pub per_unit: f64,
    pub per_batch: f64,
    pub potential_savings: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SustainabilityScore {
    /// Score from 0 to 100.
    pub score: f64,
    pub factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MarketingCopy {
    /// A catchy and market-friendly name for the product.
    pub product_name: String,
    /// A short, memorable slogan for the product.
    pub tagline: String,
    /// 3-5 key selling points or features.
    pub key_features: Vec<String>,
    /// A compelling paragraph of marketing text for the product.
    pub marketing_copy: String,
    pub nutritional_facts: Vec<NutritionalFact>,
    pub cost_estimate: CostEstimate,
    pub improvement_suggestions: Vec<String>,
    pub allergen_alerts: Vec<String>,
    pub sustainability: SustainabilityScore,
    pub calories: f64,
    /// Serving size of one bottle, e.g. "355 ml".
    pub serving_size: String,
}

impl StructuredResponse for MarketingCopy {
    const NAME: &'static str = "marketing_copy";

    fn validate(&self) -> Result<(), String> {
        let features = self.key_features.len();
        if !(3..=5).contains(&features) {
            return Err(format!("key_features must contain 3 to 5 items, got {features}"));
        }
        if !(0.0..=100.0).contains(&self.sustainability.score) {
            return Err(format!(
                "sustainability score must be between 0 and 100, got {}",
                self.sustainability.score
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ProductCategoryKind {
    Beverage,
    Snack,
    Liquor,
    Cosmetic,
    #[serde(rename = "Food Supplement")]
    FoodSupplement,
    Other,
}

impl ProductCategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategoryKind::Beverage => "Beverage",
            ProductCategoryKind::Snack => "Snack",
            ProductCategoryKind::Liquor => "Liquor",
            ProductCategoryKind::Cosmetic => "Cosmetic",
            ProductCategoryKind::FoodSupplement => "Food Supplement",
            ProductCategoryKind::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProductCategory {
    pub category: ProductCategoryKind,
}

impl StructuredResponse for ProductCategory {
    const NAME: &'static str = "product_category";
}
