use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai_provider::AiProvider;
use crate::api_connection::ChatTransport;
use crate::error::AiProviderError;
use crate::prompts::ImagePromptDetails;
use crate::schemas::{MarketingCopy, ProductCategoryKind};

const ALTERNATIVE_TAKE_SUFFIX: &str = " Alternative take, different angle and composition.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl FormulaSummary {
    fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingPackage {
    pub formula_id: i64,
    pub copy: MarketingCopy,
    pub category: ProductCategoryKind,
    pub product_mockup_url: String,
}

pub struct MarketingService<T> {
    provider: Arc<AiProvider<T>>,
}

impl<T: ChatTransport> MarketingService<T> {
    pub fn new(provider: Arc<AiProvider<T>>) -> Self {
        Self { provider }
    }

    pub async fn generate_for_formula(
        &self,
        formula: &FormulaSummary,
    ) -> Result<MarketingPackage, AiProviderError> {
        let copy = self
            .provider
            .generate_marketing_copy(&formula.name, formula.description())
            .await?;
        let category = self
            .provider
            .categorize_product(&copy.product_name, formula.description())
            .await?
            .category;

        let prompt = ImagePromptDetails::for_category(category.as_str())
            .render(&copy.product_name, formula.description());
        let product_mockup_url = self.provider.generate_image(&prompt).await?;

        info!(formula = formula.id, category = category.as_str(), "marketing package generated");
        Ok(MarketingPackage {
            formula_id: formula.id,
            copy,
            category,
            product_mockup_url,
        })
    }

    /// New mock-up for an existing package.
    pub async fn regenerate_mockup(
        &self,
        formula: &FormulaSummary,
        package: &MarketingPackage,
    ) -> Result<String, AiProviderError> {
        let mut prompt = ImagePromptDetails::for_category(package.category.as_str())
            .render(&package.copy.product_name, formula.description());
        prompt.push_str(ALTERNATIVE_TAKE_SUFFIX);
        self.provider.generate_image(&prompt).await
    }
}
