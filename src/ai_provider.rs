use tracing::info;

use crate::api_connection::{ChatMessage, ChatTransport};
use crate::error::AiProviderError;
use crate::prompts::{self, render, AgentKind};
use crate::schemas::{
    CommercializationInsights, CostAnalysis, FormulaDetails, IngredientEnrichment,
    IngredientSubstitutions, InsightPortalData, MarketingCopy, ProductCategory,
    SummaryAndSentiment, SupplierAnalysis, TrendCategoryAndTags, TrendData, TrendSignals,
};
use crate::structured_call::StructuredCaller;

/// One method per generation use case, each a single structured call.
pub struct AiProvider<T> {
    caller: StructuredCaller<T>,
    chat_model: String,
    image_model: String,
}

impl<T: ChatTransport> AiProvider<T> {
    pub fn new(
        caller: StructuredCaller<T>,
        chat_model: impl Into<String>,
        image_model: impl Into<String>,
    ) -> Self {
        Self {
            caller,
            chat_model: chat_model.into(),
            image_model: image_model.into(),
        }
    }

    /// Model id recorded alongside persisted insights.
    pub fn model(&self) -> &str {
        self.caller.model()
    }

    pub fn caller(&self) -> &StructuredCaller<T> {
        &self.caller
    }

    pub async fn generate_summary_and_sentiment(
        &self,
        text_content: &str,
    ) -> Result<SummaryAndSentiment, AiProviderError> {
        self.caller
            .call(prompts::SUMMARY_AND_SENTIMENT_INSTRUCTION, text_content)
            .await
    }

    pub async fn generate_trend_signals(
        &self,
        combined_content: &str,
    ) -> Result<Vec<String>, AiProviderError> {
        let signals: TrendSignals = self
            .caller
            .call(prompts::TREND_SIGNALS_INSTRUCTION, combined_content)
            .await?;
        Ok(signals.signals)
    }

    pub async fn generate_trend_data(&self, article: &str) -> Result<TrendData, AiProviderError> {
        self.caller
            .call(prompts::TREND_DATA_EXTRACTION_INSTRUCTION, article)
            .await
    }

    pub async fn generate_trend_category_and_tags(
        &self,
        title: &str,
        content: &str,
    ) -> Result<TrendCategoryAndTags, AiProviderError> {
        let user_content = format!("Title: {title}\n\nContent: {content}");
        self.caller
            .call(prompts::TREND_CATEGORY_AND_TAGS_INSTRUCTION, &user_content)
            .await
    }

    pub async fn generate_ingredient_substitutions(
        &self,
        ingredient_name: &str,
    ) -> Result<Vec<String>, AiProviderError> {
        let instruction = render(
            prompts::INGREDIENT_SUBSTITUTIONS_INSTRUCTION,
            &[("ingredient_name", ingredient_name)],
        );
        let substitutions: IngredientSubstitutions = self
            .caller
            .call(&instruction, &format!("Suggest alternatives for: {ingredient_name}"))
            .await?;
        Ok(substitutions.alternatives)
    }

    pub async fn generate_ingredient_enrichment(
        &self,
        ingredient_name: &str,
    ) -> Result<IngredientEnrichment, AiProviderError> {
        let instruction = render(
            prompts::INGREDIENT_ENRICHMENT_INSTRUCTION,
            &[("ingredient_name", ingredient_name)],
        );
        self.caller
            .call(&instruction, &format!("Enrich the ingredient: {ingredient_name}"))
            .await
    }

    pub async fn generate_insight_portal_data(
        &self,
        ingredient_name: &str,
    ) -> Result<InsightPortalData, AiProviderError> {
        let instruction = render(
            prompts::INSIGHT_PORTAL_INSTRUCTION,
            &[("ingredient_name", ingredient_name)],
        );
        self.caller
            .call(&instruction, &format!("Market insights for: {ingredient_name}"))
            .await
    }

    /// Earlier chat turns, when present, are appended to the instruction.
    pub async fn generate_formula_details(
        &self,
        product_concept: &str,
        chat_history: &[ChatMessage],
    ) -> Result<FormulaDetails, AiProviderError> {
        let mut instruction = prompts::FORMULA_DETAILS_INSTRUCTION.to_string();
        if !chat_history.is_empty() {
            instruction.push_str("\n\n");
            instruction.push_str(prompts::CHAT_HISTORY_PREAMBLE);
            for message in chat_history {
                instruction.push_str(&format!("\n{}: {}", message.role, message.content));
            }
        }
        self.caller
            .call(
                &instruction,
                &format!("Generate formula details for: {product_concept}"),
            )
            .await
    }

    pub async fn generate_marketing_copy(
        &self,
        formula_name: &str,
        formula_description: &str,
    ) -> Result<MarketingCopy, AiProviderError> {
        let user_content = format!(
            "Formula name: {formula_name}\nFormula description: {formula_description}"
        );
        self.caller
            .call(prompts::MARKETING_COPY_INSTRUCTION, &user_content)
            .await
    }

    pub async fn categorize_product(
        &self,
        product_name: &str,
        product_description: &str,
    ) -> Result<ProductCategory, AiProviderError> {
        let user_content = format!(
            "Product name: {product_name}\nProduct description: {product_description}"
        );
        self.caller
            .call(prompts::PRODUCT_CATEGORIZATION_INSTRUCTION, &user_content)
            .await
    }

    pub async fn generate_commercialization_insights(
        &self,
        workflow_details: &str,
    ) -> Result<CommercializationInsights, AiProviderError> {
        self.caller
            .call(prompts::COMMERCIALIZATION_INSIGHTS_INSTRUCTION, workflow_details)
            .await
    }

    pub async fn analyze_suppliers(
        &self,
        workflow_details: &str,
    ) -> Result<SupplierAnalysis, AiProviderError> {
        self.caller
            .call(prompts::SUPPLIER_ANALYSIS_INSTRUCTION, workflow_details)
            .await
    }

    pub async fn analyze_costs(&self, workflow_details: &str) -> Result<CostAnalysis, AiProviderError> {
        self.caller
            .call(prompts::COST_ANALYSIS_INSTRUCTION, workflow_details)
            .await
    }

    pub async fn generate_image(&self, prompt: &str) -> Result<String, AiProviderError> {
        let url = self.caller.generate_image(&self.image_model, prompt).await?;
        info!(%url, "generated product image");
        Ok(url)
    }

    /// Conversational reply with the agent's system prompt prepended.
    pub async fn generate_chat_reply(
        &self,
        messages: &[ChatMessage],
        agent: AgentKind,
        context: &str,
    ) -> Result<String, AiProviderError> {
        let mut conversation = Vec::with_capacity(messages.len() + 1);
        conversation.push(ChatMessage::system(agent.system_prompt(context)));
        conversation.extend_from_slice(messages);
        self.caller
            .complete_text(&self.chat_model, conversation)
            .await
    }
}
