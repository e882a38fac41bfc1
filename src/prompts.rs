//! Instruction templates for every structured call, plus the chat agent and
//! product mock-up prompts. Placeholders are written as `{name}` and filled
//! with [`render`].

pub const SUMMARY_AND_SENTIMENT_INSTRUCTION: &str = "You are an expert analyst. Analyze the provided article and provide a concise, one-paragraph summary and a sentiment analysis (Positive, Negative, or Neutral).";

pub const TREND_SIGNALS_INSTRUCTION: &str = "You are an expert in food market trends. Analyze the provided social media posts and identify trend signals. A trend signal is an ingredient, product, or concept with an upward (↑) or downward (↓) trend. Format each signal as '<item> ↑' or '<item> ↓'.";

pub const TREND_DATA_EXTRACTION_INSTRUCTION: &str = "You are an expert trend analyst. Analyze the provided article content and extract the main trend data points.
Focus on identifying the core trend, summarizing the article, and extracting relevant keywords.

For the 'category' field, you MUST classify the trend into one of the following exact categories:
- beverage
- snack
- protein
- supplement
- uncategorized

Determine its sentiment, and assign an impact score from 1 to 10.";

pub const TREND_CATEGORY_AND_TAGS_INSTRUCTION: &str = "You are an expert trend analyst. Your task is to analyze an article about a food trend and perform two actions: \
1. Categorize the trend into ONE of the following predefined categories: beverage, snack, protein, supplement, uncategorized. \
2. Generate a list of 3-5 relevant tags (keywords) that describe the trend. \
Base your analysis on the provided article title and content.";

pub const INGREDIENT_SUBSTITUTIONS_INSTRUCTION: &str = "You are an expert in food and beverage ingredient science. For the ingredient '{ingredient_name}', suggest 3-5 common and functionally similar alternatives that could be used in food and beverage products.";

pub const INGREDIENT_ENRICHMENT_INSTRUCTION: &str = "You are an expert in food ingredients. For the ingredient '{ingredient_name}', provide a detailed enrichment covering its description, benefits, common claims, regulatory notes, function, unit, weight, and typical allergies.";

pub const INSIGHT_PORTAL_INSTRUCTION: &str = "You are an AI assistant specializing in food and beverage market analysis. For the ingredient '{ingredient_name}', generate a comprehensive market insight report.";

pub const FORMULA_DETAILS_INSTRUCTION: &str = "You are an AI assistant for food and beverage formula development. For the given product concept, generate a plausible formula with 5-10 key ingredients, each with a quantity and an estimated cost.";

pub const MARKETING_COPY_INSTRUCTION: &str = "You are an expert in product marketing for the food and beverage industry. Based on the formula name and description, generate compelling marketing copy. This should include a product name, tagline, key features, a marketing paragraph, a list of common nutritional facts (like Total Fat, Sodium, Carbohydrates, and Protein) with their amount per serving and percentage of daily value, estimated cost per unit and batch, potential savings, suggestions for improvement, allergen alerts, a sustainability score with contributing factors, the REQUIRED number of calories, and the REQUIRED serving size per 1 bottle.";

pub const PRODUCT_CATEGORIZATION_INSTRUCTION: &str = "You are a product categorization expert for the consumer goods industry. Based on the product name and description, classify the product into exactly one of the following categories: 'Beverage', 'Snack', 'Liquor', 'Cosmetic', 'Food Supplement', 'Other'.";

pub const COMMERCIALIZATION_INSIGHTS_INSTRUCTION: &str = "You are an expert commercialization strategist and risk analyst for the food and beverage industry. \
Your task is to analyze a product formula's commercialization workflow. \
Based on this analysis, you must: \
1. Predict the duration in weeks for each commercialization stage, considering the product and its description, and state whether the stage can run in parallel with others. \
2. Identify all potential risks related to suppliers, production, timeline, or quality. For each risk, provide a severity (low/medium/high), impact assessment, and a clear mitigation strategy. \
3. Generate comprehensive, actionable recommendations to optimize the workflow, reduce identified risks, and improve the overall timeline, quantifying the potential impact of each. \
Your analysis should be insightful, practical, and strictly adhere to the provided JSON schema.";

pub const SUPPLIER_ANALYSIS_INSTRUCTION: &str = "You are a procurement specialist. Analyze supplier options for the provided ingredients and product details. \
For each ingredient, suggest: \
1. Current supplier assessment (reliability, cost, lead time) \
2. Alternative suppliers (domestic vs international) \
3. Trade-offs (cost vs speed vs reliability) \
4. Recommendations with specific reasoning. \
Return a JSON object keyed by ingredient name.";

pub const COST_ANALYSIS_INSTRUCTION: &str = "You are a cost analyst. Calculate comprehensive costs for the provided product and workflow details. \
Calculate: \
1. Cost per unit (ingredients + packaging + labor + overhead) \
2. Batch cost \
3. Total project cost \
4. Cost breakdown by category \
5. Potential savings opportunities. \
Return the detailed cost analysis as a JSON object.";

pub const CHAT_HISTORY_PREAMBLE: &str = "Take the following earlier conversation with the user into account:";

const INNOVATIVE_AGENT_SYSTEM_PROMPT: &str = "You are a food innovation expert. Your goal is to provide helpful and concise answers based on the provided context. If the context does not contain enough information to provide a specific answer, ask clarifying questions to the user to get the necessary information. For example, if the user asks for a recipe without providing enough details, ask for the type of cuisine, dietary restrictions, or specific ingredients they would like to work with. Guide the user to provide the information you need to give a complete and accurate answer. Do not make up information. Context:\n{context}";

const COMPLIANCE_AGENT_SYSTEM_PROMPT: &str = "You are a food compliance expert. Your goal is to provide helpful and concise answers based on the provided context, focusing on regulatory and safety aspects. If the context does not contain enough information, state that you don't have enough information to answer the question. Do not make up information. Context:\n{context}";

const DEFAULT_AGENT_SYSTEM_PROMPT: &str = "You are a helpful assistant. Context:\n{context}";

const IMAGE_PROMPT_TEMPLATE: &str = "A professional {lifestyle_or_mockup} of '{product_name}', which is a {product_description}.
{scene_description}
Background: {background_description}
Lighting: {lighting_description}
Styling: {styling_description}
Photography style: High-end commercial product photography, sharp focus on product, shallow depth of field for background, professional food/product styling, {extra_details}.";

/// Replaces every `{key}` in `template` with its value in a single scan, so
/// substituted text is never expanded again. Unknown placeholders are kept.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            rest = &rest[open..];
            break;
        };
        let key = &after[..close];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentKind {
    #[default]
    Innovative,
    Compliance,
    General,
}

impl std::str::FromStr for AgentKind {
    type Err = std::convert::Infallible;

    /// Unknown agent names fall back to the general assistant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "innovative" => AgentKind::Innovative,
            "compliance" => AgentKind::Compliance,
            _ => AgentKind::General,
        })
    }
}

impl AgentKind {
    pub fn system_prompt(&self, context: &str) -> String {
        let template = match self {
            AgentKind::Innovative => INNOVATIVE_AGENT_SYSTEM_PROMPT,
            AgentKind::Compliance => COMPLIANCE_AGENT_SYSTEM_PROMPT,
            AgentKind::General => DEFAULT_AGENT_SYSTEM_PROMPT,
        };
        render(template, &[("context", context)])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePromptDetails {
    pub lifestyle_or_mockup: &'static str,
    pub scene_description: &'static str,
    pub background_description: &'static str,
    pub lighting_description: &'static str,
    pub styling_description: &'static str,
    pub extra_details: &'static str,
}

impl ImagePromptDetails {
    pub fn for_category(category: &str) -> Self {
        let category = category.to_lowercase();
        if category.contains("beverage") || category.contains("drink") {
            Self {
                lifestyle_or_mockup: "lifestyle product photography",
                scene_description: "Scene: A refreshing drink in a frosted glass bottle with condensation, placed on a rustic wooden table or a modern bar counter.",
                background_description: "Softly blurred background of a cafe, a sunny beach, or a cozy lounge.",
                lighting_description: "Natural, bright lighting that highlights the color and texture of the beverage.",
                styling_description: "Clean, premium aesthetic with fresh garnishes like fruit slices or herbs. Maybe some ice cubes.",
                extra_details: "vibrant colors, appetizing look",
            }
        } else if category.contains("snack") {
            Self {
                lifestyle_or_mockup: "product photography",
                scene_description: "Scene: The snack artfully arranged in a bowl or on a sharing platter. Some pieces might be broken to show texture.",
                background_description: "A clean, minimalist background, perhaps a marble countertop or a wooden board.",
                lighting_description: "Crisp, clean lighting that emphasizes the texture and crunch of the snack.",
                styling_description: "Modern and appetizing. The packaging (e.g., a resealable bag) could be visible next to the product.",
                extra_details: "sharp details, delicious appearance",
            }
        } else if category.contains("cosmetic") {
            Self {
                lifestyle_or_mockup: "luxury product photography",
                scene_description: "Scene: The cosmetic product (e.g., a cream jar, serum bottle) on a clean, elegant surface like marble or glass.",
                background_description: "A simple, out-of-focus background, perhaps with a single leaf or drop of water to hint at natural ingredients.",
                lighting_description: "Soft, diffused studio lighting that gives a gentle glow and minimizes harsh reflections.",
                styling_description: "Minimalist and chic. A smear or swatch of the product could be visible to show texture and color.",
                extra_details: "elegant, high-end, clean aesthetic",
            }
        } else if category.contains("liquor") || category.contains("spirit") {
            Self {
                lifestyle_or_mockup: "sophisticated product photography",
                scene_description: "Scene: The liquor in a stylish, appropriate glass (e.g., whiskey tumbler, cocktail glass) on a dark wood or stone surface.",
                background_description: "A moody, dimly lit bar or a sophisticated study in the background. Perhaps a hint of smoke.",
                lighting_description: "Dramatic, directional lighting (chiaroscuro) that highlights the glass and the color of the liquid.",
                styling_description: "Elegant, with a single large ice cube or a twist of citrus peel.",
                extra_details: "rich tones, atmospheric, premium feel",
            }
        } else {
            Self {
                lifestyle_or_mockup: "product mockup",
                scene_description: "Scene: The product packaging displayed clearly on a neutral surface.",
                background_description: "A clean, simple studio background (light gray or white).",
                lighting_description: "Bright, even studio lighting.",
                styling_description: "Minimalist and clean. The product should be the sole focus.",
                extra_details: "photorealistic packaging, clear branding",
            }
        }
    }

    pub fn render(&self, product_name: &str, product_description: &str) -> String {
        render(
            IMAGE_PROMPT_TEMPLATE,
            &[
                ("lifestyle_or_mockup", self.lifestyle_or_mockup),
                ("product_name", product_name),
                ("product_description", product_description),
                ("scene_description", self.scene_description),
                ("background_description", self.background_description),
                ("lighting_description", self.lighting_description),
                ("styling_description", self.styling_description),
                ("extra_details", self.extra_details),
            ],
        )
    }
}
