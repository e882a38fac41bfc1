use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use formula_insight::api_connection::ChatMessage;
use formula_insight::cli::{parse_args, Command};
use formula_insight::commercialization::{CommercializationService, WorkflowRequest};
use formula_insight::config::Settings;
use formula_insight::inputs::{read_json_file, read_text_file, recalculate_from_files};
use formula_insight::marketing::{FormulaSummary, MarketingService};
use formula_insight::prompts::AgentKind;

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("FORMULA_INSIGHT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("formula_insight error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = parse_args();
    init_tracing(cli.quiet, cli.verbose)?;
    let settings = Settings::from_env()?;

    let provider = Arc::new(settings.build_provider());

    match cli.command {
        Command::Timeline { stages, adjustments } => {
            let timeline = recalculate_from_files(
                &stages,
                adjustments.as_deref(),
                settings.unmatched_stage_policy,
            )
            .await?;
            print_json(&timeline)
        }
        Command::Summarize { file } => {
            let text = read_text_file(&file).await?;
            print_json(&provider.generate_summary_and_sentiment(&text).await?)
        }
        Command::TrendSignals { file } => {
            let posts = read_text_file(&file).await?;
            print_json(&provider.generate_trend_signals(&posts).await?)
        }
        Command::TrendData { file } => {
            let article = read_text_file(&file).await?;
            print_json(&provider.generate_trend_data(&article).await?)
        }
        Command::Enrich { ingredient } => {
            print_json(&provider.generate_ingredient_enrichment(&ingredient).await?)
        }
        Command::Substitutes { ingredient } => {
            print_json(&provider.generate_ingredient_substitutions(&ingredient).await?)
        }
        Command::InsightPortal { ingredient } => {
            print_json(&provider.generate_insight_portal_data(&ingredient).await?)
        }
        Command::Formula { concept, history } => {
            let history: Vec<ChatMessage> = match history {
                Some(path) => read_json_file(&path).await?,
                None => Vec::new(),
            };
            print_json(&provider.generate_formula_details(&concept, &history).await?)
        }
        Command::Marketing {
            name,
            description,
            formula_id,
        } => {
            let formula = FormulaSummary {
                id: formula_id,
                name,
                description,
            };
            let package = MarketingService::new(provider)
                .generate_for_formula(&formula)
                .await
                .context("Marketing generation failed")?;
            print_json(&package)
        }
        Command::Commercialize { request } => {
            let request: WorkflowRequest = read_json_file(&request).await?;
            let analysis = CommercializationService::new(provider, settings.unmatched_stage_policy)
                .analyze(&request)
                .await
                .context("Commercialization analysis failed")?;
            print_json(&analysis)
        }
        Command::Chat {
            message,
            agent,
            context,
        } => {
            let agent: AgentKind = agent.parse().unwrap_or_default();
            let reply = provider
                .generate_chat_reply(&[ChatMessage::user(message)], agent, &context)
                .await?;
            println!("{reply}");
            Ok(())
        }
    }
}
