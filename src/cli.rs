use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "AI formulation and market-insight toolkit", long_about = None)]
pub struct Cli {
    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log debug output, including raw model responses
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize an article and classify its sentiment
    Summarize {
        /// File containing the article text
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Extract trend signals from social media posts
    TrendSignals {
        /// File containing the posts, one block per post
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Extract structured trend data from an article
    TrendData {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Enrich an ingredient with description, benefits, claims and more
    Enrich { ingredient: String },
    /// Suggest functionally similar alternatives for an ingredient
    Substitutes { ingredient: String },
    /// Generate market insight portal data for an ingredient
    InsightPortal { ingredient: String },
    /// Generate a formula for a product concept
    Formula {
        concept: String,
        /// JSON file with earlier chat messages ([{"role", "content"}])
        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// Generate marketing copy and a product mock-up for a formula
    Marketing {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long, default_value_t = 0)]
        formula_id: i64,
    },
    /// Run the commercialization analysis for a workflow request
    Commercialize {
        /// JSON file holding the workflow request
        #[arg(short, long)]
        request: PathBuf,
    },
    /// Recalculate a timeline after stage adjustments (no model call)
    Timeline {
        /// JSON file holding the list of stages
        #[arg(short, long)]
        stages: PathBuf,
        /// JSON file holding the list of adjustments
        #[arg(short, long)]
        adjustments: Option<PathBuf>,
    },
    /// Ask one of the chat agents a question
    Chat {
        message: String,
        /// innovative, compliance or general
        #[arg(long, default_value = "innovative")]
        agent: String,
        /// Context passed to the agent
        #[arg(long, default_value = "")]
        context: String,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
