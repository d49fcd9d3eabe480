use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::formulation::constants::{DEFAULT_ANIMAL_COUNT, DEFAULT_DAILY_SCALING};
use crate::models::FeedMode;

/// Feed Formulator: blend natural ingredients with commercial feed for a herd.
#[derive(Parser, Debug)]
#[command(name = "feed_formulator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the feed catalog JSON file.
    #[arg(short, long, global = true, default_value = "data/catalog.json")]
    pub catalog: PathBuf,

    /// Log pipeline details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a mix interactively.
    Formulate {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Seed or load a mix and print its report.
    Report {
        #[command(flatten)]
        session: SessionArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Apply a suggestion file to the mix.
    Apply {
        #[command(flatten)]
        session: SessionArgs,

        /// Suggestion JSON ({"ingredients": [{"name", "weight"}]}).
        #[arg(long)]
        suggestion: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Ask a suggestion service for a mix and apply it.
    Suggest {
        #[command(flatten)]
        session: SessionArgs,

        #[command(flatten)]
        provider: ProviderArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List what the catalog offers.
    Catalog,
}

impl Default for Command {
    fn default() -> Self {
        Command::Formulate {
            output: OutputArgs::default(),
        }
    }
}

/// Animal selection, herd parameters and mix edits.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Animal to formulate for.
    #[arg(short, long)]
    pub animal: String,

    /// Sub-species; defaults to the first one listed for the animal.
    #[arg(short, long)]
    pub sub_species: Option<String>,

    /// Number of animals.
    #[arg(long = "animals", default_value_t = DEFAULT_ANIMAL_COUNT)]
    pub animal_count: u32,

    /// Daily scaling factor.
    #[arg(long, default_value_t = DEFAULT_DAILY_SCALING)]
    pub scaling: f64,

    #[arg(long, value_enum, default_value_t = FeedMode::Direct)]
    pub mode: FeedMode,

    /// Feedings per day.
    #[arg(long, default_value_t = 1)]
    pub feedings: u32,

    /// Grams per animal per day; overrides the catalog recommendation.
    #[arg(long)]
    pub feed_per_animal: Option<f64>,

    /// Start from a saved mix instead of seeding one.
    #[arg(long)]
    pub mix: Option<PathBuf>,

    /// Add a natural ingredient (repeatable).
    #[arg(long = "add")]
    pub add: Vec<String>,

    /// Set an ingredient weight as NAME=KG (repeatable).
    #[arg(long = "weight", value_parser = parse_weight)]
    pub weights: Vec<(String, f64)>,

    /// Lock an ingredient at its weight (repeatable).
    #[arg(long = "lock")]
    pub lock: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ProviderArgs {
    /// Suggestion service URL.
    #[arg(long, env = "FEED_SUGGEST_ENDPOINT")]
    pub endpoint: String,

    /// Bearer token for the suggestion service.
    #[arg(long, env = "FEED_SUGGEST_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Seconds to wait for a suggestion.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Write the blend and target table as CSV.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Write the full report as JSON.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Save the resulting mix as JSON.
    #[arg(long)]
    pub save: Option<PathBuf>,
}

/// Parse `NAME=KG`.
fn parse_weight(s: &str) -> Result<(String, f64), String> {
    let (name, kg) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=KG, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing ingredient name in '{}'", s));
    }
    let kg: f64 = kg
        .trim()
        .parse()
        .map_err(|_| format!("invalid weight '{}'", kg))?;
    Ok((name.to_string(), kg))
}
