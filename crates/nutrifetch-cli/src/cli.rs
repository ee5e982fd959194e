//! CLI argument definitions for nutrifetch.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `resolve` | Resolve a food name to nutrition facts per 100 g |
//! | `sources` | List the provider chain in priority order |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--source` | `auto` | Provider selection |
//! | `--timeout-ms` | `5000` | Per-request timeout in ms |
//! | `--max-retries` | `3` | Retries after a failed request |
//!
//! # Examples
//!
//! ```bash
//! nutrifetch resolve chicken breast
//! nutrifetch resolve "greek yogurt" --format table
//! nutrifetch resolve nutella --source openfoodfacts --pretty
//! nutrifetch sources
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use nutrifetch_core::ProviderId;

/// Nutrition facts for a food name, resolved across public nutrition APIs.
///
/// Providers are queried in priority order (CalorieNinjas, USDA FoodData
/// Central, Open Food Facts) and the first match wins.
#[derive(Debug, Parser)]
#[command(
    name = "nutrifetch",
    author,
    version,
    about = "Resolve food names to nutrition facts per 100 g",
    long_about = "nutrifetch resolves a free-text food name to calories, protein, carbohydrates \
and fat per 100 g.\n\
\n\
API keys are read from NUTRIFETCH_CALORIENINJAS_API_KEY (or CALORIENINJAS_API_KEY) and \
NUTRIFETCH_USDA_API_KEY (or USDA_API_KEY). Set RUST_LOG to adjust log output on stderr."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Provider selection: walk the whole chain or query one provider.
    #[arg(long, global = true, value_enum, default_value_t = SourceSelector::Auto)]
    pub source: SourceSelector,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = 5_000)]
    pub timeout_ms: u64,

    /// Retries after a timeout, connection failure or 5xx response.
    #[arg(long, global = true, default_value_t = 3)]
    pub max_retries: u32,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    Table,
    /// Single JSON envelope.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelector {
    /// Priority chain with fallback.
    Auto,
    Calorieninjas,
    Usda,
    Openfoodfacts,
}

impl SourceSelector {
    pub const fn provider(self) -> Option<ProviderId> {
        match self {
            Self::Auto => None,
            Self::Calorieninjas => Some(ProviderId::CalorieNinjas),
            Self::Usda => Some(ProviderId::Usda),
            Self::Openfoodfacts => Some(ProviderId::OpenFoodFacts),
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a food name to a nutrition record.
    ///
    /// Words are joined with single spaces, so quoting is optional.
    ///
    /// # Examples
    ///
    ///   nutrifetch resolve chicken breast
    ///   nutrifetch resolve banana --source usda
    Resolve(ResolveArgs),

    /// List providers in priority order and whether each is enabled.
    Sources,
}

/// Arguments for the `resolve` command.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Food name, e.g. `chicken breast`.
    #[arg(required = true, num_args = 1..)]
    pub words: Vec<String>,
}

impl ResolveArgs {
    pub fn food_name(&self) -> String {
        self.words.join(" ")
    }
}
