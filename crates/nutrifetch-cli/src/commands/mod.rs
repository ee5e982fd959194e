mod resolve;
mod sources;

use nutrifetch_core::{
    Envelope, EnvelopeError, EnvelopeMeta, FoodResolver, ProviderId, ResolverBuilder, RetryPolicy,
};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
    pub source_chain: Vec<ProviderId>,
    pub selected_source: Option<ProviderId>,
    /// Set when the command ran but produced nothing to report.
    pub not_found: Option<String>,
}

impl CommandResult {
    pub fn ok(data: Value, source_chain: Vec<ProviderId>) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
            source_chain,
            selected_source: None,
            not_found: None,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_selected_source(mut self, source: ProviderId) -> Self {
        self.selected_source = Some(source);
        self
    }

    pub fn not_found(mut self, food: impl Into<String>) -> Self {
        self.not_found = Some(food.into());
        self
    }
}

/// Envelope to render plus the food name when nothing was found.
pub struct CommandOutput {
    pub envelope: Envelope<Value>,
    pub not_found: Option<String>,
}

pub async fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    let resolver = build_resolver(cli);

    let command_result = match &cli.command {
        Command::Resolve(args) => resolve::run(args, &resolver, cli.source).await?,
        Command::Sources => sources::run(&resolver)?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
        latency_ms,
        source_chain,
        selected_source,
        not_found,
    } = command_result;

    let mut meta = EnvelopeMeta::generate(source_chain, latency_ms).with_warnings(warnings);
    if let Some(source) = selected_source {
        meta = meta.with_selected_source(source);
    }

    let envelope = Envelope::with_errors(meta, data, errors)?;
    Ok(CommandOutput {
        envelope,
        not_found,
    })
}

fn build_resolver(cli: &Cli) -> FoodResolver {
    ResolverBuilder::new()
        .with_env_credentials()
        .with_timeout_ms(cli.timeout_ms)
        .with_retry_policy(RetryPolicy::with_max_retries(cli.max_retries))
        .build()
}
