use serde::Serialize;

use nutrifetch_core::{FoodResolver, ProviderId};

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct SourceStatus {
    id: ProviderId,
    name: &'static str,
    priority: Option<usize>,
    enabled: bool,
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct SourcesResponseData {
    sources: Vec<SourceStatus>,
}

pub fn run(resolver: &FoodResolver) -> Result<CommandResult, CliError> {
    let sources = resolver
        .snapshots()
        .into_iter()
        .map(|snapshot| SourceStatus {
            id: snapshot.id,
            name: snapshot.id.display_name(),
            priority: snapshot.priority,
            enabled: snapshot.enabled(),
            status: snapshot.status_label(),
        })
        .collect::<Vec<_>>();

    let warnings = sources
        .iter()
        .filter(|source| source.status == "missing_api_key")
        .map(|source| format!("{} is skipped until an API key is configured", source.name))
        .collect();

    let data = serde_json::to_value(SourcesResponseData { sources })?;

    Ok(CommandResult::ok(data, resolver.chain()).with_warnings(warnings))
}
