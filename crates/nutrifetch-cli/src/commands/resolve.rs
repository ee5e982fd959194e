use nutrifetch_core::{FoodName, FoodResolver, ResolveStrategy};
use serde_json::Value;

use crate::cli::{ResolveArgs, SourceSelector};
use crate::error::CliError;

use super::CommandResult;

pub async fn run(
    args: &ResolveArgs,
    resolver: &FoodResolver,
    source: SourceSelector,
) -> Result<CommandResult, CliError> {
    let name = FoodName::parse(&args.food_name())?;
    let strategy = match source.provider() {
        Some(provider) => ResolveStrategy::Only(provider),
        None => ResolveStrategy::Auto,
    };

    match resolver.resolve_with(&name, &strategy).await {
        Ok(success) => {
            let data = serde_json::to_value(&success.record)?;
            Ok(CommandResult::ok(data, success.source_chain)
                .with_selected_source(success.selected_source)
                .with_warnings(success.warnings)
                .with_errors(success.misses)
                .with_latency(success.latency_ms))
        }
        Err(failure) => Ok(CommandResult::ok(Value::Null, failure.source_chain)
            .with_warnings(failure.warnings)
            .with_errors(failure.misses)
            .with_latency(failure.latency_ms)
            .not_found(name.as_str())),
    }
}
