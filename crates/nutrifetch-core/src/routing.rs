use std::collections::HashSet;
use std::env;
use std::sync::Arc;
use std::time::Instant;

use crate::adapters::{
    CalorieNinjasAdapter, CalorieNinjasConfig, OpenFoodFactsAdapter, OpenFoodFactsConfig,
    UsdaAdapter, UsdaConfig,
};
use crate::data_source::{NutritionSource, SourceError};
use crate::http_client::{HttpClient, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::retry::{RetryPolicy, RetryingHttpClient};
use crate::{EnvelopeError, FoodName, NutritionRecord, ProviderId};

/// Source selection strategy for a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// Walk the whole chain in priority order.
    Auto,
    /// Query a single provider, no fallback.
    Only(ProviderId),
}

/// A record found by one provider of the chain.
#[derive(Debug, Clone)]
pub struct ResolveSuccess {
    pub record: NutritionRecord,
    pub selected_source: ProviderId,
    pub source_chain: Vec<ProviderId>,
    pub misses: Vec<EnvelopeError>,
    pub warnings: Vec<String>,
    pub latency_ms: u64,
}

/// Every attempted provider produced nothing.
#[derive(Debug, Clone)]
pub struct ResolveFailure {
    pub source_chain: Vec<ProviderId>,
    pub misses: Vec<EnvelopeError>,
    pub warnings: Vec<String>,
    pub latency_ms: u64,
}

pub type ResolveResult = Result<ResolveSuccess, ResolveFailure>;

/// Registration state of one provider, used by the `sources` CLI command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSnapshot {
    pub id: ProviderId,
    /// 1-based position in the chain; `None` when disabled.
    pub priority: Option<usize>,
    pub disabled_reason: Option<&'static str>,
}

impl SourceSnapshot {
    pub fn enabled(self) -> bool {
        self.priority.is_some()
    }

    pub fn status_label(self) -> &'static str {
        match (self.priority, self.disabled_reason) {
            (Some(_), _) => "enabled",
            (None, Some(reason)) => reason,
            (None, None) => "disabled",
        }
    }
}

/// Priority-ordered provider chain.
///
/// Providers are tried one after another; the first record wins and later
/// providers are never invoked.
pub struct FoodResolver {
    sources: Vec<Arc<dyn NutritionSource>>,
    disabled: Vec<(ProviderId, &'static str)>,
}

impl FoodResolver {
    /// Registers `sources` in the given order. A repeated provider id keeps
    /// its first registration.
    pub fn new(sources: Vec<Arc<dyn NutritionSource>>) -> Self {
        let mut seen = HashSet::new();
        let sources = sources
            .into_iter()
            .filter(|source| seen.insert(source.id()))
            .collect();

        Self {
            sources,
            disabled: Vec::new(),
        }
    }

    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    pub fn chain(&self) -> Vec<ProviderId> {
        self.sources.iter().map(|source| source.id()).collect()
    }

    pub fn snapshots(&self) -> Vec<SourceSnapshot> {
        let chain = self.chain();
        ProviderId::ALL
            .into_iter()
            .map(|id| {
                let priority = chain.iter().position(|provider| *provider == id).map(|index| index + 1);
                let disabled_reason = self
                    .disabled
                    .iter()
                    .find(|(provider, _)| *provider == id)
                    .map(|(_, reason)| *reason);
                SourceSnapshot {
                    id,
                    priority,
                    disabled_reason,
                }
            })
            .collect()
    }

    /// Resolves free text to the first provider record, or `None`.
    ///
    /// Blank input resolves to `None` without touching any provider.
    pub async fn resolve(&self, food_name: &str) -> Option<NutritionRecord> {
        let name = match FoodName::parse(food_name) {
            Ok(name) => name,
            Err(error) => {
                tracing::debug!(%error, "rejected food name");
                return None;
            }
        };

        self.resolve_with(&name, &ResolveStrategy::Auto)
            .await
            .ok()
            .map(|success| success.record)
    }

    /// Resolves `name` and reports which providers were tried and why they missed.
    pub async fn resolve_with(&self, name: &FoodName, strategy: &ResolveStrategy) -> ResolveResult {
        let started = Instant::now();
        let mut source_chain = Vec::with_capacity(self.sources.len());
        let mut misses = Vec::new();

        for source in self.planned_sources(strategy) {
            let provider = source.id();
            source_chain.push(provider);

            match source.lookup(name).await {
                Ok(record) => {
                    let mut warnings = Vec::new();
                    if !misses.is_empty() {
                        warnings.push(format!(
                            "resolved by '{}' after {} provider(s) produced nothing",
                            provider.as_str(),
                            misses.len()
                        ));
                    }

                    tracing::info!(
                        food = %name,
                        %provider,
                        record = %record.name,
                        attempted = source_chain.len(),
                        "food resolved"
                    );

                    return Ok(ResolveSuccess {
                        record,
                        selected_source: provider,
                        source_chain,
                        misses,
                        warnings,
                        latency_ms: elapsed_ms(started),
                    });
                }
                Err(error) => {
                    tracing::debug!(food = %name, %provider, %error, "provider produced no record");
                    misses.push(EnvelopeError::from_source_error(provider, &error));
                }
            }
        }

        if let ResolveStrategy::Only(provider) = strategy {
            if source_chain.is_empty() {
                source_chain.push(*provider);
                misses.push(EnvelopeError::from_source_error(
                    *provider,
                    &SourceError::not_configured(*provider),
                ));
            }
        }

        tracing::info!(food = %name, attempted = source_chain.len(), "food not found");

        Err(ResolveFailure {
            source_chain,
            misses,
            warnings: vec![format!("no provider returned a record for '{name}'")],
            latency_ms: elapsed_ms(started),
        })
    }

    fn planned_sources(&self, strategy: &ResolveStrategy) -> Vec<&Arc<dyn NutritionSource>> {
        match strategy {
            ResolveStrategy::Auto => self.sources.iter().collect(),
            ResolveStrategy::Only(provider) => self
                .sources
                .iter()
                .filter(|source| source.id() == *provider)
                .collect(),
        }
    }
}

/// Builds a [`FoodResolver`] whose adapters share one retrying HTTP client.
///
/// # Environment Variables
///
/// | Provider | Primary Env Var | Fallback Env Var |
/// |----------|----------------|------------------|
/// | CalorieNinjas | `NUTRIFETCH_CALORIENINJAS_API_KEY` | `CALORIENINJAS_API_KEY` |
/// | USDA | `NUTRIFETCH_USDA_API_KEY` | `USDA_API_KEY` |
/// | Open Food Facts | (no key required) | - |
///
/// CalorieNinjas is left out of the chain when no key is configured; USDA
/// falls back to `DEMO_KEY`.
///
/// # Example
///
/// ```rust,ignore
/// use nutrifetch_core::ResolverBuilder;
///
/// let resolver = ResolverBuilder::new()
///     .with_env_credentials()
///     .with_timeout_ms(3_000)
///     .build();
/// ```
pub struct ResolverBuilder {
    calorieninjas_api_key: Option<String>,
    usda_api_key: Option<String>,
    calorieninjas_base_url: Option<String>,
    usda_base_url: Option<String>,
    openfoodfacts_base_url: Option<String>,
    timeout_ms: u64,
    retry_policy: RetryPolicy,
    http_client: Option<Arc<dyn HttpClient>>,
    enable_calorieninjas: bool,
    enable_usda: bool,
    enable_openfoodfacts: bool,
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResolverBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverBuilder")
            .field("calorieninjas_api_key", &self.calorieninjas_api_key.as_ref().map(|_| "<redacted>"))
            .field("usda_api_key", &self.usda_api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .field("retry_policy", &self.retry_policy)
            .field("custom_http_client", &self.http_client.is_some())
            .field("enable_calorieninjas", &self.enable_calorieninjas)
            .field("enable_usda", &self.enable_usda)
            .field("enable_openfoodfacts", &self.enable_openfoodfacts)
            .finish()
    }
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self {
            calorieninjas_api_key: None,
            usda_api_key: None,
            calorieninjas_base_url: None,
            usda_base_url: None,
            openfoodfacts_base_url: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry_policy: RetryPolicy::default(),
            http_client: None,
            enable_calorieninjas: true,
            enable_usda: true,
            enable_openfoodfacts: true,
        }
    }

    /// Reads API keys from the environment. Blank values are ignored and
    /// keys already set on the builder are kept.
    pub fn with_env_credentials(mut self) -> Self {
        if let Some(key) = env_key("NUTRIFETCH_CALORIENINJAS_API_KEY", "CALORIENINJAS_API_KEY") {
            self.calorieninjas_api_key.get_or_insert(key);
        }
        if let Some(key) = env_key("NUTRIFETCH_USDA_API_KEY", "USDA_API_KEY") {
            self.usda_api_key.get_or_insert(key);
        }
        self
    }

    pub fn with_calorieninjas_key(mut self, key: impl Into<String>) -> Self {
        self.calorieninjas_api_key = Some(key.into());
        self
    }

    pub fn with_usda_key(mut self, key: impl Into<String>) -> Self {
        self.usda_api_key = Some(key.into());
        self
    }

    pub fn with_calorieninjas_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.calorieninjas_base_url = Some(base_url.into());
        self
    }

    pub fn with_usda_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.usda_base_url = Some(base_url.into());
        self
    }

    pub fn with_openfoodfacts_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.openfoodfacts_base_url = Some(base_url.into());
        self
    }

    /// Per-exchange timeout applied by every adapter.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Replaces the pooled reqwest transport. The retry policy still wraps it.
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn with_calorieninjas_enabled(mut self, enabled: bool) -> Self {
        self.enable_calorieninjas = enabled;
        self
    }

    pub fn with_usda_enabled(mut self, enabled: bool) -> Self {
        self.enable_usda = enabled;
        self
    }

    pub fn with_openfoodfacts_enabled(mut self, enabled: bool) -> Self {
        self.enable_openfoodfacts = enabled;
        self
    }

    pub fn build(self) -> FoodResolver {
        let transport = self
            .http_client
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));
        let http_client: Arc<dyn HttpClient> =
            Arc::new(RetryingHttpClient::new(transport, self.retry_policy));

        let mut sources: Vec<Arc<dyn NutritionSource>> = Vec::with_capacity(ProviderId::ALL.len());
        let mut disabled = Vec::new();

        if !self.enable_calorieninjas {
            disabled.push((ProviderId::CalorieNinjas, "disabled"));
        } else if let Some(key) = self.calorieninjas_api_key {
            let mut config = CalorieNinjasConfig::new(key).with_timeout_ms(self.timeout_ms);
            if let Some(base_url) = self.calorieninjas_base_url {
                config = config.with_base_url(base_url);
            }
            sources.push(Arc::new(CalorieNinjasAdapter::new(http_client.clone(), config)));
        } else {
            tracing::debug!("calorieninjas api key not configured; provider skipped");
            disabled.push((ProviderId::CalorieNinjas, "missing_api_key"));
        }

        if self.enable_usda {
            let mut config = self
                .usda_api_key
                .map(UsdaConfig::new)
                .unwrap_or_default()
                .with_timeout_ms(self.timeout_ms);
            if let Some(base_url) = self.usda_base_url {
                config = config.with_base_url(base_url);
            }
            sources.push(Arc::new(UsdaAdapter::new(http_client.clone(), config)));
        } else {
            disabled.push((ProviderId::Usda, "disabled"));
        }

        if self.enable_openfoodfacts {
            let mut config = OpenFoodFactsConfig::default().with_timeout_ms(self.timeout_ms);
            if let Some(base_url) = self.openfoodfacts_base_url {
                config = config.with_base_url(base_url);
            }
            sources.push(Arc::new(OpenFoodFactsAdapter::new(http_client, config)));
        } else {
            disabled.push((ProviderId::OpenFoodFacts, "disabled"));
        }

        let mut resolver = FoodResolver::new(sources);
        resolver.disabled = disabled;
        resolver
    }
}

fn env_key(primary: &str, fallback: &str) -> Option<String> {
    env::var(primary)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| env::var(fallback).ok().filter(|value| !value.trim().is_empty()))
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
}
