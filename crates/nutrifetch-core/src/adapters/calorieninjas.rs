use std::sync::Arc;

use serde::Deserialize;

use crate::adapters::{fetch_json, invalid_record, trim_base_url};
use crate::data_source::{LookupFuture, NutritionSource, SourceError};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::matching::{normalize, similarity, title_case, BestCandidate};
use crate::{FoodName, NutritionRecord, ProviderId};

pub const DEFAULT_BASE_URL: &str = "https://api.calorieninjas.com";

/// CalorieNinjas client configuration.
#[derive(Clone)]
pub struct CalorieNinjasConfig {
    /// Sent as the `X-Api-Key` header.
    pub api_key: String,
    pub base_url: String,
    pub timeout_ms: u64,
}

impl CalorieNinjasConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = trim_base_url(base_url);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl std::fmt::Debug for CalorieNinjasConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalorieNinjasConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Primary provider: a single nutrition query scored by name similarity.
#[derive(Clone)]
pub struct CalorieNinjasAdapter {
    http_client: Arc<dyn HttpClient>,
    config: CalorieNinjasConfig,
}

impl CalorieNinjasAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: CalorieNinjasConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self::new(http_client, CalorieNinjasConfig::new(api_key))
    }

    pub fn config(&self) -> &CalorieNinjasConfig {
        &self.config
    }

    async fn fetch_items(&self, name: &FoodName) -> Result<Vec<CalorieNinjasItem>, SourceError> {
        let request = HttpRequest::get(format!("{}/v1/nutrition", self.config.base_url))
            .with_query("query", name.as_str())
            .with_auth(HttpAuth::header("X-Api-Key", self.config.api_key.as_str()))
            .with_timeout_ms(self.config.timeout_ms);

        let payload: CalorieNinjasResponse =
            fetch_json(self.http_client.as_ref(), ProviderId::CalorieNinjas, request).await?;
        Ok(payload.items)
    }

    async fn resolve(&self, name: &FoodName) -> Result<NutritionRecord, SourceError> {
        let items = self.fetch_items(name).await?;
        if items.is_empty() {
            return Err(SourceError::no_match("calorieninjas returned no items"));
        }

        let best = select_best(&items, &name.normalized()).ok_or_else(|| {
            SourceError::no_match("no calorieninjas item resembles the query")
        })?;

        normalize_item(best, name)
    }
}

impl NutritionSource for CalorieNinjasAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::CalorieNinjas
    }

    fn lookup<'a>(&'a self, name: &'a FoodName) -> LookupFuture<'a> {
        Box::pin(self.resolve(name))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CalorieNinjasResponse {
    #[serde(default)]
    items: Vec<CalorieNinjasItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CalorieNinjasItem {
    name: Option<String>,
    calories: Option<f64>,
    protein_g: Option<f64>,
    carbohydrates_total_g: Option<f64>,
    fat_total_g: Option<f64>,
}

fn select_best<'a>(
    items: &'a [CalorieNinjasItem],
    normalized_query: &str,
) -> Option<&'a CalorieNinjasItem> {
    let mut best = BestCandidate::new();
    for item in items {
        let description = normalize(item.name.as_deref().unwrap_or_default());
        let score = similarity(&description, normalized_query);
        tracing::trace!(candidate = %description, score, "scored calorieninjas item");
        best.offer(item, score);
    }
    best.into_best()
}

fn normalize_item(item: &CalorieNinjasItem, name: &FoodName) -> Result<NutritionRecord, SourceError> {
    let display_name = title_case(
        item.name
            .as_deref()
            .filter(|item_name| !item_name.trim().is_empty())
            .unwrap_or(name.as_str()),
    );
    NutritionRecord::new(
        ProviderId::CalorieNinjas,
        display_name,
        item.calories.unwrap_or(0.0),
        item.protein_g.unwrap_or(0.0),
        item.carbohydrates_total_g.unwrap_or(0.0),
        item.fat_total_g.unwrap_or(0.0),
    )
    .map_err(|error| invalid_record(ProviderId::CalorieNinjas, error))
}
