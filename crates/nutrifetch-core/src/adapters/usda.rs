use std::sync::Arc;

use serde::Deserialize;

use crate::adapters::{fetch_json, invalid_record, trim_base_url};
use crate::data_source::{LookupFuture, NutritionSource, SourceError};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::matching::{normalize, similarity, title_case, BestCandidate};
use crate::nutrients::{
    collect_entries, extract_nutrient, NutrientEntry, RawFoodNutrient, CARBOHYDRATE, ENERGY,
    PROTEIN, TOTAL_FAT, UNIT_GRAM, UNIT_KCAL,
};
use crate::{FoodName, NutritionRecord, ProviderId};

pub const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
/// USDA's public rate-limited key, used when no key is configured.
pub const DEMO_API_KEY: &str = "DEMO_KEY";

pub const PAGE_SIZE: u32 = 25;
pub const SEARCH_DATA_TYPES: [&str; 3] = ["Foundation", "SR Legacy", "Branded"];
/// Curated data tiers that earn [`PREFERRED_TIER_BONUS`].
pub const PREFERRED_DATA_TYPES: [&str; 2] = ["Foundation", "SR Legacy"];
pub const PREFERRED_TIER_BONUS: f64 = 0.1;
/// Candidates reporting fewer kcal than this are trace or non-food entries.
pub const MIN_CANDIDATE_CALORIES: f64 = 20.0;

/// USDA FoodData Central client configuration.
#[derive(Clone)]
pub struct UsdaConfig {
    /// Sent as the `api_key` query parameter.
    pub api_key: String,
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for UsdaConfig {
    fn default() -> Self {
        Self::new(DEMO_API_KEY)
    }
}

impl UsdaConfig {
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

    fn auth(&self) -> HttpAuth {
        HttpAuth::query_param("api_key", self.api_key.as_str())
    }
}

impl std::fmt::Debug for UsdaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsdaConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Secondary provider: search, score and filter candidates, then fetch the
/// winner's detail record.
#[derive(Clone)]
pub struct UsdaAdapter {
    http_client: Arc<dyn HttpClient>,
    config: UsdaConfig,
}

impl UsdaAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: UsdaConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self::new(http_client, UsdaConfig::new(api_key))
    }

    pub fn config(&self) -> &UsdaConfig {
        &self.config
    }

    async fn search(&self, name: &FoodName) -> Result<Vec<UsdaCandidate>, SourceError> {
        let mut request = HttpRequest::get(format!("{}/foods/search", self.config.base_url))
            .with_query("query", name.as_str())
            .with_query("pageSize", PAGE_SIZE.to_string());
        for data_type in SEARCH_DATA_TYPES {
            request = request.with_query("dataType", data_type);
        }
        let request = request
            .with_auth(self.config.auth())
            .with_timeout_ms(self.config.timeout_ms);

        let payload: UsdaSearchResponse =
            fetch_json(self.http_client.as_ref(), ProviderId::Usda, request).await?;
        Ok(payload.foods.into_iter().map(UsdaCandidate::from).collect())
    }

    async fn fetch_detail(&self, candidate: &UsdaCandidate) -> Result<Vec<NutrientEntry>, SourceError> {
        let fdc_id = candidate
            .fdc_id
            .ok_or_else(|| SourceError::malformed("usda candidate has no fdcId"))?;

        let request = HttpRequest::get(format!("{}/food/{fdc_id}", self.config.base_url))
            .with_auth(self.config.auth())
            .with_timeout_ms(self.config.timeout_ms);

        let payload: UsdaFoodDetail =
            fetch_json(self.http_client.as_ref(), ProviderId::Usda, request).await?;
        Ok(collect_entries(payload.food_nutrients))
    }

    async fn resolve(&self, name: &FoodName) -> Result<NutritionRecord, SourceError> {
        let candidates = self.search(name).await?;
        if candidates.is_empty() {
            return Err(SourceError::no_match("usda search returned no foods"));
        }

        let total = candidates.len();
        let best = select_best(candidates, &name.normalized()).ok_or_else(|| {
            SourceError::no_match(format!(
                "none of {total} usda candidates passed the calorie filter"
            ))
        })?;

        let detail = match self.fetch_detail(&best).await {
            Ok(nutrients) => nutrients,
            Err(error) => {
                tracing::debug!(%error, "usda detail fetch failed; using search nutrients");
                best.nutrients.clone()
            }
        };

        build_record(&best, &detail, name)
    }
}

impl NutritionSource for UsdaAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Usda
    }

    fn lookup<'a>(&'a self, name: &'a FoodName) -> LookupFuture<'a> {
        Box::pin(self.resolve(name))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct UsdaSearchResponse {
    #[serde(default)]
    foods: Vec<UsdaFood>,
}

#[derive(Debug, Clone, Deserialize)]
struct UsdaFood {
    #[serde(rename = "fdcId")]
    fdc_id: Option<u64>,
    description: Option<String>,
    #[serde(rename = "brandOwner")]
    brand_owner: Option<String>,
    #[serde(rename = "dataType")]
    data_type: Option<String>,
    #[serde(rename = "foodNutrients", default)]
    food_nutrients: Vec<RawFoodNutrient>,
}

#[derive(Debug, Clone, Deserialize)]
struct UsdaFoodDetail {
    #[serde(rename = "foodNutrients", default)]
    food_nutrients: Vec<RawFoodNutrient>,
}

#[derive(Debug, Clone)]
struct UsdaCandidate {
    fdc_id: Option<u64>,
    description: Option<String>,
    brand_owner: Option<String>,
    data_type: Option<String>,
    nutrients: Vec<NutrientEntry>,
}

impl From<UsdaFood> for UsdaCandidate {
    fn from(food: UsdaFood) -> Self {
        Self {
            fdc_id: food.fdc_id,
            description: food.description,
            brand_owner: food.brand_owner,
            data_type: food.data_type,
            nutrients: collect_entries(food.food_nutrients),
        }
    }
}

impl UsdaCandidate {
    fn is_preferred_tier(&self) -> bool {
        self.data_type
            .as_deref()
            .is_some_and(|data_type| PREFERRED_DATA_TYPES.contains(&data_type))
    }

    /// Similarity of description plus brand to the query, with the tier bonus.
    fn score(&self, normalized_query: &str) -> f64 {
        let description = normalize(self.description.as_deref().unwrap_or_default());
        let brand = normalize(self.brand_owner.as_deref().unwrap_or_default());
        let combined = format!("{description} {brand}");

        let mut score = similarity(combined.trim(), normalized_query);
        if self.is_preferred_tier() {
            score += PREFERRED_TIER_BONUS;
        }
        score
    }

    fn calories(&self) -> f64 {
        extract_nutrient(&self.nutrients, ENERGY, Some(UNIT_KCAL))
    }
}

fn select_best(candidates: Vec<UsdaCandidate>, normalized_query: &str) -> Option<UsdaCandidate> {
    let mut best = BestCandidate::new();
    for candidate in candidates {
        let score = candidate.score(normalized_query);
        let calories = candidate.calories();
        if calories < MIN_CANDIDATE_CALORIES {
            tracing::trace!(fdc_id = ?candidate.fdc_id, calories, "skipping low-calorie usda candidate");
            continue;
        }
        best.offer(candidate, score);
    }
    best.into_best()
}

fn build_record(
    candidate: &UsdaCandidate,
    nutrients: &[NutrientEntry],
    name: &FoodName,
) -> Result<NutritionRecord, SourceError> {
    let description = candidate
        .description
        .as_deref()
        .filter(|description| !description.trim().is_empty())
        .unwrap_or(name.as_str());
    NutritionRecord::new(
        ProviderId::Usda,
        title_case(description),
        extract_nutrient(nutrients, ENERGY, Some(UNIT_KCAL)),
        extract_nutrient(nutrients, PROTEIN, Some(UNIT_GRAM)),
        extract_nutrient(nutrients, CARBOHYDRATE, Some(UNIT_GRAM)),
        extract_nutrient(nutrients, TOTAL_FAT, Some(UNIT_GRAM)),
    )
    .map_err(|error| invalid_record(ProviderId::Usda, error))
}
