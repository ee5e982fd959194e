use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::adapters::{fetch_json, invalid_record, trim_base_url};
use crate::data_source::{LookupFuture, NutritionSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::{FoodName, NutritionRecord, ProviderId};

pub const DEFAULT_BASE_URL: &str = "https://world.openfoodfacts.org";

const ENERGY_KCAL_KEY: &str = "energy-kcal_100g";
const PROTEIN_KEY: &str = "proteins_100g";
const CARBOHYDRATE_KEY: &str = "carbohydrates_100g";
const FAT_KEY: &str = "fat_100g";

/// Open Food Facts client configuration. The public search API needs no key.
#[derive(Debug, Clone)]
pub struct OpenFoodFactsConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for OpenFoodFactsConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl OpenFoodFactsConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = trim_base_url(base_url);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Fallback provider. Trusts the provider's own ranking and takes the first
/// product without re-scoring.
#[derive(Clone)]
pub struct OpenFoodFactsAdapter {
    http_client: Arc<dyn HttpClient>,
    config: OpenFoodFactsConfig,
}

impl OpenFoodFactsAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: OpenFoodFactsConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self::new(http_client, OpenFoodFactsConfig::default())
    }

    pub fn config(&self) -> &OpenFoodFactsConfig {
        &self.config
    }

    async fn resolve(&self, name: &FoodName) -> Result<NutritionRecord, SourceError> {
        let request = HttpRequest::get(format!("{}/cgi/search.pl", self.config.base_url))
            .with_query("search_terms", name.as_str())
            .with_query("search_simple", "1")
            .with_query("action", "process")
            .with_query("json", "1")
            .with_timeout_ms(self.config.timeout_ms);

        let payload: OffSearchResponse =
            fetch_json(self.http_client.as_ref(), ProviderId::OpenFoodFacts, request).await?;

        if payload.count() == 0 {
            return Err(SourceError::no_match("openfoodfacts reported zero products"));
        }

        let first = payload
            .products
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::no_match("openfoodfacts returned an empty product list"))?;

        // Only the first product is decoded; the rest of the page is never inspected.
        let product: OffProduct = serde_json::from_value(first).map_err(|error| {
            SourceError::malformed(format!("failed to parse openfoodfacts product: {error}"))
        })?;

        build_record(product, name)
    }
}

impl NutritionSource for OpenFoodFactsAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::OpenFoodFacts
    }

    fn lookup<'a>(&'a self, name: &'a FoodName) -> LookupFuture<'a> {
        Box::pin(self.resolve(name))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct OffSearchResponse {
    #[serde(default)]
    count: Option<Value>,
    #[serde(default)]
    products: Vec<Value>,
}

impl OffSearchResponse {
    /// `count` arrives as a number or a numeric string depending on the endpoint version.
    fn count(&self) -> u64 {
        match &self.count {
            Some(Value::Number(number)) => number
                .as_u64()
                .or_else(|| number.as_f64().filter(|value| *value > 0.0).map(|value| value as u64))
                .unwrap_or(0),
            Some(Value::String(text)) => text.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct OffProduct {
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    nutriments: Option<Map<String, Value>>,
}

fn nutriment(nutriments: Option<&Map<String, Value>>, key: &str) -> f64 {
    let value = match nutriments.and_then(|nutriments| nutriments.get(key)) {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|value| value.is_finite()).unwrap_or(0.0)
}

fn build_record(product: OffProduct, name: &FoodName) -> Result<NutritionRecord, SourceError> {
    let display_name = product
        .product_name
        .filter(|product_name| !product_name.trim().is_empty())
        .unwrap_or_else(|| name.as_str().to_owned());

    let nutriments = product.nutriments.as_ref();
    NutritionRecord::new(
        ProviderId::OpenFoodFacts,
        display_name,
        nutriment(nutriments, ENERGY_KCAL_KEY),
        nutriment(nutriments, PROTEIN_KEY),
        nutriment(nutriments, CARBOHYDRATE_KEY),
        nutriment(nutriments, FAT_KEY),
    )
    .map_err(|error| invalid_record(ProviderId::OpenFoodFacts, error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::{block_on, RecordingHttpClient};
    use crate::data_source::SourceErrorKind;
    use crate::http_client::HttpAuth;

    fn adapter(client: &Arc<RecordingHttpClient>) -> OpenFoodFactsAdapter {
        OpenFoodFactsAdapter::new(
            client.clone(),
            OpenFoodFactsConfig::default().with_base_url("https://off.test"),
        )
    }

    fn food(name: &str) -> FoodName {
        FoodName::parse(name).expect("valid food name")
    }

    #[test]
    fn takes_first_product_verbatim() {
        let body = r#"{"count": 2, "products": [
            {"product_name": "nutella", "nutriments": {
                "energy-kcal_100g": 539, "proteins_100g": 6.3,
                "carbohydrates_100g": 57.5, "fat_100g": 30.9
            }},
            {"product_name": "Nutella Biscuits", "nutriments": {"energy-kcal_100g": 511}}
        ]}"#;
        let client = Arc::new(RecordingHttpClient::json(&[body]));
        let record = block_on(adapter(&client).lookup(&food("nutella"))).expect("lookup should succeed");

        assert_eq!(record.source, ProviderId::OpenFoodFacts);
        assert_eq!(record.name, "nutella");
        assert_eq!(record.calories_per_100g, 539.0);
        assert_eq!(record.protein, 6.3);
        assert_eq!(record.carbs, 57.5);
        assert_eq!(record.fats, 30.9);
    }

    #[test]
    fn later_products_with_unexpected_shapes_are_ignored() {
        let body = r#"{"count": 2, "products": [
            {"product_name": "Nutella", "nutriments": {"energy-kcal_100g": 539}},
            {"product_name": "Other", "nutriments": null},
            "not even an object"
        ]}"#;
        let client = Arc::new(RecordingHttpClient::json(&[body]));
        let record = block_on(adapter(&client).lookup(&food("nutella"))).expect("lookup should succeed");

        assert_eq!(record.name, "Nutella");
        assert_eq!(record.calories_per_100g, 539.0);
    }

    #[test]
    fn null_nutriments_on_the_first_product_read_as_zero() {
        let body = r#"{"count": 1, "products": [{"product_name": "Mystery Jar", "nutriments": null}]}"#;
        let client = Arc::new(RecordingHttpClient::json(&[body]));
        let record = block_on(adapter(&client).lookup(&food("jar"))).expect("lookup should succeed");

        assert_eq!(record.name, "Mystery Jar");
        assert_eq!(record.calories_per_100g, 0.0);
        assert_eq!(record.fats, 0.0);
    }

    #[test]
    fn first_product_that_is_not_an_object_is_malformed() {
        let body = r#"{"count": 1, "products": ["nutella"]}"#;
        let client = Arc::new(RecordingHttpClient::json(&[body]));
        let error = block_on(adapter(&client).lookup(&food("nutella"))).expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Malformed);
    }

    #[test]
    fn sends_search_parameters_without_credentials() {
        let client = Arc::new(RecordingHttpClient::json(&[r#"{"count": 0, "products": []}"#]));
        let _ = block_on(adapter(&client).lookup(&food("oat milk")));

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.url, "https://off.test/cgi/search.pl");
        assert_eq!(request.query_value("search_terms"), Some("oat milk"));
        assert_eq!(request.query_value("search_simple"), Some("1"));
        assert_eq!(request.query_value("action"), Some("process"));
        assert_eq!(request.query_value("json"), Some("1"));
        assert_eq!(request.auth, HttpAuth::None);
    }

    #[test]
    fn zero_or_missing_count_is_no_match() {
        let client = Arc::new(RecordingHttpClient::json(&[
            r#"{"count": 0, "products": [{"product_name": "ghost"}]}"#,
            r#"{"products": [{"product_name": "ghost"}]}"#,
        ]));
        let adapter = adapter(&client);

        for _ in 0..2 {
            let error = block_on(adapter.lookup(&food("ghost"))).expect_err("must fail");
            assert_eq!(error.kind(), SourceErrorKind::NoMatch);
        }
    }

    #[test]
    fn positive_count_with_no_products_is_no_match() {
        let client = Arc::new(RecordingHttpClient::json(&[r#"{"count": 3, "products": []}"#]));
        let error = block_on(adapter(&client).lookup(&food("tofu"))).expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::NoMatch);
    }

    #[test]
    fn string_count_and_string_nutriments_are_accepted() {
        let body = r#"{"count": "12", "products": [{"product_name": "Hummus", "nutriments": {
            "energy-kcal_100g": "166", "proteins_100g": "7.9", "fat_100g": "n/a"
        }}]}"#;
        let client = Arc::new(RecordingHttpClient::json(&[body]));
        let record = block_on(adapter(&client).lookup(&food("hummus"))).expect("lookup should succeed");

        assert_eq!(record.calories_per_100g, 166.0);
        assert_eq!(record.protein, 7.9);
        assert_eq!(record.carbs, 0.0);
        assert_eq!(record.fats, 0.0);
    }

    #[test]
    fn blank_or_missing_product_name_uses_the_query() {
        let client = Arc::new(RecordingHttpClient::json(&[
            r#"{"count": 1, "products": [{"product_name": "  ", "nutriments": {}}]}"#,
            r#"{"count": 1, "products": [{}]}"#,
        ]));
        let adapter = adapter(&client);

        let blank = block_on(adapter.lookup(&food("oat milk"))).expect("lookup should succeed");
        assert_eq!(blank.name, "oat milk");
        assert_eq!(blank.calories_per_100g, 0.0);

        let missing = block_on(adapter.lookup(&food("oat milk"))).expect("lookup should succeed");
        assert_eq!(missing.name, "oat milk");
    }

    #[test]
    fn negative_nutriments_are_rejected() {
        let body = r#"{"count": 1, "products": [{"product_name": "odd", "nutriments": {"fat_100g": -1}}]}"#;
        let client = Arc::new(RecordingHttpClient::json(&[body]));
        let error = block_on(adapter(&client).lookup(&food("odd"))).expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Malformed);
    }

    #[test]
    fn non_json_body_yields_nothing() {
        let client = Arc::new(RecordingHttpClient::json(&["<html>maintenance</html>"]));
        assert_eq!(block_on(adapter(&client).query(&food("bread"))), None);
    }
}
