use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use nutrifetch_core::{
    CalorieNinjasAdapter, CalorieNinjasConfig, FoodName, HttpClient, HttpError, HttpRequest,
    HttpResponse, NutritionSource, OpenFoodFactsAdapter, OpenFoodFactsConfig, ProviderId,
    SourceErrorKind, UsdaAdapter, UsdaConfig,
};

/// Answers by URL suffix; unknown URLs fail to connect.
struct RouteStub {
    routes: Vec<(&'static str, Result<HttpResponse, HttpError>)>,
    seen: Mutex<Vec<String>>,
}

impl RouteStub {
    fn new(routes: Vec<(&'static str, Result<HttpResponse, HttpError>)>) -> Arc<Self> {
        Arc::new(Self {
            routes,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().expect("lock").clone()
    }
}

impl HttpClient for RouteStub {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.seen.lock().expect("lock").push(request.url.clone());
        let outcome = self
            .routes
            .iter()
            .find(|(suffix, _)| request.url.ends_with(suffix))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or_else(|| Err(HttpError::connect("no route")));
        Box::pin(async move { outcome })
    }
}

struct ProviderCase {
    id: ProviderId,
    hit: Vec<(&'static str, Result<HttpResponse, HttpError>)>,
    empty: Vec<(&'static str, Result<HttpResponse, HttpError>)>,
    search_suffix: &'static str,
}

fn provider_cases() -> Vec<ProviderCase> {
    vec![
        ProviderCase {
            id: ProviderId::CalorieNinjas,
            hit: vec![(
                "/v1/nutrition",
                Ok(HttpResponse::ok_json(
                    r#"{"items": [{"name": "greek yogurt", "calories": 59.123,
                        "protein_g": 10.19, "carbohydrates_total_g": 3.6, "fat_total_g": 0.39}]}"#,
                )),
            )],
            empty: vec![("/v1/nutrition", Ok(HttpResponse::ok_json(r#"{"items": []}"#)))],
            search_suffix: "/v1/nutrition",
        },
        ProviderCase {
            id: ProviderId::Usda,
            hit: vec![
                (
                    "/foods/search",
                    Ok(HttpResponse::ok_json(
                        r#"{"foods": [{"fdcId": 330137, "description": "Yogurt, Greek, plain, nonfat",
                            "dataType": "SR Legacy", "foodNutrients": [
                                {"nutrientName": "Energy", "unitName": "KCAL", "value": 59}
                            ]}]}"#,
                    )),
                ),
                (
                    "/food/330137",
                    Ok(HttpResponse::ok_json(
                        r#"{"foodNutrients": [
                            {"nutrient": {"name": "Energy", "unitName": "kcal"}, "amount": 59.0},
                            {"nutrient": {"name": "Protein", "unitName": "g"}, "amount": 10.194},
                            {"nutrient": {"name": "Carbohydrate, by difference", "unitName": "g"}, "amount": 3.6},
                            {"nutrient": {"name": "Total lipid (fat)", "unitName": "g"}, "amount": 0.39}
                        ]}"#,
                    )),
                ),
            ],
            empty: vec![("/foods/search", Ok(HttpResponse::ok_json(r#"{"foods": []}"#)))],
            search_suffix: "/foods/search",
        },
        ProviderCase {
            id: ProviderId::OpenFoodFacts,
            hit: vec![(
                "/cgi/search.pl",
                Ok(HttpResponse::ok_json(
                    r#"{"count": 1, "products": [{"product_name": "Greek Yogurt",
                        "nutriments": {"energy-kcal_100g": 59.005, "proteins_100g": 10.2,
                        "carbohydrates_100g": 3.6, "fat_100g": 0.4}}]}"#,
                )),
            )],
            empty: vec![(
                "/cgi/search.pl",
                Ok(HttpResponse::ok_json(r#"{"count": 0, "products": []}"#)),
            )],
            search_suffix: "/cgi/search.pl",
        },
    ]
}

fn adapter(id: ProviderId, http_client: Arc<dyn HttpClient>) -> Arc<dyn NutritionSource> {
    match id {
        ProviderId::CalorieNinjas => Arc::new(CalorieNinjasAdapter::new(
            http_client,
            CalorieNinjasConfig::new("contract-key").with_base_url("https://ninjas.test"),
        )),
        ProviderId::Usda => Arc::new(UsdaAdapter::new(
            http_client,
            UsdaConfig::new("contract-key").with_base_url("https://usda.test/fdc/v1"),
        )),
        ProviderId::OpenFoodFacts => Arc::new(OpenFoodFactsAdapter::new(
            http_client,
            OpenFoodFactsConfig::default().with_base_url("https://off.test"),
        )),
    }
}

fn food() -> FoodName {
    FoodName::parse("greek yogurt").expect("valid food name")
}

fn is_rounded(value: f64) -> bool {
    ((value * 100.0).round() / 100.0 - value).abs() < 1e-9
}

#[tokio::test]
async fn every_provider_reports_its_own_id() {
    for case in provider_cases() {
        let source = adapter(case.id, RouteStub::new(Vec::new()));
        assert_eq!(source.id(), case.id);
    }
}

#[tokio::test]
async fn hits_are_tagged_rounded_and_non_negative() {
    for case in provider_cases() {
        let source = adapter(case.id, RouteStub::new(case.hit));
        let record = source
            .lookup(&food())
            .await
            .unwrap_or_else(|error| panic!("provider '{}' lookup failed: {error}", case.id));

        assert_eq!(record.source, case.id, "provider '{}': source tag", case.id);
        assert!(!record.name.trim().is_empty(), "provider '{}': name", case.id);
        for value in [record.calories_per_100g, record.protein, record.carbs, record.fats] {
            assert!(value.is_finite() && value >= 0.0, "provider '{}': {value}", case.id);
            assert!(is_rounded(value), "provider '{}': {value} not rounded", case.id);
        }
        assert!(
            (record.calories_per_100g - 59.0).abs() < 0.2,
            "provider '{}': calories",
            case.id
        );
    }
}

#[tokio::test]
async fn empty_results_are_no_match() {
    for case in provider_cases() {
        let source = adapter(case.id, RouteStub::new(case.empty));
        let error = source.lookup(&food()).await.expect_err("must miss");
        assert_eq!(error.kind(), SourceErrorKind::NoMatch, "provider '{}'", case.id);
        assert_eq!(source.query(&food()).await, None, "provider '{}'", case.id);
    }
}

#[tokio::test]
async fn transport_failures_are_unavailable_and_retryable() {
    for case in provider_cases() {
        let stub = RouteStub::new(vec![(case.search_suffix, Err(HttpError::timeout("timed out")))]);
        let source = adapter(case.id, stub.clone());

        let error = source.lookup(&food()).await.expect_err("must miss");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable, "provider '{}'", case.id);
        assert!(error.retryable(), "provider '{}'", case.id);
        assert_eq!(stub.seen().len(), 1, "provider '{}': one request", case.id);
    }
}

#[tokio::test]
async fn non_success_statuses_are_unavailable() {
    for case in provider_cases() {
        let stub = RouteStub::new(vec![(
            case.search_suffix,
            Ok(HttpResponse::new(429, r#"{"error": "rate limited"}"#)),
        )]);
        let error = adapter(case.id, stub).lookup(&food()).await.expect_err("must miss");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable, "provider '{}'", case.id);
    }
}

#[tokio::test]
async fn unparseable_bodies_are_malformed() {
    for case in provider_cases() {
        let stub = RouteStub::new(vec![(
            case.search_suffix,
            Ok(HttpResponse::ok_json("<!doctype html><title>502</title>")),
        )]);
        let error = adapter(case.id, stub).lookup(&food()).await.expect_err("must miss");
        assert_eq!(error.kind(), SourceErrorKind::Malformed, "provider '{}'", case.id);
        assert!(!error.retryable(), "provider '{}'", case.id);
    }
}
