//! # Nutrifetch Core
//!
//! Food-resolution engine: turns a free-text food name into one canonical
//! nutrition record per 100 g by querying external nutrition providers in a
//! fixed priority order.
//!
//! ## Overview
//!
//! - **Canonical record** ([`NutritionRecord`]) with rounded, non-negative values
//! - **Provider identifiers** ([`ProviderId`]) in priority order
//! - **Fuzzy matching** helpers shared by the adapters
//! - **Provider adapters** behind the [`NutritionSource`] trait
//! - **Resolution chain** ([`FoodResolver`]) with first-hit short-circuit
//! - **Shared HTTP transport** with an immutable [`RetryPolicy`]
//! - **Response envelope** for machine-readable output
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | CalorieNinjas, USDA FoodData Central, Open Food Facts |
//! | [`data_source`] | Adapter trait and source errors |
//! | [`domain`] | `FoodName` and `NutritionRecord` |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`matching`] | Normalization, similarity and best-candidate selection |
//! | [`nutrients`] | Nutrient lookup with unit conversion |
//! | [`retry`] | Retry policy and retrying transport |
//! | [`routing`] | Resolver chain and builder |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nutrifetch_core::ResolverBuilder;
//!
//! #[tokio::main]
//! async fn main() {
//!     let resolver = ResolverBuilder::new().with_env_credentials().build();
//!
//!     match resolver.resolve("chicken breast").await {
//!         Some(record) => println!("{}: {} kcal/100g", record.name, record.calories_per_100g),
//!         None => println!("not found"),
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / Caller   │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  FoodResolver   │  CalorieNinjas → USDA → Open Food Facts
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ NutritionSource │────▶│ RetryingHttp     │
//! │ (Adapter Trait) │     │ Client (reqwest) │
//! └─────────────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ NutritionRecord │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Adapters classify every miss; the resolver records it and moves on:
//!
//! ```rust
//! use nutrifetch_core::{SourceError, SourceErrorKind};
//!
//! fn describe(error: &SourceError) -> &'static str {
//!     match error.kind() {
//!         SourceErrorKind::Unavailable => "provider unreachable",
//!         SourceErrorKind::Malformed => "unusable payload",
//!         SourceErrorKind::NoMatch => "no qualifying candidate",
//!         _ => "not attempted",
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - API keys come from configuration or environment variables and are never logged
//! - Credentials are attached inside the transport only and redacted from `Debug`
//! - Transport error messages are stripped of request URLs

pub mod adapters;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod matching;
pub mod nutrients;
pub mod retry;
pub mod routing;
pub mod source;

// Adapter implementations
pub use adapters::{
    CalorieNinjasAdapter, CalorieNinjasConfig, OpenFoodFactsAdapter, OpenFoodFactsConfig,
    UsdaAdapter, UsdaConfig,
};

// Data source trait and types
pub use data_source::{LookupFuture, NutritionSource, SourceError, SourceErrorKind};

// Domain models
pub use domain::{round2, FoodName, NutritionRecord};

// Envelope types
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};

// Error types
pub use error::ValidationError;

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpErrorKind, HttpMethod, HttpRequest, HttpResponse,
    ReqwestHttpClient,
};

// Matching helpers
pub use matching::{normalize, similarity, title_case, BestCandidate};

// Nutrient extraction
pub use nutrients::{extract_nutrient, NutrientEntry, KCAL_PER_KJ};

// Retry logic
pub use retry::{Backoff, RetryPolicy, RetryingHttpClient};

// Routing types
pub use routing::{
    FoodResolver, ResolveFailure, ResolveResult, ResolveStrategy, ResolveSuccess, ResolverBuilder,
    SourceSnapshot,
};

// Source identifiers
pub use source::ProviderId;
