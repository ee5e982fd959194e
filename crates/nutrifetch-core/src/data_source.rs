//! Nutrition source trait and its error type.
//!
//! This module defines the adapter contract ([`NutritionSource`]) that every
//! provider implementation follows.
//!
//! Adapters report *why* they produced nothing through [`SourceError`] from
//! [`NutritionSource::lookup`]. Callers that only care about the outcome use
//! [`NutritionSource::query`], which folds every error into `None`.
//!
//! # Example
//!
//! ```rust,ignore
//! use nutrifetch_core::{FoodName, NutritionSource, UsdaAdapter};
//!
//! async fn print_calories(adapter: &UsdaAdapter) {
//!     let name = FoodName::parse("brown rice").expect("non-empty");
//!     if let Some(record) = adapter.query(&name).await {
//!         println!("{}: {} kcal/100g", record.name, record.calories_per_100g);
//!     }
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{FoodName, NutritionRecord, ProviderId};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure or non-success status after retries.
    Unavailable,
    /// Response body could not be parsed or violates record invariants.
    Malformed,
    /// The provider answered but no candidate qualified.
    NoMatch,
    /// The provider is not registered with the resolver.
    NotConfigured,
}

/// Structured source error used by resolver fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Malformed,
            message: message.into(),
        }
    }

    pub fn no_match(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NoMatch,
            message: message.into(),
        }
    }

    pub fn not_configured(provider: ProviderId) -> Self {
        Self {
            kind: SourceErrorKind::NotConfigured,
            message: format!("source '{provider}' is not configured"),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the same query might succeed later.
    pub const fn retryable(&self) -> bool {
        matches!(self.kind, SourceErrorKind::Unavailable)
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::Malformed => "source.malformed_response",
            SourceErrorKind::NoMatch => "source.no_match",
            SourceErrorKind::NotConfigured => "source.not_configured",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Boxed future returned by [`NutritionSource::lookup`].
pub type LookupFuture<'a> =
    Pin<Box<dyn Future<Output = Result<NutritionRecord, SourceError>> + Send + 'a>>;

/// Source adapter contract.
///
/// Implementations must be `Send + Sync`; a resolver shares them behind `Arc`.
pub trait NutritionSource: Send + Sync {
    /// Returns the unique provider identifier.
    fn id(&self) -> ProviderId;

    /// Resolves `name` to this provider's best canonical record.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the provider is unreachable, answers with
    /// an unusable payload, or has no qualifying candidate.
    fn lookup<'a>(&'a self, name: &'a FoodName) -> LookupFuture<'a>;

    /// Same as [`lookup`](NutritionSource::lookup) with every failure reduced
    /// to `None`.
    fn query<'a>(
        &'a self,
        name: &'a FoodName,
    ) -> Pin<Box<dyn Future<Output = Option<NutritionRecord>> + Send + 'a>> {
        Box::pin(async move {
            match self.lookup(name).await {
                Ok(record) => Some(record),
                Err(error) => {
                    tracing::debug!(provider = %self.id(), %error, "source returned no record");
                    None
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(Result<NutritionRecord, SourceError>);

    impl NutritionSource for FixedSource {
        fn id(&self) -> ProviderId {
            ProviderId::OpenFoodFacts
        }

        fn lookup<'a>(&'a self, name: &'a FoodName) -> LookupFuture<'a> {
            let _ = name;
            let outcome = self.0.clone();
            Box::pin(async move { outcome })
        }
    }

    #[tokio::test]
    async fn query_folds_errors_into_none() {
        let name = FoodName::parse("kale").expect("valid name");
        let source = FixedSource(Err(SourceError::unavailable("connection refused")));

        assert_eq!(source.query(&name).await, None);
    }

    #[tokio::test]
    async fn query_passes_records_through() {
        let name = FoodName::parse("kale").expect("valid name");
        let record = NutritionRecord::new(ProviderId::OpenFoodFacts, "Kale", 49.0, 4.3, 8.8, 0.9)
            .expect("valid record");
        let source = FixedSource(Ok(record.clone()));

        assert_eq!(source.query(&name).await, Some(record));
    }

    #[test]
    fn only_unavailable_errors_are_retryable() {
        assert!(SourceError::unavailable("down").retryable());
        assert!(!SourceError::no_match("nothing").retryable());
        assert!(!SourceError::malformed("bad json").retryable());
        assert_eq!(
            SourceError::not_configured(ProviderId::CalorieNinjas).code(),
            "source.not_configured"
        );
    }
}
