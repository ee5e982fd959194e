//! Provider adapters, one per external nutrition source.
//!
//! | Adapter | Provider | Matching |
//! |---------|----------|----------|
//! | [`CalorieNinjasAdapter`] | CalorieNinjas | best name similarity |
//! | [`UsdaAdapter`] | USDA FoodData Central | similarity + data-tier bonus, calorie floor, detail fetch |
//! | [`OpenFoodFactsAdapter`] | Open Food Facts | provider's first product |

mod calorieninjas;
mod openfoodfacts;
mod usda;

pub use calorieninjas::{CalorieNinjasAdapter, CalorieNinjasConfig};
pub use openfoodfacts::{OpenFoodFactsAdapter, OpenFoodFactsConfig};
pub use usda::{UsdaAdapter, UsdaConfig};

use serde::de::DeserializeOwned;

use crate::data_source::SourceError;
use crate::http_client::{HttpClient, HttpRequest};
use crate::{ProviderId, ValidationError};

/// Executes `request` and decodes a JSON body.
///
/// Transport errors and non-2xx statuses become `Unavailable`; undecodable
/// bodies become `Malformed`.
pub(crate) async fn fetch_json<T>(
    http_client: &dyn HttpClient,
    provider: ProviderId,
    request: HttpRequest,
) -> Result<T, SourceError>
where
    T: DeserializeOwned,
{
    let response = http_client.execute(request).await.map_err(|error| {
        tracing::warn!(%provider, %error, "transport error");
        SourceError::unavailable(format!("{provider} transport error: {}", error.message()))
    })?;

    if !response.is_success() {
        tracing::warn!(%provider, status = response.status, "upstream returned non-success status");
        return Err(SourceError::unavailable(format!(
            "{provider} returned status {}",
            response.status
        )));
    }

    serde_json::from_str(&response.body).map_err(|error| {
        SourceError::malformed(format!("failed to parse {provider} response: {error}"))
    })
}

pub(crate) fn invalid_record(provider: ProviderId, error: ValidationError) -> SourceError {
    SourceError::malformed(format!("{provider} record rejected: {error}"))
}

pub(crate) fn trim_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_owned()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    use crate::http_client::{HttpClient, HttpError, HttpRequest, HttpResponse};

    /// Replays scripted outcomes in order and records every request.
    #[derive(Debug)]
    pub(crate) struct RecordingHttpClient {
        outcomes: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        pub(crate) fn scripted(outcomes: Vec<Result<HttpResponse, HttpError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn json(bodies: &[&str]) -> Self {
            Self::scripted(
                bodies
                    .iter()
                    .map(|body| Ok(HttpResponse::ok_json(*body)))
                    .collect(),
            )
        }

        pub(crate) fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let outcome = self
                .outcomes
                .lock()
                .expect("outcome queue should not be poisoned")
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::connect("no scripted response left")));
            Box::pin(async move { outcome })
        }
    }

    pub(crate) fn block_on<F>(future: F) -> F::Output
    where
        F: Future,
    {
        let waker = noop_waker();
        let mut context = Context::from_waker(&waker);
        let mut future = std::pin::pin!(future);

        loop {
            match future.as_mut().poll(&mut context) {
                Poll::Ready(output) => return output,
                Poll::Pending => std::thread::yield_now(),
            }
        }
    }

    fn noop_waker() -> Waker {
        // SAFETY: The vtable functions never dereference the data pointer and are no-op operations.
        unsafe { Waker::from_raw(noop_raw_waker()) }
    }

    fn noop_raw_waker() -> RawWaker {
        RawWaker::new(std::ptr::null(), &NOOP_RAW_WAKER_VTABLE)
    }

    unsafe fn noop_raw_waker_clone(_: *const ()) -> RawWaker {
        noop_raw_waker()
    }

    unsafe fn noop_raw_waker_wake(_: *const ()) {}

    unsafe fn noop_raw_waker_wake_by_ref(_: *const ()) {}

    unsafe fn noop_raw_waker_drop(_: *const ()) {}

    static NOOP_RAW_WAKER_VTABLE: RawWakerVTable = RawWakerVTable::new(
        noop_raw_waker_clone,
        noop_raw_waker_wake,
        noop_raw_waker_wake_by_ref,
        noop_raw_waker_drop,
    );
}
