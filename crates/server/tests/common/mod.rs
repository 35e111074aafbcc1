//! Common test utilities for HTTP-level testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! with mock providers and collaborators injected, so the addon surface
//! can be tested without reaching any real source.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use stremizio_core::searcher::Provider;
use stremizio_core::testing::{MockDebrid, MockProvider, MockResolver};
use stremizio_core::{Aggregator, Config, StreamService};

/// Re-export fixtures for test convenience
pub use stremizio_core::testing::fixtures;

/// Test fixture wrapping a router built around mocks.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_streams() {
///     let fixture = TestFixture::new(vec![MockProvider::empty("Knaben")]);
///     let response = fixture.get("/stream/movie/tt1160419.json").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock providers, in dispatch order
    pub providers: Vec<Arc<MockProvider>>,
    /// Mock metadata resolver
    pub resolver: Arc<MockResolver>,
    /// Mock debrid resolver, if enabled
    pub debrid: Option<Arc<MockDebrid>>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Router with the given providers and a resolver that knows nothing.
    pub fn new(providers: Vec<MockProvider>) -> Self {
        Self::build(providers, MockResolver::new(), None)
    }

    /// Router with a custom metadata resolver.
    pub fn with_resolver(providers: Vec<MockProvider>, resolver: MockResolver) -> Self {
        Self::build(providers, resolver, None)
    }

    /// Router with debrid resolution enabled.
    pub fn with_debrid(providers: Vec<MockProvider>, debrid: MockDebrid) -> Self {
        Self::build(providers, MockResolver::new(), Some(debrid))
    }

    fn build(
        providers: Vec<MockProvider>,
        resolver: MockResolver,
        debrid: Option<MockDebrid>,
    ) -> Self {
        let config = Config::default();

        let providers: Vec<Arc<MockProvider>> = providers.into_iter().map(Arc::new).collect();
        let dyn_providers: Vec<Arc<dyn Provider>> = providers
            .iter()
            .map(|p| Arc::clone(p) as Arc<dyn Provider>)
            .collect();

        let aggregator = Aggregator::new(
            dyn_providers,
            config.scoring.clone(),
            config.addon.binge_namespace.clone(),
        );

        let resolver = Arc::new(resolver);
        let mut service = StreamService::new(Arc::new(aggregator), resolver.clone());

        let debrid = debrid.map(Arc::new);
        if let Some(d) = &debrid {
            service = service.with_debrid(d.clone(), config.debrid.max_resolved);
        }

        let state = Arc::new(stremizio_server::state::AppState::new(config, service));
        let router = stremizio_server::api::create_router(state);

        Self {
            router,
            providers,
            resolver,
            debrid,
        }
    }

    /// Send a GET request to the test router.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
