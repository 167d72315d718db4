//! Endpoint resolution with ordered fallback.
//!
//! A [`Resolver`] turns a [`RequestDescriptor`] into a JSON document by
//! walking the kind's candidate chain strictly in order. The first usable
//! response wins; every failure before it is recorded so that an exhausted
//! chain can explain itself.

mod catalog;
pub mod normalize;
mod request;

pub use catalog::{EndpointCandidate, EndpointCatalog, ResponseShape, Transport};
pub use request::{RequestDescriptor, RequestKind};

use crate::error::{FetchError, Result, SeptaError};
use crate::events::{FetchEvent, FetchObserver};
use crate::fetch::Fetcher;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

/// Why a single candidate was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateError {
    #[error(transparent)]
    Fetch(FetchError),

    /// An aggregate response that could not be narrowed to the route.
    #[error("Unusable aggregate response: {0}")]
    UnusableAggregate(String),
}

/// A recorded candidate failure, in attempt order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateFailure {
    /// 1-based position in the chain.
    pub attempt: usize,
    pub label: &'static str,
    pub url: String,
    pub error: CandidateError,
}

impl std::fmt::Display for CandidateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.attempt, self.label, self.url, self.error
        )
    }
}

/// Stateless resolver shared by all requests.
pub struct Resolver {
    fetcher: Arc<dyn Fetcher>,
    catalog: EndpointCatalog,
    observer: Arc<dyn FetchObserver>,
}

impl Resolver {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        catalog: EndpointCatalog,
        observer: Arc<dyn FetchObserver>,
    ) -> Self {
        Self {
            fetcher,
            catalog,
            observer,
        }
    }

    pub fn catalog(&self) -> &EndpointCatalog {
        &self.catalog
    }

    /// Resolve a request to the first usable upstream document.
    ///
    /// Fails with [`SeptaError::Validation`] before any network call when a
    /// required route is missing, and with [`SeptaError::AllEndpointsFailed`]
    /// when no candidate produced a usable document.
    #[instrument(skip(self), fields(kind = %request.kind()))]
    pub async fn resolve(&self, request: &RequestDescriptor) -> Result<Value> {
        let route = request.validated_route()?;
        let kind = request.kind();
        let candidates = self.catalog.candidates(kind);
        let mut failures = Vec::with_capacity(candidates.len());

        for (index, candidate) in candidates.iter().enumerate() {
            let attempt = index + 1;
            let url = self.catalog.url_for(candidate, route);

            self.observer.observe(&FetchEvent::CandidateStarted {
                kind,
                attempt,
                label: candidate.label,
                url: url.clone(),
            });

            let outcome = match self.fetcher.fetch(&url).await {
                Ok(document) => accept(candidate, document, route),
                Err(e) => Err(CandidateError::Fetch(e)),
            };

            match outcome {
                Ok(document) => {
                    self.observer.observe(&FetchEvent::CandidateSucceeded {
                        kind,
                        attempt,
                        label: candidate.label,
                        normalized: candidate.shape == ResponseShape::Aggregate,
                    });
                    return Ok(document);
                }
                Err(error) => {
                    self.observer.observe(&FetchEvent::CandidateFailed {
                        kind,
                        attempt,
                        label: candidate.label,
                        error: error.clone(),
                    });
                    failures.push(CandidateFailure {
                        attempt,
                        label: candidate.label,
                        url,
                        error,
                    });
                }
            }
        }

        self.observer.observe(&FetchEvent::ChainExhausted {
            kind,
            attempts: failures.len(),
        });

        Err(SeptaError::AllEndpointsFailed { kind, failures })
    }
}

/// Apply the candidate's response-shape rules to a fetched document.
fn accept(
    candidate: &EndpointCandidate,
    document: Value,
    route: Option<&str>,
) -> std::result::Result<Value, CandidateError> {
    match (candidate.shape, route) {
        (ResponseShape::Aggregate, Some(route)) => {
            normalize::filter_aggregate(document, route).map_err(CandidateError::UnusableAggregate)
        }
        _ => Ok(document),
    }
}
