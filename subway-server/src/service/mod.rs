//! Application services.
//!
//! [`SubwayService`] ties the pure domain logic to a [`Store`]: it loads the
//! segments an operation needs, runs the editor, router or fare pipeline,
//! and writes back the result.

mod line;
mod path;
mod section;
mod station;

use crate::domain::DomainError;
use crate::fare::InvalidAge;
use crate::navigator::{RouteError, Traversal};
use crate::store::{Store, StoreError};

pub use line::{CreateLine, UpdateLine};
pub use path::PathSummary;
pub use section::EditRequest;

/// Error from a service operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Age(#[from] InvalidAge),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A request field failed validation before reaching the domain
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Broad category of a [`ServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced station, line or attachment point does not exist
    NotFound,
    /// The request breaks a business rule
    Invalid,
    /// The line changed underneath the request
    Conflict,
    /// Stored data is malformed or the store is unusable
    Internal,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Domain(e) if e.is_not_found() => ErrorKind::NotFound,
            ServiceError::Domain(e) if e.is_corrupt_data() => ErrorKind::Internal,
            ServiceError::Domain(_) => ErrorKind::Invalid,
            ServiceError::Route(e) if e.is_not_found() => ErrorKind::NotFound,
            ServiceError::Route(_) => ErrorKind::Invalid,
            ServiceError::Age(_) => ErrorKind::Invalid,
            ServiceError::Store(e) if e.is_not_found() => ErrorKind::NotFound,
            ServiceError::Store(StoreError::Conflict(_)) => ErrorKind::Conflict,
            ServiceError::Store(StoreError::Poisoned) => ErrorKind::Internal,
            ServiceError::Store(_) => ErrorKind::Invalid,
            ServiceError::InvalidRequest(_) => ErrorKind::Invalid,
        }
    }
}

/// Subway operations over a store.
#[derive(Debug)]
pub struct SubwayService<S> {
    store: S,
    traversal: Traversal,
}

impl<S: Store> SubwayService<S> {
    /// Creates a service. `traversal` decides whether routes may ride a
    /// segment against its direction.
    pub fn new(store: S, traversal: Traversal) -> Self {
        Self { store, traversal }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn traversal(&self) -> Traversal {
        self.traversal
    }
}

/// Trims `value` and rejects it if nothing is left.
fn required(value: &str, field: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidRequest(format!(
            "{field} must not be blank"
        )));
    }
    Ok(trimmed.to_string())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineId, StationId};

    #[test]
    fn error_kinds() {
        let cases = [
            (
                ServiceError::from(DomainError::StationNotRegistered(StationId(1))),
                ErrorKind::NotFound,
            ),
            (
                ServiceError::from(DomainError::DisconnectedTopology),
                ErrorKind::Internal,
            ),
            (
                ServiceError::from(DomainError::SingleSegmentRemoval),
                ErrorKind::Invalid,
            ),
            (
                ServiceError::from(RouteError::StationNotFound(StationId(1))),
                ErrorKind::NotFound,
            ),
            (
                ServiceError::from(RouteError::SameStation(StationId(1))),
                ErrorKind::Invalid,
            ),
            (
                ServiceError::from(StoreError::LineNotFound(LineId(1))),
                ErrorKind::NotFound,
            ),
            (
                ServiceError::from(StoreError::Conflict(LineId(1))),
                ErrorKind::Conflict,
            ),
            (ServiceError::from(StoreError::Poisoned), ErrorKind::Internal),
            (
                ServiceError::from(StoreError::StationInUse(StationId(1))),
                ErrorKind::Invalid,
            ),
            (
                ServiceError::InvalidRequest("x".to_string()),
                ErrorKind::Invalid,
            ),
        ];
        for (error, kind) in cases {
            assert_eq!(error.kind(), kind, "{error}");
        }
    }

    #[test]
    fn required_trims() {
        assert_eq!(required("  Gangnam ", "name").unwrap(), "Gangnam");
        assert_eq!(
            required(" \t", "name"),
            Err(ServiceError::InvalidRequest(
                "name must not be blank".to_string()
            ))
        );
    }
}
