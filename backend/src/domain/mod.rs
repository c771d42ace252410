//! Review domain: aggregates, errors, ports and the service that ties them
//! together.
//!
//! Public surface:
//! - `DomainError`/`ErrorCode`: transport-agnostic failure payload.
//! - `Review` and its parts: the unit of persistence.
//! - `ReviewService`: implements the driving ports over the storage ports.
//! - `TraceId`: request correlation identifier captured by errors.

pub mod error;
pub mod ports;
pub mod review;
mod review_service;
pub mod trace_id;

pub use self::error::{DomainError, ErrorCode, ErrorValidationError};
pub use self::review::{
    Film, IdValidationError, ImageId, ImageReference, MAX_SCORE, MIN_SCORE, Rating,
    RatingOutcome, RatingScore, RatingScoreError, RatingWindow, RatingWindowClosedError, Review,
    ReviewDetails, ReviewFilter, ReviewId,
};
pub use self::review_service::ReviewService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
