//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters.
//! Driving ports (`ReviewCommand`, `ReviewQuery`) are implemented by the
//! domain service and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod image_repository;
mod review_command;
mod review_query;
mod review_repository;

#[cfg(test)]
pub use image_repository::MockImageRepository;
pub use image_repository::{ImageRepository, ImageRepositoryError};
#[cfg(test)]
pub use review_command::MockReviewCommand;
pub use review_command::{CreateReviewRequest, ReviewCommand, SubmitRatingRequest};
#[cfg(test)]
pub use review_query::MockReviewQuery;
pub use review_query::ReviewQuery;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError};
