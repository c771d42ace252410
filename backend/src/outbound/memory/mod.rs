//! Process-local storage adapters.
//!
//! Reviews are kept as JSON documents and images as byte blobs, each behind a
//! `std::sync::RwLock`. Locks are never held across an `.await`. Contents are
//! lost when the process exits.

mod image_repository;
mod review_repository;

pub use image_repository::InMemoryImageRepository;
pub use review_repository::InMemoryReviewRepository;
