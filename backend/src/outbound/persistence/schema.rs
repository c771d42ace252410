//! Diesel table definitions. Must match `migrations/` exactly.

diesel::table! {
    /// One row per review. Film metadata and ratings are JSON documents.
    reviews (id) {
        /// Storage-assigned identifier.
        id -> Text,
        /// Serialised `Film`, image reference included.
        film -> Jsonb,
        /// Contributor who submitted the review.
        contributed_by -> Text,
        /// Discussion date; drives listing order.
        discussed_at -> Nullable<Timestamptz>,
        /// Whether ratings are accepted.
        rating_open -> Bool,
        /// Serialised `Vec<Rating>` in submission order.
        ratings -> Jsonb,
    }
}

diesel::table! {
    /// Cover image blobs.
    images (id) {
        /// Storage-assigned identifier.
        id -> Text,
        /// Raw image bytes.
        bytes -> Bytea,
    }
}
