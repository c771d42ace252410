//! Shared cache-control policies for HTTP handlers.

/// Review listings change whenever someone rates; clients must revalidate.
pub const NO_CACHE: &str = "no-cache";

/// Header tuple for responses that must be revalidated before reuse.
#[must_use]
pub const fn no_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", NO_CACHE)
}

/// Header tuple for stored images, which never change once written.
///
/// # Examples
/// ```
/// use filmkritiken::inbound::http::cache_control::immutable_header;
///
/// assert_eq!(
///     immutable_header(60),
///     ("Cache-Control", "public, max-age=60, immutable".to_owned())
/// );
/// ```
#[must_use]
pub fn immutable_header(max_age_secs: u64) -> (&'static str, String) {
    (
        "Cache-Control",
        format!("public, max-age={max_age_secs}, immutable"),
    )
}
