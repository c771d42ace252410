//! Film metadata attached to a review.

use serde::{Deserialize, Serialize};

use super::ImageId;

/// Reference to the cover image plus its attribution.
///
/// `id` is `None` until an image has been stored; the review service fills it
/// in when a review is created together with image bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReference {
    /// Stored image identifier.
    #[serde(default)]
    pub id: Option<ImageId>,
    /// Where the image was obtained.
    #[serde(default)]
    pub source: String,
    /// Copyright holder or licence note.
    #[serde(default)]
    pub copyright: String,
}

/// Descriptive data about the film under review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    /// Title shown to the group.
    pub title: String,
    /// Title in the original language.
    #[serde(default)]
    pub original_title: String,
    /// Year of release.
    #[serde(default)]
    pub release_year: u16,
    /// Minimum recommended age.
    #[serde(default)]
    pub age_rating: u8,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime_minutes: u16,
    /// Original language.
    #[serde(default)]
    pub language: String,
    /// Production country.
    #[serde(default)]
    pub country: String,
    /// Director credit.
    #[serde(default)]
    pub director: String,
    /// Cover image reference.
    #[serde(default)]
    pub image: ImageReference,
}

impl Film {
    /// Start a film description with only its title set.
    ///
    /// # Examples
    /// ```
    /// use filmkritiken::domain::Film;
    ///
    /// let film = Film::titled("Alien");
    /// assert_eq!(film.title, "Alien");
    /// assert!(film.image.id.is_none());
    /// ```
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}
