use serde::{Deserialize, Serialize};

use crate::id::ProfileId;

pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Only finite pairs can be placed on the map.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub image: String,
    pub description: String,
    pub address: String,
    pub contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// Field set submitted to the store on create and update.
///
/// `rating` and `coordinates` left as `None` keep the stored
/// value on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    pub name: String,
    pub image: String,
    pub description: String,
    pub address: String,
    pub contact: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl Profile {
    pub fn from_data(id: ProfileId, data: ProfileData) -> Self {
        Self {
            id,
            name: data.name,
            image: data.image,
            description: data.description,
            address: data.address,
            contact: data.contact,
            rating: data.rating.map(clamp_rating),
            interests: data.interests,
            coordinates: data.coordinates,
        }
    }

    pub fn merge(&mut self, data: ProfileData) {
        self.name = data.name;
        self.image = data.image;
        self.description = data.description;
        self.address = data.address;
        self.contact = data.contact;
        self.interests = data.interests;
        if let Some(rating) = data.rating {
            self.rating = Some(clamp_rating(rating));
        }
        if let Some(coordinates) = data.coordinates {
            self.coordinates = Some(coordinates);
        }
    }

    /// Missing ratings sort as zero.
    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    /// Coordinates usable for map placement, if any.
    pub fn location(&self) -> Option<Coordinates> {
        self.coordinates.filter(Coordinates::is_valid)
    }

    /// Case-insensitive match of an already lowercased term against
    /// name, address, description and interests.
    pub fn matches(&self, lowercase_term: &str) -> bool {
        self.name.to_lowercase().contains(lowercase_term)
            || self.address.to_lowercase().contains(lowercase_term)
            || self
                .description
                .to_lowercase()
                .contains(lowercase_term)
            || self
                .interests
                .iter()
                .any(|interest| {
                    interest.to_lowercase().contains(lowercase_term)
                })
    }
}

fn clamp_rating(rating: f64) -> f64 {
    if rating.is_nan() {
        return 0.0;
    }
    rating.clamp(0.0, MAX_RATING)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn profile(id: u64, name: &str) -> Profile {
        Profile::from_data(
            ProfileId(id),
            ProfileData {
                name: name.to_owned(),
                image: format!("https://example.com/{}.jpg", id),
                description: "Software Developer".to_owned(),
                address: "Pune, Maharashtra".to_owned(),
                contact: "someone@example.com".to_owned(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn matches_interests_case_insensitively() {
        let mut p = profile(1, "John Doe");
        p.interests = vec!["Hiking".to_owned(), "Chess".to_owned()];
        assert!(p.matches("hik"));
        assert!(p.matches("john"));
        assert!(p.matches("pune"));
        assert!(p.matches("developer"));
        assert!(!p.matches("swimming"));
    }

    #[test]
    fn merge_keeps_rating_and_coordinates_when_omitted() {
        let mut p = profile(1, "John Doe");
        p.rating = Some(4.5);
        p.coordinates = Some(Coordinates::new(18.1, 74.0));

        p.merge(ProfileData {
            name: "Jane Doe".to_owned(),
            ..Default::default()
        });

        assert_eq!(p.name, "Jane Doe");
        assert_eq!(p.rating, Some(4.5));
        assert_eq!(p.coordinates, Some(Coordinates::new(18.1, 74.0)));
    }

    #[test]
    fn rating_is_clamped() {
        let mut p = profile(1, "John Doe");
        p.merge(ProfileData {
            rating: Some(9.0),
            ..Default::default()
        });
        assert_eq!(p.rating, Some(MAX_RATING));
        assert_eq!(profile(2, "x").rating_or_zero(), 0.0);
    }

    #[test]
    fn invalid_coordinates_are_not_placeable() {
        let mut p = profile(1, "John Doe");
        p.coordinates = Some(Coordinates::new(f64::NAN, 10.0));
        assert_eq!(p.location(), None);
    }
}
