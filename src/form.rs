use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;
use url::Url;

use crate::geocode::Geocoder;
use crate::store::ProfileStore;
use crate::{Profile, ProfileData, ProfileError, ProfileId, Result};

pub const SUBMIT_ERROR_MESSAGE: &str =
    "Failed to save profile. Please try again.";

const INVALID_IMAGE_URL: &str =
    "Must be a valid URL starting with http:// or https://";
const CONTACT_REQUIRED: &str = "Contact information is required";
const INVALID_EMAIL: &str = "Please enter a valid email address";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    Image,
    Description,
    Address,
    Contact,
    Interests,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::Name => "name",
            FormField::Image => "image",
            FormField::Description => "description",
            FormField::Address => "address",
            FormField::Contact => "contact",
            FormField::Interests => "interests",
        };
        f.write_str(name)
    }
}

/// Field-level validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<FormField, String>);

impl ValidationErrors {
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }

    fn insert(&mut self, field: FormField, message: &str) {
        self.0.insert(field, message.to_owned());
    }

    fn clear(&mut self, field: FormField) {
        self.0.remove(&field);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .join("; ");
        f.write_str(&joined)
    }
}

/// Admin form for creating or editing one profile.
///
/// Interests are edited as comma separated text.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub image: String,
    pub description: String,
    pub address: String,
    pub contact: String,
    pub interests: String,
    editing: Option<ProfileId>,
    errors: ValidationErrors,
    submit_error: Option<String>,
}

impl ProfileForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled from an existing profile; submitting updates it.
    pub fn edit(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            image: profile.image.clone(),
            description: profile.description.clone(),
            address: profile.address.clone(),
            contact: profile.contact.clone(),
            interests: profile.interests.iter().join(", "),
            editing: Some(profile.id),
            ..Default::default()
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Change a field; its pending error message goes away.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Image => self.image = value,
            FormField::Description => self.description = value,
            FormField::Address => self.address = value,
            FormField::Contact => self.contact = value,
            FormField::Interests => self.interests = value,
        }
        self.errors.clear(field);
    }

    /// Check every field and collect all messages.
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.name.trim().is_empty() {
            errors.insert(FormField::Name, "Name is required");
        }
        if self.description.trim().is_empty() {
            errors.insert(FormField::Description, "Description is required");
        }
        if self.address.trim().is_empty() {
            errors.insert(FormField::Address, "Address is required");
        }

        if self.image.trim().is_empty() {
            errors.insert(FormField::Image, "Image URL is required");
        } else if !is_web_url(self.image.trim()) {
            errors.insert(FormField::Image, INVALID_IMAGE_URL);
        }

        if self.contact.trim().is_empty() {
            errors.insert(FormField::Contact, CONTACT_REQUIRED);
        } else if !self.contact.contains('@') {
            errors.insert(FormField::Contact, INVALID_EMAIL);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn interest_list(&self) -> Vec<String> {
        self.interests
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Validate, geocode the address and save through `store`.
    ///
    /// Invalid input never reaches the store.
    pub async fn submit<St, G>(
        &mut self,
        store: &St,
        geocoder: &G,
    ) -> Result<Profile>
    where
        St: ProfileStore + ?Sized,
        G: Geocoder + ?Sized,
    {
        self.submit_error = None;
        if let Err(errors) = self.validate() {
            log::debug!("form rejected: {}", errors);
            self.errors = errors.clone();
            return Err(ProfileError::Validation(errors));
        }
        self.errors = ValidationErrors::default();

        let coordinates = geocoder.geocode(&self.address).await;
        let data = ProfileData {
            name: self.name.trim().to_owned(),
            image: self.image.trim().to_owned(),
            description: self.description.trim().to_owned(),
            address: self.address.trim().to_owned(),
            contact: self.contact.trim().to_owned(),
            rating: None,
            interests: self.interest_list(),
            coordinates: Some(coordinates),
        };

        let saved = match self.editing {
            Some(id) => store.update(id, data).await,
            None => store.create(data).await,
        };
        saved.map_err(|e| {
            log::error!("saving profile failed: {}", e);
            self.submit_error = Some(SUBMIT_ERROR_MESSAGE.to_owned());
            e
        })
    }
}

fn is_web_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Latency;
    use crate::geocode::StubGeocoder;
    use crate::store::MemoryProfileStore;
    use rstest::rstest;

    fn filled() -> ProfileForm {
        let mut form = ProfileForm::new();
        form.set(FormField::Name, "Jane Roe");
        form.set(FormField::Image, "https://example.com/jane.jpg");
        form.set(FormField::Description, "Designer");
        form.set(FormField::Address, "5 Lake St, Chicago");
        form.set(FormField::Contact, "jane@example.com");
        form.set(FormField::Interests, " Hiking, ,Chess ,");
        form
    }

    #[rstest]
    #[case("", Some("Image URL is required"))]
    #[case("   ", Some("Image URL is required"))]
    #[case("ftp://example.com/a.jpg", Some(INVALID_IMAGE_URL))]
    #[case("example.com/a.jpg", Some(INVALID_IMAGE_URL))]
    #[case("http://example.com/a.jpg", None)]
    fn image_rules(#[case] image: &str, #[case] expected: Option<&str>) {
        let mut form = filled();
        form.set(FormField::Image, image);
        let errors = form.validate().err().unwrap_or_default();
        assert_eq!(errors.get(FormField::Image), expected);
    }

    #[test]
    fn collects_every_message() {
        let errors = ProfileForm::new().validate().unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get(FormField::Name), Some("Name is required"));
        assert_eq!(
            errors.get(FormField::Contact),
            Some("Contact information is required")
        );
        assert_eq!(errors.get(FormField::Interests), None);
    }

    #[test]
    fn contact_needs_at_sign() {
        let mut form = filled();
        form.set(FormField::Contact, "jane.example.com");
        assert_eq!(
            form.validate().unwrap_err().get(FormField::Contact),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn interests_are_split_and_trimmed() {
        assert_eq!(filled().interest_list(), ["Hiking", "Chess"]);
    }

    #[test]
    fn edit_prefills_from_profile() {
        let mut profile = crate::profile::tests::profile(3, "World");
        profile.interests = vec!["Programming".to_owned(), "Hiking".to_owned()];

        let form = ProfileForm::edit(&profile);
        assert!(form.is_editing());
        assert_eq!(form.interests, "Programming, Hiking");
        assert!(form.validate().is_ok());
    }

    #[tokio::test]
    async fn invalid_form_does_not_touch_store() {
        let store = MemoryProfileStore::seeded(Latency::none());
        let geocoder = StubGeocoder::with_seed(1);
        let mut form = filled();
        form.set(FormField::Image, "");

        let result = form.submit(&store, &geocoder).await;
        assert!(matches!(result, Err(ProfileError::Validation(_))));
        assert_eq!(
            form.errors().get(FormField::Image),
            Some("Image URL is required")
        );
        assert_eq!(store.len().await, 5);

        form.set(FormField::Image, "https://example.com/x.jpg");
        assert!(form.errors().is_empty());
    }

    #[tokio::test]
    async fn submit_creates_geocoded_profile() {
        let store = MemoryProfileStore::seeded(Latency::none());
        let geocoder = StubGeocoder::with_seed(1);
        let mut form = filled();

        let profile = form.submit(&store, &geocoder).await.unwrap();
        assert_eq!(profile.id, ProfileId(6));
        assert_eq!(profile.interests, ["Hiking", "Chess"]);
        let coordinates = profile.coordinates.unwrap();
        assert!((coordinates.lat - 41.8781).abs() < 0.01);
        assert_eq!(store.len().await, 6);
    }

    #[tokio::test]
    async fn submit_in_edit_mode_updates() {
        let store = MemoryProfileStore::seeded(Latency::none());
        let geocoder = StubGeocoder::with_seed(1);
        let original = store.get(ProfileId(1)).await.unwrap();

        let mut form = ProfileForm::edit(&original);
        form.set(FormField::Name, "John Q. Doe");
        let updated = form.submit(&store, &geocoder).await.unwrap();

        assert_eq!(updated.id, ProfileId(1));
        assert_eq!(updated.name, "John Q. Doe");
        assert_eq!(updated.rating, original.rating);
        assert_eq!(store.len().await, 5);
    }

    #[tokio::test]
    async fn store_failure_is_reported_on_the_form() {
        let store = MemoryProfileStore::seeded(Latency::none());
        let geocoder = StubGeocoder::with_seed(1);
        let ghost = crate::profile::tests::profile(77, "Ghost");

        let mut form = ProfileForm::edit(&ghost);
        let result = form.submit(&store, &geocoder).await;
        assert!(matches!(result, Err(ProfileError::NotFound(_))));
        assert_eq!(form.submit_error(), Some(SUBMIT_ERROR_MESSAGE));
    }
}
