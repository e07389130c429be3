use std::sync::Arc;

use profile_directory::admin::AdminProfileList;
use profile_directory::config::{Latency, MapConfig};
use profile_directory::form::{FormField, ProfileForm};
use profile_directory::geocode::StubGeocoder;
use profile_directory::map::{displayed_profiles, MapBridge, MapCommand};
use profile_directory::storage::{Favorites, FileStorage, MemoryStorage};
use profile_directory::store::{MemoryProfileStore, ProfileStore};
use profile_directory::view::{Filter, ProfileCollection};
use profile_directory::{
    Coordinates, Profile, ProfileData, ProfileError, ProfileId,
};
use tempdir::TempDir;

fn fresh_view() -> ProfileCollection<MemoryStorage> {
    profile_directory::initialize();
    ProfileCollection::new(Favorites::new(MemoryStorage::new()))
}

#[tokio::test]
async fn search_then_favorites_filter_then_clear() {
    let store = MemoryProfileStore::seeded(Latency::none());
    let mut view = fresh_view();

    let snapshot = view.load(&store).await.unwrap();
    assert_eq!(snapshot.profiles.len(), 5);

    let snapshot = view.search("Hiking");
    assert_eq!(snapshot.profiles.len(), 4);

    let snapshot = view.toggle_filter(Filter::Favorites);
    assert!(snapshot.is_empty());

    let snapshot = view.toggle_filter(Filter::Favorites);
    assert_eq!(snapshot.profiles.len(), 4);
}

#[tokio::test]
async fn invalid_form_leaves_directory_unchanged() {
    let store = MemoryProfileStore::seeded(Latency::none());
    let geocoder = StubGeocoder::with_seed(3);
    let mut view = fresh_view();
    view.load(&store).await.unwrap();

    let mut form = ProfileForm::new();
    form.set(FormField::Name, "No Picture");
    form.set(FormField::Description, "Writer");
    form.set(FormField::Address, "Los Angeles");
    form.set(FormField::Contact, "nopic@example.com");

    let result = form.submit(&store, &geocoder).await;
    assert!(matches!(result, Err(ProfileError::Validation(_))));
    assert!(form.errors().get(FormField::Image).is_some());

    let snapshot = view.load(&store).await.unwrap();
    assert_eq!(snapshot.total, 5);
}

#[tokio::test]
async fn created_and_deleted_profiles_reach_the_view() {
    let store = Arc::new(MemoryProfileStore::seeded(Latency::none()));
    let geocoder = StubGeocoder::with_seed(3);
    let mut view = fresh_view();

    let mut form = ProfileForm::new();
    form.set(FormField::Name, "Ana Lee");
    form.set(FormField::Image, "https://example.com/ana.jpg");
    form.set(FormField::Description, "Climber");
    form.set(FormField::Address, "Los Angeles, CA");
    form.set(FormField::Contact, "ana@example.com");
    form.set(FormField::Interests, "Hiking, Climbing");
    let created = form.submit(store.as_ref(), &geocoder).await.unwrap();

    let snapshot = view.load(store.as_ref()).await.unwrap();
    assert_eq!(snapshot.total, 6);
    assert_eq!(view.search("climbing").profiles.len(), 1);

    let mut admin = AdminProfileList::default();
    admin.load(store.as_ref()).await.unwrap();
    admin.request_delete(created.id).unwrap();
    admin.confirm_delete(store.as_ref()).await.unwrap();

    let snapshot = view.load(store.as_ref()).await.unwrap();
    assert_eq!(snapshot.total, 5);
    assert!(snapshot.profiles.iter().all(|p| p.id != created.id));
}

#[tokio::test]
async fn favorites_survive_a_restart() {
    let temp_dir = TempDir::new("favorites")
        .expect("Failed to create temporary directory");
    let path = temp_dir.path().join(profile_directory::FAVORITES_FILE);
    let store = MemoryProfileStore::seeded(Latency::none());

    {
        let storage = FileStorage::new("favorites".to_string(), &path);
        let mut view = ProfileCollection::new(Favorites::new(storage));
        view.load(&store).await.unwrap();
        view.toggle_favorite(ProfileId(2)).unwrap();
        view.toggle_favorite(ProfileId(5)).unwrap();
    }

    let storage = FileStorage::new("favorites".to_string(), &path);
    let mut view = ProfileCollection::new(Favorites::new(storage));
    view.load(&store).await.unwrap();

    let snapshot = view.toggle_filter(Filter::Favorites);
    let ids: Vec<ProfileId> = snapshot.profiles.iter().map(|p| p.id).collect();
    assert_eq!(ids, [ProfileId(5), ProfileId(2)]);
    assert!(snapshot.is_favorite(ProfileId(2)));
}

#[tokio::test]
async fn map_follows_show_all_and_selection() {
    let place = |name: &str, lat: f64, lng: f64| ProfileData {
        name: name.to_string(),
        coordinates: Some(Coordinates::new(lat, lng)),
        ..Default::default()
    };
    let store = MemoryProfileStore::new(Vec::new(), Latency::none());
    let a: Profile = store.create(place("A", 10.0, 10.0)).await.unwrap();
    let b: Profile = store.create(place("B", 20.0, 20.0)).await.unwrap();

    let mut view = fresh_view();
    view.load(&store).await.unwrap();
    let mut bridge = MapBridge::new(MapConfig::default());

    let snapshot = view.set_show_all_on_map(true);
    assert_eq!(displayed_profiles(&snapshot), vec![a.clone(), b.clone()]);
    match bridge.sync(&snapshot) {
        MapCommand::FitBounds { bounds, .. } => {
            assert!(bounds.contains(Coordinates::new(10.0, 10.0)));
            assert!(bounds.contains(Coordinates::new(20.0, 20.0)));
        }
        other => panic!("unexpected command {:?}", other),
    }

    let command = bridge.marker_clicked(&mut view, a.id).unwrap();
    assert_eq!(
        command,
        MapCommand::PanTo {
            center: Coordinates::new(10.0, 10.0),
            zoom: 15,
        }
    );
    let snapshot = view.snapshot();
    assert!(!snapshot.show_all_on_map);
    assert_eq!(displayed_profiles(&snapshot), vec![a]);
    assert_eq!(bridge.camera().zoom, 15);
}
