pub mod admin;
pub mod config;
pub mod data;
pub mod details;
mod errors;
pub mod form;
pub mod geocode;
pub mod id;
pub mod map;
pub mod profile;
pub mod storage;
pub mod store;
pub mod view;

pub use errors::{ProfileError, Result};
pub use id::ProfileId;
pub use profile::{Coordinates, Profile, ProfileData};

pub const STORAGE_FOLDER: &str = ".profile-directory";
pub const FAVORITES_FILE: &str = "favorites.json";

/// Key under which the favorite profile ids are kept,
/// as a JSON list of integers.
pub const FAVORITES_KEY: &str = "favoriteProfiles";

// Map defaults
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: 40.7128,
    lng: -74.006,
};
pub const DEFAULT_ZOOM: u8 = 10;
pub const FOCUSED_ZOOM: u8 = 15;
pub const MAX_FIT_ZOOM: u8 = 15;

/// Install the `env_logger` backend. Safe to call more than once.
pub fn initialize() {
    let _ = env_logger::builder().is_test(cfg!(test)).try_init();
}
