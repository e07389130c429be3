use std::sync::Mutex;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::profile::Coordinates;

/// Half-width of the random offset added around a city center, in degrees.
const JITTER: f64 = 0.005;
const FALLBACK_CITY: &str = "New York";

static CITY_CENTERS: Lazy<Vec<(&'static str, Coordinates)>> = Lazy::new(|| {
    vec![
        ("New York", Coordinates::new(40.7128, -74.0060)),
        ("Los Angeles", Coordinates::new(34.0522, -118.2437)),
        ("Chicago", Coordinates::new(41.8781, -87.6298)),
    ]
});

/// Turns a free-form address into approximate coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Coordinates;
}

/// Offline stand-in for a geocoding service.
///
/// Recognizes a handful of city names (leftmost match wins, New York
/// otherwise) and scatters results slightly around the city center so
/// that different addresses get different markers.
pub struct StubGeocoder {
    rng: Mutex<fastrand::Rng>,
}

impl StubGeocoder {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }

    /// Center of the city recognized in `address`.
    pub fn base_coordinates(address: &str) -> Coordinates {
        CITY_CENTERS
            .iter()
            .filter_map(|(city, center)| {
                address.find(city).map(|position| (position, *center))
            })
            .min_by_key(|(position, _)| *position)
            .map(|(_, center)| center)
            .unwrap_or_else(fallback_center)
    }

    fn jitter(&self) -> (f64, f64) {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        (
            (rng.f64() - 0.5) * 2.0 * JITTER,
            (rng.f64() - 0.5) * 2.0 * JITTER,
        )
    }
}

impl Default for StubGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

fn fallback_center() -> Coordinates {
    CITY_CENTERS
        .iter()
        .find(|(city, _)| *city == FALLBACK_CITY)
        .map(|(_, center)| *center)
        .unwrap_or(crate::DEFAULT_CENTER)
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, address: &str) -> Coordinates {
        let base = Self::base_coordinates(address);
        let (d_lat, d_lng) = self.jitter();
        let result = Coordinates::new(base.lat + d_lat, base.lng + d_lng);
        log::debug!("geocoded {:?} to {:?}", address, result);
        result
    }
}
