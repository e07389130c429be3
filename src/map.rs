//! Keeps a map widget consistent with the view state.
//!
//! The bridge never talks to a map library; it emits [`MapCommand`]s and
//! mirrors their effect in a headless [`MapCamera`].

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::config::MapConfig;
use crate::storage::KeyValueStorage;
use crate::view::{ProfileCollection, ViewSnapshot};
use crate::{Coordinates, Profile, ProfileId, Result};

/// Size of a Web Mercator tile at zoom 0, in pixels.
const TILE_SIZE: f64 = 256.0;

pub const PLACEHOLDER_MESSAGE: &str = "Select a profile to see its location";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 640,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub south_west: Coordinates,
    pub north_east: Coordinates,
}

impl LatLngBounds {
    pub fn from_point(point: Coordinates) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    /// Smallest bounds holding every point, `None` without points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinates>,
    {
        let mut points = points.into_iter();
        let mut bounds = Self::from_point(points.next()?);
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: Coordinates) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }

    pub fn center(&self) -> Coordinates {
        Coordinates::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    /// Nothing to display.
    ShowPlaceholder,
    PanTo { center: Coordinates, zoom: u8 },
    /// Fit every marker, never zooming in past `max_zoom`.
    FitBounds { bounds: LatLngBounds, max_zoom: u8 },
    /// The camera already matches the state.
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapCamera {
    pub center: Coordinates,
    pub zoom: u8,
}

impl MapCamera {
    pub fn new(center: Coordinates, zoom: u8) -> Self {
        Self { center, zoom }
    }

    /// Center on `bounds` at the largest whole zoom level showing all
    /// of it inside `viewport`, clamped to `max_zoom`.
    pub fn fit_bounds(
        &mut self,
        bounds: &LatLngBounds,
        viewport: Viewport,
        max_zoom: u8,
    ) {
        self.center = bounds.center();
        self.zoom = fit_zoom(bounds, viewport, max_zoom);
    }
}

/// Zoom level at which `bounds` fills at most `viewport`.
pub fn fit_zoom(bounds: &LatLngBounds, viewport: Viewport, max_zoom: u8) -> u8 {
    let lng_fraction = (bounds.north_east.lng - bounds.south_west.lng) / 360.0;
    let lat_fraction = (mercator_y(bounds.north_east.lat)
        - mercator_y(bounds.south_west.lat))
        / (2.0 * PI);

    let zoom_for = |pixels: u32, fraction: f64| {
        if fraction <= 0.0 {
            f64::INFINITY
        } else {
            (f64::from(pixels) / TILE_SIZE / fraction).log2()
        }
    };

    let zoom = zoom_for(viewport.width, lng_fraction)
        .min(zoom_for(viewport.height, lat_fraction))
        .floor();

    if zoom.is_nan() || zoom < 0.0 {
        0
    } else {
        zoom.min(f64::from(max_zoom)) as u8
    }
}

fn mercator_y(lat: f64) -> f64 {
    let lat = lat.clamp(-85.0511, 85.0511).to_radians();
    (PI / 4.0 + lat / 2.0).tan().ln()
}

/// Profiles the map shows for a snapshot: every visible profile in
/// "show all" mode, otherwise the selected one, otherwise none.
pub fn displayed_profiles(snapshot: &ViewSnapshot) -> Vec<Profile> {
    if snapshot.show_all_on_map && !snapshot.profiles.is_empty() {
        return snapshot.profiles.to_vec();
    }
    snapshot.selected.iter().cloned().collect()
}

/// Profiles that can be placed, paired with their coordinates.
pub fn placeable(profiles: &[Profile]) -> Vec<(&Profile, Coordinates)> {
    profiles
        .iter()
        .filter_map(|profile| profile.location().map(|c| (profile, c)))
        .collect()
}

/// Profile after `current` in `displayed`, wrapping to the first.
pub fn next_in(displayed: &[Profile], current: ProfileId) -> Option<&Profile> {
    step(displayed, current, 1)
}

/// Profile before `current` in `displayed`, wrapping to the last.
pub fn previous_in(
    displayed: &[Profile],
    current: ProfileId,
) -> Option<&Profile> {
    step(displayed, current, displayed.len().saturating_sub(1))
}

fn step(
    displayed: &[Profile],
    current: ProfileId,
    by: usize,
) -> Option<&Profile> {
    if displayed.len() <= 1 {
        return None;
    }
    let index = displayed.iter().position(|p| p.id == current)?;
    displayed.get((index + by) % displayed.len())
}

/// Follows the view state and produces camera moves for it.
pub struct MapBridge {
    config: MapConfig,
    camera: MapCamera,
    last_selected: Option<ProfileId>,
    last_displayed: Option<Vec<ProfileId>>,
    highlighted: Option<ProfileId>,
}

impl MapBridge {
    pub fn new(config: MapConfig) -> Self {
        let camera = MapCamera::new(config.default_center, config.default_zoom);
        Self {
            config,
            camera,
            last_selected: None,
            last_displayed: None,
            highlighted: None,
        }
    }

    pub fn camera(&self) -> MapCamera {
        self.camera
    }

    /// Profile whose info window is open.
    pub fn highlighted(&self) -> Option<ProfileId> {
        self.highlighted
    }

    /// Compare `snapshot` with the last synced state and move the camera
    /// when the selection or the displayed set changed.
    pub fn sync(&mut self, snapshot: &ViewSnapshot) -> MapCommand {
        let displayed = displayed_profiles(snapshot);
        let displayed_ids: Vec<ProfileId> =
            displayed.iter().map(|p| p.id).collect();
        let selected = snapshot.selected.as_ref();

        let selection_changed = selected.map(|p| p.id) != self.last_selected;
        let displayed_changed =
            self.last_displayed.as_ref() != Some(&displayed_ids);

        self.last_selected = selected.map(|p| p.id);
        self.last_displayed = Some(displayed_ids);
        if let Some(id) = self.highlighted {
            if !displayed.iter().any(|p| p.id == id) {
                self.highlighted = None;
            }
        }

        let placed = placeable(&displayed);
        let command = if placed.len() > 1 && displayed_changed {
            let bounds =
                LatLngBounds::from_points(placed.iter().map(|(_, c)| *c));
            match bounds {
                Some(bounds) => MapCommand::FitBounds {
                    bounds,
                    max_zoom: self.config.max_fit_zoom,
                },
                None => MapCommand::Keep,
            }
        } else if let (true, Some(profile)) = (selection_changed, selected) {
            match profile.location() {
                Some(center) => {
                    self.highlighted = Some(profile.id);
                    MapCommand::PanTo {
                        center,
                        zoom: self.config.focused_zoom,
                    }
                }
                None => {
                    log::warn!(
                        "profile {} has no usable coordinates",
                        profile.id
                    );
                    MapCommand::Keep
                }
            }
        } else if displayed.is_empty() && displayed_changed {
            MapCommand::ShowPlaceholder
        } else if let ([(profile, center)], true) =
            (placed.as_slice(), displayed_changed)
        {
            self.highlighted = Some(profile.id);
            MapCommand::PanTo {
                center: *center,
                zoom: self.config.focused_zoom,
            }
        } else {
            MapCommand::Keep
        };

        self.apply(&command);
        command
    }

    /// A marker was clicked: select its profile in the view and follow.
    pub fn marker_clicked<S: KeyValueStorage>(
        &mut self,
        view: &mut ProfileCollection<S>,
        id: ProfileId,
    ) -> Result<MapCommand> {
        let snapshot = view.select_by_id(id)?;
        Ok(self.sync(&snapshot))
    }

    /// Open the info window of a displayed profile without changing the
    /// selection.
    pub fn highlight(
        &mut self,
        snapshot: &ViewSnapshot,
        id: ProfileId,
    ) -> MapCommand {
        let displayed = displayed_profiles(snapshot);
        let target = displayed.iter().find(|p| p.id == id);
        match target.and_then(Profile::location) {
            Some(center) => {
                self.highlighted = Some(id);
                let command = MapCommand::PanTo {
                    center,
                    zoom: self.camera.zoom,
                };
                self.apply(&command);
                command
            }
            None => MapCommand::Keep,
        }
    }

    pub fn show_next(&mut self, snapshot: &ViewSnapshot) -> MapCommand {
        self.navigate(snapshot, next_in)
    }

    pub fn show_previous(&mut self, snapshot: &ViewSnapshot) -> MapCommand {
        self.navigate(snapshot, previous_in)
    }

    /// Position of the highlighted profile as "n/m", when navigation
    /// between several profiles is possible.
    pub fn position_label(&self, snapshot: &ViewSnapshot) -> Option<String> {
        let displayed = displayed_profiles(snapshot);
        if displayed.len() <= 1 {
            return None;
        }
        let current = self.highlighted?;
        let index = displayed.iter().position(|p| p.id == current)?;
        Some(format!("{}/{}", index + 1, displayed.len()))
    }

    fn navigate(
        &mut self,
        snapshot: &ViewSnapshot,
        step: fn(&[Profile], ProfileId) -> Option<&Profile>,
    ) -> MapCommand {
        let current = match self.highlighted {
            Some(current) => current,
            None => return MapCommand::Keep,
        };
        let displayed = displayed_profiles(snapshot);
        match step(&displayed, current).map(|p| p.id) {
            Some(id) => self.highlight(snapshot, id),
            None => MapCommand::Keep,
        }
    }

    fn apply(&mut self, command: &MapCommand) {
        match command {
            MapCommand::ShowPlaceholder => {
                self.highlighted = None;
                self.camera = MapCamera::new(
                    self.config.default_center,
                    self.config.default_zoom,
                );
            }
            MapCommand::PanTo { center, zoom } => {
                self.camera = MapCamera::new(*center, *zoom);
            }
            MapCommand::FitBounds { bounds, max_zoom } => {
                self.camera
                    .fit_bounds(bounds, self.config.viewport, *max_zoom);
            }
            MapCommand::Keep => {}
        }
    }
}
