use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{Profile, ProfileId};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Rating,
}

impl FromStr for SortKey {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "rating" => Ok(SortKey::Rating),
            _ => Err("Sort key must be either 'name' or 'rating'"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err("Sort must be either 'asc' or 'desc'"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Only profiles whose id is in the favorites set.
    Favorites,
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Favorites => f.write_str("favorites"),
        }
    }
}

impl FromStr for Filter {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "favorites" => Ok(Filter::Favorites),
            _ => Err("Unknown filter"),
        }
    }
}

/// Every input of the derived profile list besides the profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub term: String,
    pub filters: BTreeSet<Filter>,
    pub sort_key: SortKey,
    pub direction: SortDirection,
}

/// Derive the visible list from the full set:
/// text predicate, then filter predicates, then a stable sort.
pub fn derive(
    all: &[Profile],
    query: &Query,
    favorites: &BTreeSet<ProfileId>,
) -> Vec<Profile> {
    let term = query.term.to_lowercase();

    all.iter()
        .filter(|profile| term.is_empty() || profile.matches(&term))
        .filter(|profile| {
            query
                .filters
                .iter()
                .all(|filter| accepts(*filter, profile, favorites))
        })
        .sorted_by(|a, b| compare(a, b, query.sort_key, query.direction))
        .cloned()
        .collect()
}

fn accepts(
    filter: Filter,
    profile: &Profile,
    favorites: &BTreeSet<ProfileId>,
) -> bool {
    match filter {
        Filter::Favorites => favorites.contains(&profile.id),
    }
}

/// Name sorts A to Z and rating sorts high to low in ascending
/// direction; descending reverses either.
pub fn compare(
    a: &Profile,
    b: &Profile,
    key: SortKey,
    direction: SortDirection,
) -> Ordering {
    let ordering = match key {
        SortKey::Name => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
        SortKey::Rating => b.rating_or_zero().total_cmp(&a.rating_or_zero()),
    };

    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}
