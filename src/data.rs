use crate::id::ProfileId;
use crate::profile::{Coordinates, Profile};

struct Seed {
    id: u64,
    name: &'static str,
    image: &'static str,
    description: &'static str,
    address: &'static str,
    lat: f64,
    lng: f64,
    contact: &'static str,
    rating: Option<f64>,
    interests: &'static [&'static str],
}

const SEEDS: &[Seed] = &[
    Seed {
        id: 1,
        name: "John Doe",
        image: "https://randomuser.me/api/portraits/men/1.jpg",
        description: "Software Developer with 5 years of experience",
        address: "Pune, Maharashtra",
        lat: 18.148059,
        lng: 74.028261,
        contact: "john.doe@example.com",
        rating: Some(4.5),
        interests: &["Programming", "Hiking", "Photography"],
    },
    Seed {
        id: 2,
        name: "HELLO",
        image: "https://randomuser.me/api/portraits/men/11.jpg",
        description: "Software Developer with 7 years of experience",
        address: "Uttrakhand, India",
        lat: 30.406773,
        lng: 77.970200,
        contact: "hello@example.com",
        rating: Some(3.0),
        interests: &["Swimming", "Hiking", "Cricket"],
    },
    Seed {
        id: 3,
        name: "World",
        image: "https://randomuser.me/api/portraits/men/9.jpg",
        description: "Software Developer with 5 years of experience",
        address: "Durg, Chhattisgarh",
        lat: 28.501106,
        lng: 77.376527,
        contact: "world@example.com",
        rating: None,
        interests: &["Programming", "Hiking", "Photography"],
    },
    Seed {
        id: 4,
        name: "Dummy",
        image: "https://randomuser.me/api/portraits/men/7.jpg",
        description: "Software Developer with 5 years of experience",
        address: "Banglore, karnataka",
        lat: 21.176214,
        lng: 81.284525,
        contact: "dummy@example.com",
        rating: Some(4.0),
        interests: &["Programming", "Hiking", "Photography"],
    },
    Seed {
        id: 5,
        name: "Data",
        image: "https://randomuser.me/api/portraits/men/10.jpg",
        description: "Software Developer with 5 years of experience",
        address: "Kerla",
        lat: 17.179172,
        lng: 78.318058,
        contact: "data@example.com",
        rating: Some(5.0),
        interests: &["Programming", "Cycling", "Photography"],
    },
];

/// The demo data set the in-memory store starts from.
pub fn mock_profiles() -> Vec<Profile> {
    SEEDS
        .iter()
        .map(|seed| Profile {
            id: ProfileId(seed.id),
            name: seed.name.to_owned(),
            image: seed.image.to_owned(),
            description: seed.description.to_owned(),
            address: seed.address.to_owned(),
            contact: seed.contact.to_owned(),
            rating: seed.rating,
            interests: seed
                .interests
                .iter()
                .map(|s| s.to_string())
                .collect(),
            coordinates: Some(Coordinates::new(seed.lat, seed.lng)),
        })
        .collect()
}
