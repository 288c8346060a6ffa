use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROFILE_COUNT: usize = 12;
pub const IMAGES_PER_PROFILE: usize = 3;
const TAG_DRAWS: usize = 4;
const MIN_AGE: u8 = 18;
const MAX_AGE: u8 = 39;

pub const TAGS: [&str; 16] = [
    "Coffee",
    "Hiking",
    "Movies",
    "Live Music",
    "Board Games",
    "Cats",
    "Dogs",
    "Traveler",
    "Foodie",
    "Tech",
    "Art",
    "Runner",
    "Climbing",
    "Books",
    "Yoga",
    "Photography",
];

const FIRST_NAMES: [&str; 20] = [
    "Alex", "Sam", "Jordan", "Taylor", "Casey", "Avery", "Riley", "Morgan", "Quinn", "Cameron",
    "Jamie", "Drew", "Parker", "Reese", "Emerson", "Rowan", "Shawn", "Harper", "Skyler", "Devon",
];

const CITIES: [&str; 10] = [
    "Brooklyn",
    "Manhattan",
    "Queens",
    "Jersey City",
    "Hoboken",
    "Astoria",
    "Williamsburg",
    "Bushwick",
    "Harlem",
    "Lower East Side",
];

const JOBS: [&str; 11] = [
    "Product Designer",
    "Software Engineer",
    "Data Analyst",
    "Barista",
    "Teacher",
    "Photographer",
    "Architect",
    "Chef",
    "Nurse",
    "Marketing Manager",
    "UX Researcher",
];

const BIOS: [&str; 8] = [
    "Weekend hikes and weekday lattes.",
    "Dog parent. Amateur chef. Karaoke enthusiast.",
    "Trying every taco in the city, for science.",
    "Bookstore browser and movie quote machine.",
    "Gym sometimes, Netflix always.",
    "Looking for the best slice in town.",
    "Will beat you at Mario Kart.",
    "Currently planning the next trip.",
];

pub const IMAGE_SEEDS: [&str; 10] = [
    "1515462277126-2b47b9fa09e6",
    "1520975916090-3105956dac38",
    "1519340241574-2cec6aef0c01",
    "1554151228-14d9def656e4",
    "1548142813-c348350df52b",
    "1517841905240-472988babdf9",
    "1535713875002-d1d0cf377fde",
    "1545996124-0501ebae84d0",
    "1524504388940-b1c1722653e1",
    "1531123897727-8f129e1688ce",
];

/// Tiny inline SVG shown when a photo fails to load.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='4' height='3'%3E%3Crect fill='%23222436' width='4' height='3'/%3E%3C/svg%3E";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub age: u8,
    pub city: String,
    pub title: String,
    pub bio: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
}

impl Profile {
    pub fn cover_image(&self) -> &str {
        self.images
            .first()
            .map(String::as_str)
            .unwrap_or(PLACEHOLDER_IMAGE)
    }
}

pub fn image_url(seed: &str) -> String {
    format!(
        "https://images.unsplash.com/photo-{}?auto=format&fit=crop&w=1200&q=80",
        seed
    )
}

pub fn generate_profiles(count: usize) -> Vec<Profile> {
    generate_profiles_with(&mut rand::thread_rng(), count)
}

pub fn generate_profiles_with<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Profile> {
    // Ids only need to be unique within one batch; the token keeps keys from
    // colliding with a previous batch still being diffed out of the DOM.
    let batch = to_base36(rng.gen::<u32>());

    (0..count)
        .map(|index| Profile {
            id: format!("p_{}_{}", index, batch),
            name: pick(rng, &FIRST_NAMES),
            age: rng.gen_range(MIN_AGE..=MAX_AGE),
            city: pick(rng, &CITIES),
            title: pick(rng, &JOBS),
            bio: pick(rng, &BIOS),
            tags: pick_tags(rng),
            images: pick_images(rng, IMAGES_PER_PROFILE),
        })
        .collect()
}

fn pick<R: Rng + ?Sized>(rng: &mut R, words: &[&str]) -> String {
    words.choose(rng).copied().unwrap_or_default().to_string()
}

/// Four independent draws with duplicates collapsed, so a profile may end up
/// with fewer than four tags.
fn pick_tags<R: Rng + ?Sized>(rng: &mut R) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(TAG_DRAWS);
    for _ in 0..TAG_DRAWS {
        let tag = pick(rng, &TAGS);
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

fn pick_images<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<String> {
    IMAGE_SEEDS
        .choose_multiple(rng, count.min(IMAGE_SEEDS.len()))
        .map(|seed| image_url(seed))
        .collect()
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
