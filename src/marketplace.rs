//! Marketplace seed data and listing filters

use crate::models::{CollectibleListing, Rarity};
use serde::Deserialize;

/// Listing query: category (`"all"` or a category name) and a search term
/// matched against the listing name and creator handle
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ListingFilter {
    pub fn matches(&self, listing: &CollectibleListing) -> bool {
        let category_ok = match self.category.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(category) if category.eq_ignore_ascii_case("all") => true,
            Some(category) => listing.category.eq_ignore_ascii_case(category),
        };

        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                listing.name.to_lowercase().contains(&term)
                    || listing
                        .creator
                        .as_deref()
                        .map(|creator| creator.to_lowercase().contains(&term))
                        .unwrap_or(false)
            }
        };

        category_ok && search_ok
    }

    pub fn apply<'a>(
        &'a self,
        listings: &'a [CollectibleListing],
    ) -> impl Iterator<Item = &'a CollectibleListing> + 'a {
        listings.iter().filter(move |listing| self.matches(listing))
    }
}

/// Listings written to the shared scope the first time any user starts
pub fn seed_listings() -> Vec<CollectibleListing> {
    let samples: [(&str, &str, &str, u64, Rarity, u64, &str); 12] = [
        (
            "White Truffle Risotto",
            "italian",
            "@chef_marco",
            150,
            Rarity::Epic,
            342,
            "Creamy risotto elevated with white truffles from Alba",
        ),
        (
            "Tokyo-Paris Fusion Ramen",
            "asian",
            "@fusion_master",
            120,
            Rarity::Rare,
            289,
            "Bold fusion between Japanese and French flavors",
        ),
        (
            "Modern Bouillabaisse",
            "french",
            "@chef_provencal",
            180,
            Rarity::Epic,
            412,
            "Contemporary reinvention of the Marseille classic",
        ),
        (
            "Gourmet Lobster Tacos",
            "fusion",
            "@taco_innovator",
            200,
            Rarity::Legendary,
            501,
            "Mexican tacos revisited with Brittany lobster",
        ),
        (
            "Deconstructed Tarte Tatin",
            "desserts",
            "@patissier_rebel",
            90,
            Rarity::Rare,
            234,
            "Modern artistic version of Tarte Tatin",
        ),
        (
            "Sushi Burger Fusion",
            "fusion",
            "@sushi_burger",
            110,
            Rarity::Rare,
            198,
            "When sushi meets American burger",
        ),
        (
            "Truffle Carbonara",
            "italian",
            "@pasta_king",
            140,
            Rarity::Epic,
            367,
            "Roman carbonara enriched with black truffles",
        ),
        (
            "Exotic Fruit Pavlova",
            "desserts",
            "@sweet_artist",
            85,
            Rarity::Common,
            176,
            "Light meringue crowned with tropical fruits",
        ),
        (
            "Premium Vegan Pho",
            "asian",
            "@vegan_viet",
            95,
            Rarity::Rare,
            245,
            "Aromatic broth with seasonal vegetables",
        ),
        (
            "Sakura Duck Breast",
            "fusion",
            "@duck_master",
            160,
            Rarity::Epic,
            389,
            "Duck breast marinated with sake and cherry blossoms",
        ),
        (
            "Matcha Crème Brûlée",
            "desserts",
            "@zen_desserts",
            100,
            Rarity::Rare,
            213,
            "French classic infused with Japanese matcha tea",
        ),
        (
            "Royal Neapolitan Pizza",
            "italian",
            "@pizza_napoli",
            130,
            Rarity::Rare,
            421,
            "Traditional pizza with exceptional ingredients",
        ),
    ];

    samples
        .into_iter()
        .zip(1u64..)
        .map(
            |((name, category, creator, price, rarity, likes, description), id)| {
                CollectibleListing {
                    id,
                    name: name.to_string(),
                    category: category.to_string(),
                    price,
                    rarity,
                    likes,
                    creator: Some(creator.to_string()),
                    description: Some(description.to_string()),
                }
            },
        )
        .collect()
}
