pub mod catalog;
pub mod component;
pub mod mix;
pub mod nutrient;
pub mod params;

pub use catalog::{
    Animal, Availability, Catalog, CommercialFeed, Ingredient, NutritionalTarget, Supplement,
};
pub use component::{BulkFeed, Component};
pub use mix::Mix;
pub use nutrient::{NutrientProfile, unit_of};
pub use params::{FeedMode, FeedingParameters};
