pub mod google_places;
pub mod restaurant;
