pub mod restaurant_finder;
