pub mod geo;
pub mod handler_404;
pub mod keywords;
