//! HTTP request handlers organized by functionality

pub mod movies;
pub mod root;

// Re-export handler functions
pub use movies::{create_movie, delete_movie, get_movie, list_movies, movie_options, update_movie};
pub use root::hello;
