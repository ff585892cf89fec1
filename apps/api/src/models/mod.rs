pub mod application;
pub mod posting;
pub mod profile;
