pub mod artifact;
pub mod config;
pub mod error;
pub mod media;
pub mod quality;
pub mod state;
