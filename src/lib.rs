pub mod compare;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod pose;
pub mod render;
pub mod video;
