pub mod cache;
pub mod eventbus;
pub mod render;
pub mod service;
