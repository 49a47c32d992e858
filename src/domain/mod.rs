pub mod calendar;
pub mod error;
pub mod event;
pub mod model;
pub mod naming;
pub mod repository;
