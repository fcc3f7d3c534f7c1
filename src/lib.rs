//! Core of the streaming dashboard: the dataset store, the pure view
//! transformations behind each chart, and the colours they are drawn with.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod views;

pub use error::{DashError, DashResult};
