pub mod format;
pub mod phase;
pub mod service;
pub mod views;

pub use service::{AppState, create_app};
