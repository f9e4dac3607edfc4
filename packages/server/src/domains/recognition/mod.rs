//! Recognition domain - proxy to the external gesture-recognition service

pub mod actions;
pub mod data;

pub use data::{DiacriticsInput, GestureInput};
