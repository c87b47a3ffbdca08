//! Screen controllers.
//!
//! Each controller owns the in-memory state for one screen, for the
//! lifetime of that screen. Rendering belongs to the caller: a frontend
//! constructs a controller on screen entry, drives it with user events,
//! reads the state back, and drops it on leave.

pub mod favorites;
pub mod home;

pub use favorites::FavoritesController;
pub use home::HomeController;
