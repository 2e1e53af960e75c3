//! Common types used across the application.

pub mod id;
pub mod language;
pub mod window;

pub use id::*;
pub use language::LanguageSelector;
pub use window::{DateWindow, WindowError};
