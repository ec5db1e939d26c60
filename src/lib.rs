//! Library exports for the sketch-dispatch controller input layer.
//!
//! Exposes the input dispatcher, the collaborator traits host integrations
//! implement, configuration types, and headless collaborators used for trace
//! replay and tests.

pub mod config;
pub mod error;
pub mod headless;
pub mod input;
pub mod replay;
pub mod tool;

pub use config::Config;
pub use error::{BindingError, DispatchError};
pub use input::InputDispatcher;
