//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on collaborator traits (TreeApi, AuthApi, Renderer, ...)
//! but are themselves concrete structs, not traits.

mod controller;
mod tree;

pub use controller::{
    LoadOutcome, ModeChange, PendingLoad, SaveOutcome, ViewController, ViewState,
};
pub use tree::{CategoryTree, CategoryTreeService};
