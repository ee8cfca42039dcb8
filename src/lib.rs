//! budgetctl: browse a hierarchical budget and redistribute sibling allocations
//!
//! Layers, innermost first:
//! - [`domain`]: categories, sibling groups and the redistribution engine
//! - [`application`]: the view controller and render models
//! - [`infrastructure`]: collaborator traits, HTTP client, DI container
//! - [`cli`]: argument parsing, interactive shell, terminal renderer

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
