//! HTTP handlers, one module per resource

pub mod files;
pub mod lessons;
pub mod notes;
pub mod progress;
pub mod questions;
pub mod reflections;
pub mod xp;
