//! Streaming push parser module
//!
//! The engine walks the input once and fires ordered callbacks on a
//! [`handler::SaxHandler`]; tree construction, diagnostics routing, and
//! schema checks are all layered on top of that trait.

pub mod engine;
pub mod handler;

pub use engine::{Engine, EngineConfig};
pub use handler::{Attribute, SaxHandler};
