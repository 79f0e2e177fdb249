//! Declarative validation over arbitrary object graphs.
//!
//! Rules name fields by dotted path (`Anchor.segment...`), the engine resolves
//! those paths against caller-supplied roots through the [`graph::Walkable`]
//! capability and reports which rules passed, failed or never ran.

pub mod config;
pub mod definitions;
pub mod engine;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod utils;
