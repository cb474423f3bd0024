//! Background processing loop and handler dispatch for API-mode links.
//!
//! This is the "just works" layer: hand it a link, register callbacks per
//! frame kind, call [`Engine::begin`], and queue sends from any thread.

pub mod engine;
pub mod error;
pub mod registry;

pub use engine::{Engine, EngineConfig, EngineHandle};
pub use error::{EngineError, Result};
pub use registry::HandlerRegistry;
