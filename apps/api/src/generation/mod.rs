//! Page generation: prompt assembly, reference-input processing, starter
//! templates, the orchestrator, and the HTTP handlers on top of it.

pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod reference;
pub mod templates;
