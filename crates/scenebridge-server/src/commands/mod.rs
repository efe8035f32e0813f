//! The registered command surface the demo workspace exposes over the
//! bridge.
//!
//! Handlers are thin: they pull typed parameters, call the workspace, and
//! map `Result` into the `{success, ...}` / `{success: false, error}` result
//! convention.  The workspace owns the actual editing logic.

use scenebridge_core::CommandRegistry;

use crate::workspace::EditorWorkspace;

pub mod agent;
pub mod project;
pub mod scene;

/// Registers every command the demo workspace supports.
pub fn register_all(registry: &mut CommandRegistry<EditorWorkspace>) {
    scene::register(registry);
    project::register(registry);
    agent::register(registry);
}
