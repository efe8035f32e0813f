//! Command registry: the static name → handler table.
//!
//! The host builds the registry once, registering every supported command
//! before the server starts accepting traffic, and injects it into the
//! server at construction.  The bridge itself never mutates it at runtime
//! and provides no way to unregister.
//!
//! Handlers take the host context explicitly rather than capturing it, so
//! the registry and dispatcher are testable with a bare fake context and a
//! closure — no editor required.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::params::Params;

/// The result map every handler returns.
///
/// By convention it carries at least `success: bool`, plus a human-readable
/// `error: String` on failure.  Handlers must not panic: internal failures
/// are converted into `fail(...)` results by the handler itself, and the
/// dispatcher does not catch unwinds.
pub type CommandResult = Map<String, Value>;

/// A registered command handler.
pub type Handler<C> = Box<dyn Fn(&mut C, &Params) -> CommandResult + Send>;

/// Builds a success result, optionally extended with extra fields.
///
/// ```
/// use scenebridge_core::registry::ok;
/// let r = ok([("path".into(), "res://main.tscn".into())]);
/// assert_eq!(r["success"], true);
/// assert_eq!(r["path"], "res://main.tscn");
/// ```
pub fn ok(fields: impl IntoIterator<Item = (String, Value)>) -> CommandResult {
    let mut result = Map::new();
    result.insert("success".into(), Value::Bool(true));
    result.extend(fields);
    result
}

/// Builds a failure result carrying a human-readable error description.
pub fn fail(error: impl Into<String>) -> CommandResult {
    let mut result = Map::new();
    result.insert("success".into(), Value::Bool(false));
    result.insert("error".into(), Value::String(error.into()));
    result
}

/// Immutable-after-startup mapping from method name to handler.
pub struct CommandRegistry<C> {
    handlers: HashMap<String, Handler<C>>,
}

impl<C> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CommandRegistry<C> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers `handler` under `name`.
    ///
    /// Registering a duplicate name silently overwrites the previous handler
    /// (last registration wins); duplicates are a startup configuration
    /// concern, not a runtime fault.
    pub fn register<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&mut C, &Params) -> CommandResult + Send + 'static,
    {
        self.handlers.insert(name.to_string(), Box::new(handler));
    }

    /// Looks up the handler for `name`.
    pub fn get(&self, name: &str) -> Option<&Handler<C>> {
        self.handlers.get(name)
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True when nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Sorted list of registered method names, for diagnostics.
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Minimal fake host context for registry tests.
    #[derive(Default)]
    struct Counter {
        calls: u32,
    }

    #[test]
    fn registered_handler_is_invoked_with_context() {
        let mut registry: CommandRegistry<Counter> = CommandRegistry::new();
        registry.register("bump", |ctx, params| {
            ctx.calls += params.get_i64("by", 1) as u32;
            ok([])
        });

        let mut ctx = Counter::default();
        let params = Params::from_map(
            json!({"by": 3}).as_object().cloned().unwrap_or_default(),
        );
        let handler = registry.get("bump").expect("registered");
        let result = handler(&mut ctx, &params);

        assert_eq!(ctx.calls, 3);
        assert_eq!(result["success"], true);
    }

    #[test]
    fn unknown_method_is_absent() {
        let registry: CommandRegistry<Counter> = CommandRegistry::new();
        assert!(registry.get("does_not_exist").is_none());
    }

    #[test]
    fn duplicate_registration_last_wins() {
        let mut registry: CommandRegistry<Counter> = CommandRegistry::new();
        registry.register("which", |_, _| ok([("version".into(), json!(1))]));
        registry.register("which", |_, _| ok([("version".into(), json!(2))]));

        let mut ctx = Counter::default();
        let result = registry.get("which").expect("registered")(&mut ctx, &Params::empty());
        assert_eq!(result["version"], 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn ok_and_fail_shapes() {
        let r = ok([("count".into(), json!(4))]);
        assert_eq!(r["success"], true);
        assert_eq!(r["count"], 4);

        let f = fail("node not found: /Player");
        assert_eq!(f["success"], false);
        assert_eq!(f["error"], "node not found: /Player");
    }

    #[test]
    fn method_names_sorted() {
        let mut registry: CommandRegistry<Counter> = CommandRegistry::new();
        registry.register("b", |_, _| ok([]));
        registry.register("a", |_, _| ok([]));
        assert_eq!(registry.method_names(), vec!["a", "b"]);
    }
}
