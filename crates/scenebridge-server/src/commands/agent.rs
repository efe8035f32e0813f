//! Assistant-facing commands: input actions, signal wiring, the task plan
//! panel and the diff entry log.
//!
//! Plan and diff commands queue broadcast events on the workspace
//! (`plan_updated`, `diff_entry_added`, `diff_entries_cleared`); the server
//! flushes those to every client before the correlated response goes out.

use serde_json::{json, Value};

use scenebridge_core::{fail, ok, CommandRegistry};

use crate::workspace::EditorWorkspace;

pub fn register(registry: &mut CommandRegistry<EditorWorkspace>) {
    registry.register("add_input_action", |ws, params| {
        let action = params.get_str("action", "");
        let key = params.get_str("key", "");
        match ws.add_input_action(action, key) {
            Ok(replaced) => ok([("replaced".into(), Value::Bool(replaced))]),
            Err(e) => fail(e),
        }
    });

    registry.register("remove_input_action", |ws, params| {
        let action = params.get_str("action", "");
        match ws.remove_input_action(action) {
            Ok(()) => ok([]),
            Err(e) => fail(e),
        }
    });

    registry.register("list_input_actions", |ws, _params| {
        let actions: Vec<Value> = ws
            .input_actions()
            .iter()
            .map(|(action, key)| json!({"action": action, "key": key}))
            .collect();
        ok([("actions".into(), Value::Array(actions))])
    });

    registry.register("connect_signal", |ws, params| {
        let source = params.get_str("source", "");
        let signal = params.get_str("signal", "");
        let target = params.get_str("target", "");
        let method = params.get_str("method", "");
        match ws.connect_signal(source, signal, target, method) {
            Ok(()) => ok([]),
            Err(e) => fail(e),
        }
    });

    registry.register("list_signals", |ws, params| {
        let node = params.get_str("node", "");
        match ws.signals_for(node) {
            Ok(connections) => {
                let list: Vec<Value> = connections
                    .iter()
                    .map(|c| {
                        json!({
                            "source": c.source,
                            "signal": c.signal,
                            "target": c.target,
                            "method": c.method,
                        })
                    })
                    .collect();
                ok([("signals".into(), Value::Array(list))])
            }
            Err(e) => fail(e),
        }
    });

    registry.register("set_current_plan", |ws, params| {
        let name = params.get_str("name", "");
        let plan = ws.set_plan(name, params.get_array("steps"));
        ok([("plan".into(), plan)])
    });

    registry.register("update_plan", |ws, params| {
        let step_index = params.get_i64("step_index", -1);
        let status = params.get_str("status", "completed");
        match ws.update_plan_step(step_index, status) {
            Ok(plan) => ok([("plan".into(), plan)]),
            Err(e) => fail(e),
        }
    });

    registry.register("add_diff_entry", |ws, params| {
        let file = params.get_str("file", "");
        let status = params.get_str("status", "modified");
        if file.is_empty() {
            return fail("file must not be empty");
        }
        let entry = ws.add_diff_entry(file, status);
        ok([("entry".into(), entry)])
    });

    registry.register("clear_diff_entries", |ws, _params| {
        ws.clear_diff_entries();
        ok([])
    });
}
