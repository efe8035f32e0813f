//! Scene tree, node property and game control commands.

use serde_json::{json, Value};

use scenebridge_core::{fail, ok, CommandRegistry};

use crate::workspace::EditorWorkspace;

pub fn register(registry: &mut CommandRegistry<EditorWorkspace>) {
    registry.register("get_scene_tree", |ws, params| {
        let max_depth = params.get_i64("max_depth", 5);
        match ws.scene_tree(max_depth) {
            Ok(tree) => ok([("tree".into(), tree)]),
            Err(e) => fail(e),
        }
    });

    registry.register("create_scene", |ws, params| {
        let path = params.get_str("path", "");
        let root_type = params.get_str("root_type", "Node2D");
        match ws.create_scene(path, root_type) {
            Ok(()) => ok([("path".into(), Value::String(path.to_string()))]),
            Err(e) => fail(e),
        }
    });

    registry.register("add_node", |ws, params| {
        let parent = params.get_str("parent", "");
        let node_type = params.get_str("type", "Node");
        let name = params.get_str("name", "NewNode");
        match ws.add_node(parent, node_type, name) {
            Ok(path) => ok([("path".into(), Value::String(path))]),
            Err(e) => fail(e),
        }
    });

    registry.register("remove_node", |ws, params| {
        let path = params.get_str("path", "");
        match ws.remove_node(path) {
            Ok(()) => ok([]),
            Err(e) => fail(e),
        }
    });

    registry.register("rename_node", |ws, params| {
        let path = params.get_str("path", "");
        let new_name = params.get_str("new_name", "");
        match ws.rename_node(path, new_name) {
            Ok(()) => ok([]),
            Err(e) => fail(e),
        }
    });

    registry.register("get_node_info", |ws, params| {
        let path = params.get_str("path", "");
        match ws.node_info(path) {
            Ok(info) => ok([("info".into(), info)]),
            Err(e) => fail(e),
        }
    });

    registry.register("save_scene", |ws, params| {
        let path = params.get_str("path", "");
        match ws.save_scene(path) {
            Ok(saved) => ok([("path".into(), Value::String(saved))]),
            Err(e) => fail(e),
        }
    });

    registry.register("get_property", |ws, params| {
        let node = params.get_str("node", "");
        let property = params.get_str("property", "");
        match ws.get_property(node, property) {
            Ok(value) => ok([("value".into(), value)]),
            Err(e) => fail(e),
        }
    });

    registry.register("set_property", |ws, params| {
        let node = params.get_str("node", "");
        let property = params.get_str("property", "");
        let value = params.get_value("value").cloned().unwrap_or(Value::Null);
        match ws.set_property(node, property, value) {
            Ok(()) => ok([]),
            Err(e) => fail(e),
        }
    });

    registry.register("run_game", |ws, params| {
        let scene = params.get_str("scene", "");
        match ws.run_game(scene) {
            Ok(running) => ok([("scene".into(), Value::String(running))]),
            Err(e) => fail(e),
        }
    });

    registry.register("stop_game", |ws, _params| match ws.stop_game() {
        Some(scene) => ok([("scene".into(), Value::String(scene))]),
        None => ok([("scene".into(), json!(null))]),
    });
}
