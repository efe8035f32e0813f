//! Script and project filesystem commands.
//!
//! Script commands are plain file operations with a couple of guard rails:
//! `create_script` refuses to clobber an existing file, `edit_script`
//! requires one.  All paths are project-relative; the workspace rejects
//! escapes.

use serde_json::Value;

use scenebridge_core::{fail, ok, CommandRegistry};

use crate::workspace::EditorWorkspace;

pub fn register(registry: &mut CommandRegistry<EditorWorkspace>) {
    registry.register("create_script", |ws, params| {
        let path = params.get_str("path", "");
        let content = params.get_str("content", "");
        if path.is_empty() {
            return fail("path must not be empty");
        }
        if ws.file_exists(path) {
            return fail(format!("script already exists: {path}"));
        }
        match ws.write_file(path, content) {
            Ok(()) => ok([("path".into(), Value::String(path.to_string()))]),
            Err(e) => fail(e),
        }
    });

    registry.register("read_script", |ws, params| {
        let path = params.get_str("path", "");
        match ws.read_file(path) {
            Ok(content) => ok([("content".into(), Value::String(content))]),
            Err(e) => fail(e),
        }
    });

    registry.register("edit_script", |ws, params| {
        let path = params.get_str("path", "");
        let content = params.get_str("content", "");
        if !ws.file_exists(path) {
            return fail(format!("script not found: {path}"));
        }
        match ws.write_file(path, content) {
            Ok(()) => ok([("path".into(), Value::String(path.to_string()))]),
            Err(e) => fail(e),
        }
    });

    registry.register("get_errors", errors_handler);
    registry.register("get_runtime_errors", errors_handler);

    registry.register("clear_runtime_errors", |ws, _params| {
        let cleared = ws.clear_runtime_errors();
        ok([("cleared".into(), Value::from(cleared))])
    });

    registry.register("list_files", |ws, params| {
        let path = params.get_str("path", "");
        let recursive = params.get_bool("recursive", false);
        match ws.list_files(path, recursive) {
            Ok(files) => ok([(
                "files".into(),
                Value::Array(files.into_iter().map(Value::String).collect()),
            )]),
            Err(e) => fail(e),
        }
    });

    registry.register("read_file", |ws, params| {
        let path = params.get_str("path", "");
        match ws.read_file(path) {
            Ok(content) => ok([("content".into(), Value::String(content))]),
            Err(e) => fail(e),
        }
    });

    registry.register("create_folder", |ws, params| {
        let path = params.get_str("path", "");
        if path.is_empty() {
            return fail("path must not be empty");
        }
        match ws.create_folder(path) {
            Ok(()) => ok([]),
            Err(e) => fail(e),
        }
    });

    registry.register("delete_file", |ws, params| {
        let path = params.get_str("path", "");
        if !ws.file_exists(path) {
            return fail(format!("file not found: {path}"));
        }
        match ws.delete_file(path) {
            Ok(()) => ok([]),
            Err(e) => fail(e),
        }
    });

    registry.register("get_project_path", |ws, _params| {
        ok([(
            "path".into(),
            Value::String(ws.project_root().to_string_lossy().into_owned()),
        )])
    });
}

/// Shared by `get_errors` and its `get_runtime_errors` alias.
fn errors_handler(
    ws: &mut EditorWorkspace,
    _params: &scenebridge_core::Params,
) -> scenebridge_core::CommandResult {
    ok([("errors".into(), Value::Array(ws.captured_errors()))])
}
