//! In-memory editor workspace: the demo host context the command surface
//! operates on.
//!
//! The real collaborator behind the bridge is a live editor.  This model
//! stands in for it with the pieces the command surface needs: a scene tree
//! of typed nodes with property bags, a project directory on disk for
//! script and file commands, input actions, signal connections, the current
//! task plan, a diff entry log, and a capped ring of captured runtime
//! errors.
//!
//! Node paths are `/`-separated and relative to the scene root; `""`, `"/"`
//! and `"."` all resolve to the root itself.  File paths accept an optional
//! `res://` prefix and are confined to the project root — absolute paths
//! and `..` components are rejected.

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Map, Value};
use tracing::info;

use crate::host::{BridgeHost, HostEvent};

/// Cap on captured runtime errors when none is configured.
pub const DEFAULT_MAX_CAPTURED_ERRORS: usize = 100;

/// One node in the edited scene tree.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub node_type: String,
    pub properties: Map<String, Value>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    fn new(name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_type: node_type.into(),
            properties: Map::new(),
            children: Vec::new(),
        }
    }

    /// Serializes this node and its descendants down to `max_depth` levels.
    fn to_tree_value(&self, max_depth: i64) -> Value {
        let mut node = Map::new();
        node.insert("name".into(), Value::String(self.name.clone()));
        node.insert("type".into(), Value::String(self.node_type.clone()));
        if max_depth > 0 {
            let children: Vec<Value> = self
                .children
                .iter()
                .map(|c| c.to_tree_value(max_depth - 1))
                .collect();
            node.insert("children".into(), Value::Array(children));
        } else if !self.children.is_empty() {
            node.insert("children_truncated".into(), Value::Bool(true));
        }
        Value::Object(node)
    }

    fn to_scene_file_value(&self) -> Value {
        json!({
            "name": self.name,
            "type": self.node_type,
            "properties": self.properties,
            "children": self.children.iter()
                .map(SceneNode::to_scene_file_value)
                .collect::<Vec<_>>(),
        })
    }
}

/// The currently edited scene.
#[derive(Debug, Clone)]
pub struct Scene {
    pub path: String,
    pub root: SceneNode,
}

/// One recorded signal connection.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalConnection {
    pub source: String,
    pub signal: String,
    pub target: String,
    pub method: String,
}

/// The current task plan shown in the assistant panel.
#[derive(Debug, Clone)]
pub struct Plan {
    pub name: String,
    pub steps: Vec<Map<String, Value>>,
    pub current_step: usize,
}

impl Plan {
    pub fn to_value(&self) -> Value {
        json!({
            "name": self.name,
            "steps": self.steps,
            "current_step": self.current_step,
        })
    }
}

/// The demo host context.
pub struct EditorWorkspace {
    project_root: PathBuf,
    scene: Option<Scene>,
    input_actions: BTreeMap<String, String>,
    signal_connections: Vec<SignalConnection>,
    plan: Option<Plan>,
    captured_errors: VecDeque<Map<String, Value>>,
    max_captured_errors: usize,
    running_scene: Option<String>,
    pending_events: Vec<HostEvent>,
}

impl EditorWorkspace {
    /// Creates a workspace rooted at `project_root`, creating the directory
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the project root cannot be
    /// created.
    pub fn new(project_root: impl Into<PathBuf>) -> std::io::Result<Self> {
        Self::with_error_cap(project_root, DEFAULT_MAX_CAPTURED_ERRORS)
    }

    /// Creates a workspace with a custom captured-error cap.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the project root cannot be
    /// created.
    pub fn with_error_cap(
        project_root: impl Into<PathBuf>,
        max_captured_errors: usize,
    ) -> std::io::Result<Self> {
        let project_root = project_root.into();
        std::fs::create_dir_all(&project_root)?;
        Ok(Self {
            project_root,
            scene: None,
            input_actions: BTreeMap::new(),
            signal_connections: Vec::new(),
            plan: None,
            captured_errors: VecDeque::new(),
            max_captured_errors,
            running_scene: None,
            pending_events: Vec::new(),
        })
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn queue_event(&mut self, name: &str, data: Value) {
        self.pending_events.push(HostEvent::new(name, data));
    }

    // ── Scene tree ────────────────────────────────────────────────────────────

    /// Replaces the edited scene with a fresh one whose root is named after
    /// the scene file stem.
    pub fn create_scene(&mut self, path: &str, root_type: &str) -> Result<(), String> {
        if path.is_empty() {
            return Err("scene path must not be empty".to_string());
        }
        let root_name = Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Root")
            .to_string();
        self.scene = Some(Scene {
            path: path.to_string(),
            root: SceneNode::new(root_name, root_type),
        });
        let data = json!({
            "path": path,
            "root_type": root_type,
        });
        self.queue_event("scene_changed", data);
        info!(path, root_type, "created scene");
        Ok(())
    }

    pub fn scene_path(&self) -> Option<&str> {
        self.scene.as_ref().map(|s| s.path.as_str())
    }

    /// Serializes the scene tree down to `max_depth` levels.
    pub fn scene_tree(&self, max_depth: i64) -> Result<Value, String> {
        let scene = self.scene.as_ref().ok_or("no scene is open")?;
        Ok(json!({
            "path": scene.path,
            "root": scene.root.to_tree_value(max_depth.max(0)),
        }))
    }

    fn root_mut(&mut self) -> Result<&mut SceneNode, String> {
        self.scene
            .as_mut()
            .map(|s| &mut s.root)
            .ok_or_else(|| "no scene is open".to_string())
    }

    /// Resolves a `/`-separated node path.  Empty, `/` and `.` address the
    /// scene root.
    pub fn find_node(&self, path: &str) -> Result<&SceneNode, String> {
        let scene = self.scene.as_ref().ok_or("no scene is open")?;
        let mut node = &scene.root;
        for segment in node_path_segments(path) {
            node = node
                .children
                .iter()
                .find(|c| c.name == segment)
                .ok_or_else(|| format!("node not found: {path}"))?;
        }
        Ok(node)
    }

    fn find_node_mut(&mut self, path: &str) -> Result<&mut SceneNode, String> {
        let scene = self.scene.as_mut().ok_or("no scene is open")?;
        let mut node = &mut scene.root;
        for segment in node_path_segments(path) {
            node = node
                .children
                .iter_mut()
                .find(|c| c.name == segment)
                .ok_or_else(|| format!("node not found: {path}"))?;
        }
        Ok(node)
    }

    /// Adds a child under `parent` and returns the new node's path.
    /// A sibling name collision gets a numeric suffix, the way the editor
    /// deduplicates node names.
    pub fn add_node(
        &mut self,
        parent: &str,
        node_type: &str,
        name: &str,
    ) -> Result<String, String> {
        let parent_node = self.find_node_mut(parent)?;
        let mut unique = name.to_string();
        let mut counter = 2;
        while parent_node.children.iter().any(|c| c.name == unique) {
            unique = format!("{name}{counter}");
            counter += 1;
        }
        parent_node
            .children
            .push(SceneNode::new(unique.clone(), node_type));
        let path = join_node_path(parent, &unique);
        info!(%path, node_type, "added node");
        Ok(path)
    }

    /// Removes the node at `path`.  The scene root cannot be removed.
    pub fn remove_node(&mut self, path: &str) -> Result<(), String> {
        let segments = node_path_segments(path);
        let Some((leaf, parent_segments)) = segments.split_last() else {
            return Err("cannot remove the scene root".to_string());
        };
        let parent = self.find_node_mut(&parent_segments.join("/"))?;
        let before = parent.children.len();
        parent.children.retain(|c| c.name != *leaf);
        if parent.children.len() == before {
            return Err(format!("node not found: {path}"));
        }
        Ok(())
    }

    /// Renames the node at `path`.
    pub fn rename_node(&mut self, path: &str, new_name: &str) -> Result<(), String> {
        if new_name.is_empty() {
            return Err("new_name must not be empty".to_string());
        }
        if new_name.contains('/') {
            return Err("node names must not contain '/'".to_string());
        }
        let node = self.find_node_mut(path)?;
        node.name = new_name.to_string();
        Ok(())
    }

    /// Structured description of one node: type, property bag, child names.
    pub fn node_info(&self, path: &str) -> Result<Value, String> {
        let node = self.find_node(path)?;
        Ok(json!({
            "name": node.name,
            "type": node.node_type,
            "properties": node.properties,
            "children": node.children.iter().map(|c| c.name.clone()).collect::<Vec<_>>(),
        }))
    }

    pub fn set_property(&mut self, path: &str, property: &str, value: Value) -> Result<(), String> {
        if property.is_empty() {
            return Err("property name must not be empty".to_string());
        }
        let node = self.find_node_mut(path)?;
        node.properties.insert(property.to_string(), value);
        Ok(())
    }

    pub fn get_property(&self, path: &str, property: &str) -> Result<Value, String> {
        let node = self.find_node(path)?;
        node.properties
            .get(property)
            .cloned()
            .ok_or_else(|| format!("property not set: {property}"))
    }

    /// Writes the full scene tree (properties included) to a project file.
    pub fn save_scene(&mut self, path: &str) -> Result<String, String> {
        let target = if path.is_empty() {
            self.scene_path().unwrap_or_default().to_string()
        } else {
            path.to_string()
        };
        let scene = self.scene.as_ref().ok_or("no scene is open")?;
        let document = json!({
            "scene": target,
            "root": scene.root.to_scene_file_value(),
        });
        let pretty =
            serde_json::to_string_pretty(&document).map_err(|e| format!("serialize scene: {e}"))?;
        self.write_file(&target, &pretty)?;
        Ok(target)
    }

    // ── Game control ──────────────────────────────────────────────────────────

    /// Marks the game as running.  Empty `scene` means the currently edited
    /// scene.
    pub fn run_game(&mut self, scene: &str) -> Result<String, String> {
        if self.running_scene.is_some() {
            return Err("game is already running".to_string());
        }
        let target = if scene.is_empty() {
            self.scene_path().ok_or("no scene to run")?.to_string()
        } else {
            scene.to_string()
        };
        self.running_scene = Some(target.clone());
        info!(scene = %target, "game started");
        Ok(target)
    }

    pub fn stop_game(&mut self) -> Option<String> {
        let stopped = self.running_scene.take();
        if let Some(scene) = &stopped {
            info!(%scene, "game stopped");
        }
        stopped
    }

    pub fn is_game_running(&self) -> bool {
        self.running_scene.is_some()
    }

    // ── Project filesystem ────────────────────────────────────────────────────

    /// Maps a project-relative path (optionally `res://`-prefixed) onto the
    /// project root, rejecting escapes.
    fn resolve(&self, path: &str) -> Result<PathBuf, String> {
        let trimmed = path.strip_prefix("res://").unwrap_or(path);
        let rel = Path::new(trimmed);
        if rel.is_absolute() {
            return Err(format!("absolute paths are not allowed: {path}"));
        }
        for component in rel.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => return Err(format!("path escapes the project root: {path}")),
            }
        }
        Ok(self.project_root.join(rel))
    }

    /// Writes `content` to a project file, creating parent directories.
    pub fn write_file(&self, path: &str, content: &str) -> Result<(), String> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).map_err(|e| format!("create {path}: {e}"))?;
        }
        std::fs::write(&full, content).map_err(|e| format!("write {path}: {e}"))
    }

    pub fn read_file(&self, path: &str) -> Result<String, String> {
        let full = self.resolve(path)?;
        std::fs::read_to_string(&full).map_err(|e| format!("read {path}: {e}"))
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.exists()).unwrap_or(false)
    }

    pub fn create_folder(&self, path: &str) -> Result<(), String> {
        let full = self.resolve(path)?;
        std::fs::create_dir_all(&full).map_err(|e| format!("create folder {path}: {e}"))
    }

    pub fn delete_file(&self, path: &str) -> Result<(), String> {
        let full = self.resolve(path)?;
        if full.is_dir() {
            std::fs::remove_dir_all(&full).map_err(|e| format!("delete {path}: {e}"))
        } else {
            std::fs::remove_file(&full).map_err(|e| format!("delete {path}: {e}"))
        }
    }

    /// Lists project-relative file paths under `path`, sorted.
    pub fn list_files(&self, path: &str, recursive: bool) -> Result<Vec<String>, String> {
        let full = self.resolve(path)?;
        let mut files = Vec::new();
        collect_files(&full, &self.project_root, recursive, &mut files)
            .map_err(|e| format!("list {path}: {e}"))?;
        files.sort();
        Ok(files)
    }

    // ── Input actions and signals ─────────────────────────────────────────────

    /// Registers an input action, returning whether it replaced an existing
    /// binding.
    pub fn add_input_action(&mut self, action: &str, key: &str) -> Result<bool, String> {
        if action.is_empty() {
            return Err("action name must not be empty".to_string());
        }
        Ok(self
            .input_actions
            .insert(action.to_string(), key.to_string())
            .is_some())
    }

    pub fn remove_input_action(&mut self, action: &str) -> Result<(), String> {
        self.input_actions
            .remove(action)
            .map(|_| ())
            .ok_or_else(|| format!("input action not found: {action}"))
    }

    pub fn input_actions(&self) -> &BTreeMap<String, String> {
        &self.input_actions
    }

    /// Records a signal connection after verifying both endpoints exist.
    pub fn connect_signal(
        &mut self,
        source: &str,
        signal: &str,
        target: &str,
        method: &str,
    ) -> Result<(), String> {
        if signal.is_empty() || method.is_empty() {
            return Err("signal and method must not be empty".to_string());
        }
        self.find_node(source)?;
        self.find_node(target)?;
        let connection = SignalConnection {
            source: source.to_string(),
            signal: signal.to_string(),
            target: target.to_string(),
            method: method.to_string(),
        };
        if self.signal_connections.contains(&connection) {
            return Err(format!("signal already connected: {signal}"));
        }
        self.signal_connections.push(connection);
        Ok(())
    }

    /// Connections originating from the node at `path`.
    pub fn signals_for(&self, path: &str) -> Result<Vec<&SignalConnection>, String> {
        self.find_node(path)?;
        Ok(self
            .signal_connections
            .iter()
            .filter(|c| c.source == path)
            .collect())
    }

    // ── Task plan and diff log ────────────────────────────────────────────────

    /// Replaces the current plan.  Steps may arrive as plain strings or as
    /// objects with a `description` field; everything else about a step
    /// object is carried through untouched.
    pub fn set_plan(&mut self, name: &str, raw_steps: &[Value]) -> Value {
        let steps = raw_steps
            .iter()
            .map(|raw| {
                let mut step = match raw {
                    Value::Object(map) => map.clone(),
                    other => {
                        let mut map = Map::new();
                        map.insert("description".into(), other.clone());
                        map
                    }
                };
                step.entry("status".to_string())
                    .or_insert(Value::String("pending".into()));
                step
            })
            .collect();
        let plan = Plan {
            name: name.to_string(),
            steps,
            current_step: 0,
        };
        let value = plan.to_value();
        self.plan = Some(plan);
        self.queue_event("plan_updated", value.clone());
        value
    }

    /// Updates one step's status.  Completing the current step advances
    /// `current_step`.
    pub fn update_plan_step(&mut self, step_index: i64, status: &str) -> Result<Value, String> {
        let plan = self
            .plan
            .as_mut()
            .ok_or("No active plan. Call set_current_plan first.")?;
        let index = usize::try_from(step_index)
            .ok()
            .filter(|i| *i < plan.steps.len())
            .ok_or_else(|| format!("Invalid step index: {step_index}"))?;

        plan.steps[index].insert("status".into(), Value::String(status.to_string()));
        if status == "completed" && index == plan.current_step {
            plan.current_step = index + 1;
        }
        let value = plan.to_value();
        self.queue_event("plan_updated", value.clone());
        Ok(value)
    }

    pub fn plan_value(&self) -> Option<Value> {
        self.plan.as_ref().map(Plan::to_value)
    }

    /// Appends a diff log entry and returns it.
    pub fn add_diff_entry(&mut self, file: &str, status: &str) -> Value {
        let entry = json!({
            "file": file,
            "status": status,
            "timestamp": unix_millis(),
        });
        self.queue_event("diff_entry_added", entry.clone());
        entry
    }

    pub fn clear_diff_entries(&mut self) {
        self.queue_event("diff_entries_cleared", json!({}));
    }

    // ── Captured runtime errors ───────────────────────────────────────────────

    /// Records a runtime error, evicting the oldest entry past the cap, and
    /// queues a `runtime_error` broadcast.
    pub fn record_runtime_error(&mut self, message: &str, file: &str, line: i64) {
        let error = json!({
            "type": "error",
            "message": message,
            "file": file,
            "line": line,
            "timestamp": unix_millis(),
        });
        if self.captured_errors.len() >= self.max_captured_errors {
            self.captured_errors.pop_front();
        }
        self.captured_errors
            .push_back(error.as_object().cloned().unwrap_or_default());
        self.queue_event("runtime_error", error);
    }

    pub fn captured_errors(&self) -> Vec<Value> {
        self.captured_errors
            .iter()
            .map(|e| Value::Object(e.clone()))
            .collect()
    }

    /// Clears the error ring, returning how many entries were dropped.
    pub fn clear_runtime_errors(&mut self) -> usize {
        let count = self.captured_errors.len();
        self.captured_errors.clear();
        count
    }
}

impl BridgeHost for EditorWorkspace {
    fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Splits a node path into segments.  `""`, `"/"` and `"."` yield no
/// segments (the scene root).
fn node_path_segments(path: &str) -> Vec<&str> {
    if path.is_empty() || path == "/" || path == "." {
        return Vec::new();
    }
    path.trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

fn join_node_path(parent: &str, name: &str) -> String {
    let segments = node_path_segments(parent);
    if segments.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", segments.join("/"), name)
    }
}

fn collect_files(
    dir: &Path,
    root: &Path,
    recursive: bool,
    out: &mut Vec<String>,
) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            if recursive {
                collect_files(&path, root, true, out)?;
            }
        } else {
            let rel = path.strip_prefix(root).unwrap_or(&path);
            out.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
    Ok(())
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> (EditorWorkspace, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let ws = EditorWorkspace::new(dir.path().join("project")).expect("workspace");
        (ws, dir)
    }

    fn workspace_with_scene() -> (EditorWorkspace, tempfile::TempDir) {
        let (mut ws, dir) = workspace();
        ws.create_scene("res://main.tscn", "Node2D").expect("scene");
        (ws, dir)
    }

    #[test]
    fn create_scene_names_root_after_file_stem() {
        let (ws, _dir) = workspace_with_scene();
        let root = ws.find_node("").expect("root");
        assert_eq!(root.name, "main");
        assert_eq!(root.node_type, "Node2D");
    }

    #[test]
    fn root_aliases_resolve_to_root() {
        let (ws, _dir) = workspace_with_scene();
        for alias in ["", "/", "."] {
            assert_eq!(ws.find_node(alias).expect("root").name, "main");
        }
    }

    #[test]
    fn add_find_remove_node() {
        let (mut ws, _dir) = workspace_with_scene();
        let path = ws.add_node("", "CharacterBody2D", "Player").expect("add");
        assert_eq!(path, "Player");
        let sprite = ws.add_node("Player", "Sprite2D", "Sprite").expect("add");
        assert_eq!(sprite, "Player/Sprite");

        assert_eq!(ws.find_node("Player/Sprite").expect("find").node_type, "Sprite2D");

        ws.remove_node("Player/Sprite").expect("remove");
        assert!(ws.find_node("Player/Sprite").is_err());
    }

    #[test]
    fn add_node_deduplicates_sibling_names() {
        let (mut ws, _dir) = workspace_with_scene();
        assert_eq!(ws.add_node("", "Node", "Enemy").expect("add"), "Enemy");
        assert_eq!(ws.add_node("", "Node", "Enemy").expect("add"), "Enemy2");
        assert_eq!(ws.add_node("", "Node", "Enemy").expect("add"), "Enemy3");
    }

    #[test]
    fn scene_root_cannot_be_removed() {
        let (mut ws, _dir) = workspace_with_scene();
        assert!(ws.remove_node("").is_err());
        assert!(ws.remove_node("/").is_err());
    }

    #[test]
    fn rename_rejects_slash_and_empty() {
        let (mut ws, _dir) = workspace_with_scene();
        ws.add_node("", "Node", "Old").expect("add");
        assert!(ws.rename_node("Old", "").is_err());
        assert!(ws.rename_node("Old", "a/b").is_err());
        ws.rename_node("Old", "New").expect("rename");
        assert!(ws.find_node("New").is_ok());
    }

    #[test]
    fn properties_roundtrip() {
        let (mut ws, _dir) = workspace_with_scene();
        ws.add_node("", "Sprite2D", "Icon").expect("add");
        ws.set_property("Icon", "position", json!({"x": 10, "y": 20}))
            .expect("set");
        assert_eq!(
            ws.get_property("Icon", "position").expect("get"),
            json!({"x": 10, "y": 20})
        );
        assert!(ws.get_property("Icon", "missing").is_err());
    }

    #[test]
    fn scene_tree_respects_max_depth() {
        let (mut ws, _dir) = workspace_with_scene();
        ws.add_node("", "Node", "A").expect("add");
        ws.add_node("A", "Node", "B").expect("add");

        let deep = ws.scene_tree(5).expect("tree");
        assert_eq!(deep["root"]["children"][0]["children"][0]["name"], "B");

        let shallow = ws.scene_tree(0).expect("tree");
        assert_eq!(shallow["root"]["children_truncated"], true);
    }

    #[test]
    fn no_scene_is_an_error() {
        let (ws, _dir) = workspace();
        assert!(ws.scene_tree(5).is_err());
        assert!(ws.find_node("").is_err());
    }

    #[test]
    fn save_scene_writes_project_file() {
        let (mut ws, _dir) = workspace_with_scene();
        ws.add_node("", "Node", "Child").expect("add");
        let saved = ws.save_scene("").expect("save");
        assert_eq!(saved, "res://main.tscn");

        let content = ws.read_file("main.tscn").expect("read back");
        let doc: Value = serde_json::from_str(&content).expect("valid JSON scene file");
        assert_eq!(doc["root"]["children"][0]["name"], "Child");
    }

    #[test]
    fn file_paths_are_confined_to_project_root() {
        let (ws, _dir) = workspace();
        assert!(ws.write_file("../outside.txt", "x").is_err());
        assert!(ws.write_file("/etc/passwd", "x").is_err());
        assert!(ws.read_file("a/../../b").is_err());
    }

    #[test]
    fn res_prefix_is_stripped() {
        let (ws, _dir) = workspace();
        ws.write_file("res://scripts/player.gd", "extends Node\n")
            .expect("write");
        assert_eq!(
            ws.read_file("scripts/player.gd").expect("read"),
            "extends Node\n"
        );
    }

    #[test]
    fn list_files_sorted_and_optionally_recursive() {
        let (ws, _dir) = workspace();
        ws.write_file("b.txt", "").expect("write");
        ws.write_file("a.txt", "").expect("write");
        ws.write_file("sub/c.txt", "").expect("write");

        let flat = ws.list_files("", false).expect("list");
        assert_eq!(flat, vec!["a.txt", "b.txt"]);

        let all = ws.list_files("", true).expect("list");
        assert_eq!(all, vec!["a.txt", "b.txt", "sub/c.txt"]);
    }

    #[test]
    fn delete_file_and_folder() {
        let (ws, _dir) = workspace();
        ws.write_file("dir/file.txt", "x").expect("write");
        ws.delete_file("dir/file.txt").expect("delete file");
        assert!(!ws.file_exists("dir/file.txt"));
        ws.delete_file("dir").expect("delete folder");
        assert!(!ws.file_exists("dir"));
    }

    #[test]
    fn input_actions_lifecycle() {
        let (mut ws, _dir) = workspace();
        assert!(!ws.add_input_action("jump", "Space").expect("add"));
        assert!(ws.add_input_action("jump", "W").expect("replace"));
        assert_eq!(ws.input_actions().get("jump").map(String::as_str), Some("W"));
        ws.remove_input_action("jump").expect("remove");
        assert!(ws.remove_input_action("jump").is_err());
    }

    #[test]
    fn signal_connections_validate_endpoints() {
        let (mut ws, _dir) = workspace_with_scene();
        ws.add_node("", "Button", "Start").expect("add");
        ws.connect_signal("Start", "pressed", "", "on_start")
            .expect("connect");
        assert!(
            ws.connect_signal("Start", "pressed", "", "on_start").is_err(),
            "duplicate connection rejected"
        );
        assert!(ws.connect_signal("Ghost", "pressed", "", "x").is_err());
        assert_eq!(ws.signals_for("Start").expect("list").len(), 1);
    }

    #[test]
    fn plan_lifecycle_advances_current_step() {
        let (mut ws, _dir) = workspace();
        let plan = ws.set_plan("build level", &[json!("layout"), json!({"description": "paint"})]);
        assert_eq!(plan["current_step"], 0);
        assert_eq!(plan["steps"][0]["status"], "pending");

        let updated = ws.update_plan_step(0, "completed").expect("update");
        assert_eq!(updated["current_step"], 1);
        assert_eq!(updated["steps"][0]["status"], "completed");

        // Completing a non-current step does not advance the pointer.
        let (mut ws2, _dir2) = workspace();
        ws2.set_plan("p", &[json!("a"), json!("b"), json!("c")]);
        let v = ws2.update_plan_step(2, "completed").expect("update");
        assert_eq!(v["current_step"], 0);

        assert!(ws.update_plan_step(5, "completed").is_err());
    }

    #[test]
    fn plan_and_diff_queue_broadcast_events() {
        let (mut ws, _dir) = workspace();
        ws.set_plan("p", &[json!("a")]);
        ws.add_diff_entry("res://player.gd", "modified");
        ws.clear_diff_entries();

        let events: Vec<String> = ws.drain_events().into_iter().map(|e| e.name).collect();
        assert_eq!(
            events,
            vec!["plan_updated", "diff_entry_added", "diff_entries_cleared"]
        );
        assert!(ws.drain_events().is_empty(), "drain consumes the queue");
    }

    #[test]
    fn runtime_error_ring_is_capped() {
        let mut ws =
            EditorWorkspace::with_error_cap(tempfile::tempdir().expect("dir").path().join("p"), 3)
                .expect("workspace");
        for i in 0..5 {
            ws.record_runtime_error(&format!("boom {i}"), "res://player.gd", i);
        }
        let errors = ws.captured_errors();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0]["message"], "boom 2", "oldest entries evicted");

        assert_eq!(ws.clear_runtime_errors(), 3);
        assert!(ws.captured_errors().is_empty());
    }

    #[test]
    fn game_run_stop() {
        let (mut ws, _dir) = workspace_with_scene();
        let scene = ws.run_game("").expect("run");
        assert_eq!(scene, "res://main.tscn");
        assert!(ws.is_game_running());
        assert!(ws.run_game("other.tscn").is_err(), "already running");
        assert_eq!(ws.stop_game().as_deref(), Some("res://main.tscn"));
        assert!(!ws.is_game_running());
    }
}
