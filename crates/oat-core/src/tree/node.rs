use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use super::action::Action;

/// A level of the route tree.
///
/// Literal path segments map to nested nodes, lowercase HTTP methods map to
/// the endpoints declared for the path ending at this node. Both share one
/// JSON object when serialized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathNode {
    children: IndexMap<String, PathNode>,
    methods: IndexMap<String, MethodEntry>,
}

impl PathNode {
    pub fn child(&self, segment: &str) -> Option<&PathNode> {
        self.children.get(segment)
    }

    pub fn method(&self, method: &str) -> Option<&MethodEntry> {
        self.methods.get(method)
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &PathNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn methods(&self) -> impl Iterator<Item = (&str, &MethodEntry)> {
        self.methods.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.methods.is_empty()
    }

    /// Walk down `segments`, creating missing nodes on the way.
    pub fn ensure_path<'s>(&mut self, segments: impl IntoIterator<Item = &'s str>) -> &mut PathNode {
        segments.into_iter().fold(self, |node, segment| {
            node.children.entry(segment.to_string()).or_default()
        })
    }

    /// Add an endpoint under `method` (lowercase). A second endpoint for the
    /// same method turns the entry into an overload list in insertion order.
    pub fn insert_action(&mut self, method: &str, action: Action) {
        match self.methods.get_mut(method) {
            Some(entry) => {
                debug!(
                    "overloading {method} with {} (now {} actions)",
                    action.path_template,
                    entry.len() + 1
                );
                entry.push(action);
            }
            None => {
                self.methods.insert(method.to_string(), MethodEntry::Single(action));
            }
        }
    }

    pub(super) fn collect_routes<'a>(&'a self, out: &mut Vec<Route<'a>>) {
        for (method, entry) in &self.methods {
            for action in entry.actions() {
                out.push(Route {
                    method: method.as_str(),
                    action,
                });
            }
        }
        for child in self.children.values() {
            child.collect_routes(out);
        }
    }
}

impl Serialize for PathNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (method, entry) in &self.methods {
            map.serialize_entry(method, entry)?;
        }
        for (segment, child) in &self.children {
            if self.methods.contains_key(segment) {
                warn!("path segment '{segment}' collides with a method of the same name, skipping it");
                continue;
            }
            map.serialize_entry(segment, child)?;
        }
        map.end()
    }
}

/// The endpoints registered for one path and method.
///
/// Serializes as a bare triplet for `Single` and as an array of triplets for
/// `Overloaded`; executors tell the two apart by whether the first element is
/// itself an array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MethodEntry {
    Single(Action),
    Overloaded(Vec<Action>),
}

impl MethodEntry {
    pub fn push(&mut self, action: Action) {
        let previous = std::mem::replace(self, MethodEntry::Overloaded(Vec::new()));
        *self = match previous {
            MethodEntry::Single(existing) => MethodEntry::Overloaded(vec![existing, action]),
            MethodEntry::Overloaded(mut actions) => {
                actions.push(action);
                MethodEntry::Overloaded(actions)
            }
        };
    }

    /// Actions in overload resolution order.
    pub fn actions(&self) -> &[Action] {
        match self {
            MethodEntry::Single(action) => std::slice::from_ref(action),
            MethodEntry::Overloaded(actions) => actions,
        }
    }

    pub fn len(&self) -> usize {
        self.actions().len()
    }

    pub fn is_overloaded(&self) -> bool {
        matches!(self, MethodEntry::Overloaded(_))
    }
}

/// A flattened view of one endpoint in the tree.
#[derive(Debug, Clone, Copy)]
pub struct Route<'a> {
    /// Lowercase method key the action is stored under.
    pub method: &'a str,
    pub action: &'a Action,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tree::RequestDefaults;

    fn action(template: &str) -> Action {
        Action {
            path_template: template.into(),
            defaults: RequestDefaults::new("get", None),
            schema: None,
        }
    }

    #[test]
    fn test_single_then_overloaded() {
        let mut root = PathNode::default();
        let leaf = root.ensure_path(["pets"]);
        leaf.insert_action("get", action("/pets"));
        assert!(!leaf.method("get").unwrap().is_overloaded());

        leaf.insert_action("get", action("/pets/:id"));
        leaf.insert_action("get", action("/pets/:id/owner"));

        let entry = root.child("pets").unwrap().method("get").unwrap();
        assert!(entry.is_overloaded());
        let templates: Vec<&str> = entry.actions().iter().map(|a| a.path_template.as_str()).collect();
        assert_eq!(templates, vec!["/pets", "/pets/:id", "/pets/:id/owner"]);
    }

    #[test]
    fn test_serialized_shape() {
        let mut root = PathNode::default();
        root.ensure_path(["pets"]).insert_action("get", action("/pets"));
        root.ensure_path(["pets"]).insert_action("get", action("/pets/:id"));
        root.ensure_path(["pets", "roles"]).insert_action("get", action("/pets/:id/roles"));

        assert_eq!(
            serde_json::to_value(&root).unwrap(),
            json!({
                "pets": {
                    "get": [
                        ["/pets", {"method": "GET"}],
                        ["/pets/:id", {"method": "GET"}]
                    ],
                    "roles": {
                        "get": ["/pets/:id/roles", {"method": "GET"}]
                    }
                }
            })
        );
    }

    #[test]
    fn test_empty_path_is_root() {
        let mut root = PathNode::default();
        root.ensure_path(std::iter::empty()).insert_action("get", action("/"));
        assert!(root.method("get").is_some());
        assert_eq!(root.children().count(), 0);
    }

    #[test]
    fn test_segment_named_like_a_method_is_not_serialized() {
        let mut root = PathNode::default();
        root.ensure_path(["a"]).insert_action("get", action("/a"));
        root.ensure_path(["a", "get"]).insert_action("get", action("/a/get"));
        root.ensure_path(["a", "get", "deeper"]).insert_action("get", action("/a/get/deeper"));

        assert_eq!(
            serde_json::to_value(&root).unwrap(),
            json!({"a": {"get": ["/a", {"method": "GET"}]}})
        );

        // Still reachable in memory.
        let a = root.child("a").unwrap();
        assert!(a.child("get").is_some());
        let mut routes = Vec::new();
        root.collect_routes(&mut routes);
        assert_eq!(routes.len(), 3);
    }

    #[test]
    fn test_routes_walk_depth_first() {
        let mut root = PathNode::default();
        root.ensure_path(["a", "b"]).insert_action("get", action("/a/b"));
        root.ensure_path(["a"]).insert_action("get", action("/a"));
        root.ensure_path(["a"]).insert_action("get", action("/a/:x"));

        let mut routes = Vec::new();
        root.collect_routes(&mut routes);
        let templates: Vec<&str> = routes.iter().map(|r| r.action.path_template.as_str()).collect();
        assert_eq!(templates, vec!["/a", "/a/:x", "/a/b"]);
    }
}
