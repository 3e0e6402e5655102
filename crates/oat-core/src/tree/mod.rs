mod action;
mod node;
mod schema;

pub use action::{Action, RequestDefaults};
pub use node::{MethodEntry, PathNode, Route};
pub use schema::{DRAFT_07, ObjectSchema, RequestSchemas, ValidationSchema};

use serde::Serialize;

/// The normalized result handed to a route-tree executor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiTreeSchema {
    /// Origin every path template is appended to.
    pub base: String,
    pub tree: PathNode,
}

impl ApiTreeSchema {
    /// Every action in the tree, depth first, overloads in declaration order.
    pub fn routes(&self) -> Vec<Route<'_>> {
        let mut routes = Vec::new();
        self.tree.collect_routes(&mut routes);
        routes
    }

    pub fn operation_count(&self) -> usize {
        self.routes().len()
    }
}
