use crate::nodes::{Ast, AstNode, Definition, FunctionDeclaration, Program};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Node storage for one compilation unit. Nodes are keyed by their dense,
/// parser-assigned ids; parent-child routes are tracked alongside so that
/// consumers can walk upwards without holding `Rc` edges.
#[derive(Default, Clone, Debug)]
pub struct Arena {
    pub(crate) nodes: FxHashMap<u32, AstNode>,
    pub(crate) node_routes: Vec<NodeRoute>,
}

impl Arena {
    /// The root `Program` node of the compilation unit.
    #[must_use]
    pub fn program(&self) -> Option<Rc<Program>> {
        self.nodes.values().find_map(|node| {
            if let AstNode::Ast(Ast::Program(program)) = node {
                Some(program.clone())
            } else {
                None
            }
        })
    }

    #[must_use]
    pub fn functions(&self) -> Vec<Rc<FunctionDeclaration>> {
        self.nodes
            .values()
            .filter_map(|node| {
                if let AstNode::Definition(Definition::Function(func)) = node {
                    Some(func.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Stores a node under its id and links it to `parent_id`'s route.
    ///
    /// # Panics
    ///
    /// Node ids start at 1 and are registered exactly once; an id of zero or
    /// a second registration of the same id panics.
    pub fn add_node(&mut self, node: AstNode, parent_id: u32) {
        let id = node.id();
        assert!(id != 0, "node id 0 is reserved for the root's parent");
        assert!(
            !self.nodes.contains_key(&id),
            "node id {id} was registered twice"
        );
        self.nodes.insert(id, node);
        self.add_route(
            NodeRoute {
                id,
                parent: Some(parent_id),
                children: vec![],
            },
            parent_id,
        );
    }

    #[must_use]
    pub fn find_node(&self, id: u32) -> Option<AstNode> {
        self.nodes.get(&id).cloned()
    }

    /// The id of the node's parent, if the node is registered.
    #[must_use]
    pub fn find_parent_node(&self, id: u32) -> Option<u32> {
        self.node_routes
            .iter()
            .find(|route| route.id == id)
            .and_then(|route| route.parent)
    }

    /// Every registered node the predicate accepts, in arbitrary order.
    pub fn filter_nodes<T: Fn(&AstNode) -> bool>(&self, predicate: T) -> Vec<AstNode> {
        self.nodes
            .values()
            .filter(|node| predicate(node))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn add_route(&mut self, route: NodeRoute, parent_id: u32) {
        if let Some(parent_route) = self.node_routes.iter_mut().find(|r| r.id == parent_id) {
            parent_route.children.push(route.id);
        }
        self.node_routes.push(route);
    }
}

/// One entry of the parent/child index kept beside the node map.
#[derive(Clone, Default, Debug)]
pub struct NodeRoute {
    pub id: u32,
    parent: Option<u32>,
    children: Vec<u32>,
}
