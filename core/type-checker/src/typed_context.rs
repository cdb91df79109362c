//! Typed Context
//!
//! [`TypedContext`] is the central data structure handed from the type
//! checker to the layout pass and the Wasm emitter. It wraps the AST
//! [`Arena`] and a dense node-id → [`TypeInfo`] table; every
//! expression-bearing node that influences code generation has an entry, so
//! downstream passes never re-derive types.

use std::rc::Rc;

use crate::{symbol_table::SymbolTable, type_info::TypeInfo};
use mood_ast::{
    arena::Arena,
    nodes::{AstNode, Expression, FunctionDeclaration, Location, Program},
};
use rustc_hash::FxHashMap;

#[derive(Default, Debug)]
pub struct TypedContext {
    pub(crate) symbol_table: SymbolTable,
    node_types: FxHashMap<u32, TypeInfo>,
    arena: Arena,
}

impl TypedContext {
    pub(crate) fn new(arena: Arena) -> Self {
        Self {
            symbol_table: SymbolTable::default(),
            node_types: FxHashMap::default(),
            arena,
        }
    }

    #[must_use = "returns the program root without side effects"]
    pub fn program(&self) -> Option<Rc<Program>> {
        self.arena.program()
    }

    #[must_use = "returns function declarations without side effects"]
    pub fn functions(&self) -> Vec<Rc<FunctionDeclaration>> {
        self.arena.functions()
    }

    #[must_use = "returns filtered nodes without side effects"]
    pub fn filter_nodes<T: Fn(&AstNode) -> bool>(&self, fn_predicate: T) -> Vec<AstNode> {
        self.arena.filter_nodes(fn_predicate)
    }

    #[must_use = "this is a pure lookup with no side effects"]
    pub fn get_node_typeinfo(&self, node_id: u32) -> Option<TypeInfo> {
        self.node_types.get(&node_id).cloned()
    }

    #[must_use = "this is a pure lookup with no side effects"]
    pub fn get_parent_node(&self, id: u32) -> Option<AstNode> {
        self.arena
            .find_parent_node(id)
            .and_then(|parent_id| self.arena.find_node(parent_id))
    }

    pub(crate) fn set_node_typeinfo(&mut self, node_id: u32, type_info: TypeInfo) {
        self.node_types.insert(node_id, type_info);
    }

    /// Verifies that every `Expression` node in the arena has a type entry.
    ///
    /// Returns the expressions missing from the table; an empty list means
    /// the type checker upheld its contract.
    #[must_use = "returns list of missing expression types for verification"]
    #[track_caller]
    pub fn find_untyped_expressions(&self) -> Vec<MissingExpressionType> {
        self.arena
            .filter_nodes(|node| matches!(node, AstNode::Expression(_)))
            .into_iter()
            .filter_map(|node| {
                if let AstNode::Expression(expr) = &node {
                    let id = expr.id();
                    if !self.node_types.contains_key(&id) {
                        return Some(MissingExpressionType {
                            id,
                            kind: Self::expression_kind_name(expr),
                            location: expr.location(),
                        });
                    }
                }
                None
            })
            .collect()
    }

    fn expression_kind_name(expr: &Expression) -> String {
        match expr {
            Expression::Identifier(_) => "Identifier",
            Expression::Literal(_) => "Literal",
            Expression::Binary(_) => "Binary",
            Expression::Call(_) => "Call",
            Expression::Path(_) => "Path",
            Expression::Block(_) => "Block",
            Expression::VariableDeclaration(_) => "VariableDeclaration",
            Expression::StructConstruction(_) => "StructConstruction",
            Expression::Member(_) => "Member",
        }
        .to_string()
    }
}

/// Information about an expression missing its type after type checking.
#[derive(Debug)]
pub struct MissingExpressionType {
    pub id: u32,
    pub kind: String,
    pub location: Location,
}
