//! Symbol Table
//!
//! A tree of scopes threaded through type checking. `define` writes into the
//! current scope only; `lookup` walks the parent chain, so inner scopes
//! shadow outer ones. The root scope pre-defines the builtin names `i32`,
//! `f64`, `bool` (type names) and `true`, `false` (boolean values).
//!
//! Types, functions, and variables share one namespace, mapping a name to its
//! [`TypeInfo`].

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::type_info::TypeInfo;

pub(crate) type ScopeRef = Rc<RefCell<Scope>>;

#[derive(Debug)]
pub(crate) struct Scope {
    pub(crate) parent: Option<ScopeRef>,
    pub(crate) children: Vec<ScopeRef>,
    pub(crate) symbols: FxHashMap<String, TypeInfo>,
}

impl Scope {
    #[must_use = "scope constructor returns a new scope that should be used"]
    pub(crate) fn new(parent: Option<ScopeRef>) -> ScopeRef {
        Rc::new(RefCell::new(Self {
            parent,
            children: Vec::new(),
            symbols: FxHashMap::default(),
        }))
    }

    #[must_use = "this is a pure lookup with no side effects"]
    pub(crate) fn lookup(&self, name: &str) -> Option<TypeInfo> {
        if let Some(symbol) = self.symbols.get(name) {
            return Some(symbol.clone());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow().lookup(name);
        }
        None
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SymbolTable {
    current_scope: ScopeRef,
}

impl Default for SymbolTable {
    fn default() -> Self {
        let root = Scope::new(None);
        {
            let mut scope = root.borrow_mut();
            scope.symbols.insert("i32".to_string(), TypeInfo::I32);
            scope.symbols.insert("f64".to_string(), TypeInfo::F64);
            scope.symbols.insert("bool".to_string(), TypeInfo::Bool);
            scope.symbols.insert("true".to_string(), TypeInfo::Bool);
            scope.symbols.insert("false".to_string(), TypeInfo::Bool);
        }
        SymbolTable {
            current_scope: root,
        }
    }
}

impl SymbolTable {
    /// Binds `name` in the current scope, shadowing any outer binding.
    pub(crate) fn define(&mut self, name: &str, ty: TypeInfo) {
        self.current_scope
            .borrow_mut()
            .symbols
            .insert(name.to_string(), ty);
    }

    #[must_use = "this is a pure lookup with no side effects"]
    pub(crate) fn lookup(&self, name: &str) -> Option<TypeInfo> {
        self.current_scope.borrow().lookup(name)
    }

    /// Opens a child of the current scope and makes it current.
    pub(crate) fn enter_scope(&mut self) {
        let child = Scope::new(Some(self.current_scope.clone()));
        self.current_scope.borrow_mut().children.push(child.clone());
        self.current_scope = child;
    }

    /// Returns to the parent scope.
    ///
    /// # Panics
    ///
    /// Panics when called on the root scope; scope enter/exit calls must be
    /// balanced.
    pub(crate) fn exit_scope(&mut self) {
        let parent = self
            .current_scope
            .borrow()
            .parent
            .clone()
            .expect("cannot exit the root scope");
        self.current_scope = parent;
    }
}
