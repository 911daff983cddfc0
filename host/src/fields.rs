//! Registration handles for dynamically contributed fields.
//!
//! A [`FieldScope`] is what a nested component receives when it wants to add
//! fields to the enclosing tool. It holds only a weak reference to the tool's
//! registration table, remembers which names it registered, and unregisters
//! all of them when dropped, so a torn-down component never leaves fields
//! behind.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};

use tool_schema_core::{FieldDefinition, FieldRegistry};
use tracing::warn;

/// Handle for registering fields into one tool's table.
///
/// Obtained from [`ToolScope::field_scope`](crate::ToolScope::field_scope).
/// When two handles register the same name, the later registration replaces
/// the earlier one, and whichever handle drops first removes it.
///
/// # Examples
///
/// ```
/// use tool_schema_core::FieldDefinition;
/// use tool_schema_host::{ToolDefinition, ToolScope};
///
/// let scope = ToolScope::new(ToolDefinition::new("search", "Search", |v| Ok(v)));
/// {
///     let mut fields = scope.field_scope();
///     fields.register(FieldDefinition::new("query").required(true));
///     assert_eq!(scope.registered_names(), vec!["query"]);
/// }
/// // Dropping the handle unregistered its fields.
/// assert!(scope.registered_names().is_empty());
/// ```
#[derive(Debug)]
pub struct FieldScope {
    registry: Weak<RefCell<FieldRegistry>>,
    owned: BTreeSet<String>,
}

impl FieldScope {
    pub(crate) fn new(registry: &Rc<RefCell<FieldRegistry>>) -> Self {
        Self {
            registry: Rc::downgrade(registry),
            owned: BTreeSet::new(),
        }
    }

    /// Registers (or replaces) a field in the tool's table.
    ///
    /// If the tool no longer exists, a warning is logged and nothing
    /// happens.
    pub fn register(&mut self, field: FieldDefinition) {
        let Some(registry) = self.registry.upgrade() else {
            warn!(field = %field.name, "Field registered outside of a live tool scope; ignoring");
            return;
        };

        let name = field.name.clone();
        let mut registry = registry.borrow_mut();
        registry.register(field);
        if registry.contains(&name) {
            self.owned.insert(name);
        }
    }

    /// Unregisters a field. Names never registered are ignored.
    pub fn unregister(&mut self, name: &str) {
        self.owned.remove(name);
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().unregister(name);
        }
    }

    /// Names registered through this handle and not yet unregistered.
    pub fn owned_names(&self) -> Vec<&str> {
        self.owned.iter().map(String::as_str).collect()
    }

    /// Returns `true` while the owning tool is alive.
    pub fn is_attached(&self) -> bool {
        self.registry.strong_count() > 0
    }
}

impl Drop for FieldScope {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = registry.borrow_mut();
        for name in &self.owned {
            registry.unregister(name);
        }
    }
}
