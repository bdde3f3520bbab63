//! Source of the "current label" applied to newly completed annotations.

use std::{cell::RefCell, rc::Rc};

/// Supplies the label currently chosen by the user.
pub trait LabelProvider {
    /// The current label; empty when none is chosen.
    fn current_label(&self) -> String;
}

/// A fixed label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticLabel(pub String);

impl LabelProvider for StaticLabel {
    fn current_label(&self) -> String {
        self.0.clone()
    }
}

/// A label the host can change between render passes. Clones share the value.
#[derive(Debug, Clone, Default)]
pub struct SharedLabel {
    label: Rc<RefCell<String>>,
}

impl SharedLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Rc::new(RefCell::new(label.into())),
        }
    }

    pub fn set(&self, label: impl Into<String>) {
        *self.label.borrow_mut() = label.into();
    }
}

impl LabelProvider for SharedLabel {
    fn current_label(&self) -> String {
        self.label.borrow().clone()
    }
}
