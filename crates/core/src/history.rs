//! Run history
//!
//! Names of the tasks whose actions ran, in the order they finished. Used for the
//! timing report and to collect deferred errors once the target is done.

#[derive(Debug, Default, Clone)]
pub struct RunHistory {
    order: Vec<String>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: impl Into<String>) {
        self.order.push(name.into());
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}
