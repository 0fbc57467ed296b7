//! Name -> task lookup

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::task::Task;

#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: HashMap<String, Task>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `task` under its name, replacing any task registered earlier with that name.
    pub fn register(&mut self, task: Task) -> &mut Task {
        match self.tasks.entry(task.name().to_string()) {
            Entry::Occupied(mut entry) => {
                entry.insert(task);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(task),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Task> {
        self.tasks.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Registered tasks in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }
}
