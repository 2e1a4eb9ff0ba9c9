use log::{debug, info, warn};

use super::{Task, TaskId, ValidationError};

/// In-memory, insertion-ordered collection of tasks.
///
/// The list is the only owner of its tasks: tasks are created by [`TaskList::add`],
/// flipped by [`TaskList::toggle_completion`] and removed by [`TaskList::delete`].
/// Ids are unique for the lifetime of the list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskList {
    items: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new incomplete task and returns its id.
    ///
    /// Fails with [`ValidationError::EmptyText`] when `text` is empty after trimming,
    /// leaving the list untouched. The stored text is kept as given.
    pub fn add(&mut self, text: impl Into<String>) -> Result<TaskId, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            warn!("event=task_add module=tasks status=error reason=empty_text");
            return Err(ValidationError::EmptyText);
        }
        let task = Task::new(text);
        let id = task.id;
        info!(
            "event=task_add module=tasks status=ok id={} text_len={} total={}",
            id,
            task.text().chars().count(),
            self.items.len() + 1
        );
        self.items.push(task);
        Ok(id)
    }

    /// Flips `completed` on the matching task. Unknown ids are ignored.
    pub fn toggle_completion(&mut self, id: TaskId) -> bool {
        match self.items.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.toggle();
                debug!(
                    "event=task_toggle module=tasks status=ok id={} completed={}",
                    id, task.completed
                );
                true
            }
            None => {
                debug!("event=task_toggle module=tasks status=noop id={}", id);
                false
            }
        }
    }

    /// Removes the matching task, keeping the order of the rest. Unknown ids are ignored.
    pub fn delete(&mut self, id: TaskId) -> bool {
        let before = self.items.len();
        self.items.retain(|task| task.id != id);
        let removed = self.items.len() != before;
        if removed {
            info!(
                "event=task_delete module=tasks status=ok id={} total={}",
                id,
                self.items.len()
            );
        } else {
            debug!("event=task_delete module=tasks status=noop id={}", id);
        }
        removed
    }

    /// Tasks to show, in insertion order. With `hide_completed` only incomplete ones.
    pub fn visible_list(&self, hide_completed: bool) -> Vec<&Task> {
        self.items
            .iter()
            .filter(|task| !(hide_completed && task.completed))
            .collect()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.items.iter().find(|task| task.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of tasks not yet completed.
    pub fn remaining(&self) -> usize {
        self.items.iter().filter(|task| !task.completed).count()
    }
}
