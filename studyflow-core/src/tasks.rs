//! The task list and its persistence contract.

use std::fmt;
use std::str::FromStr;

use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::store::{PersistenceStore, StorageBackend, StoreError};

/// Closed set of study subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Mathematics,
    Physics,
    Chemistry,
    Biology,
    English,
    History,
}

impl Subject {
    pub const ALL: [Subject; 6] = [
        Subject::Mathematics,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
        Subject::English,
        Subject::History,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Subject::Mathematics => "Mathematics",
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Biology => "Biology",
            Subject::English => "English",
            Subject::History => "History",
        }
    }

    /// Next subject in the selector cycle, wrapping at the end.
    pub fn next(self) -> Subject {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[error("unknown subject (expected one of: Mathematics, Physics, Chemistry, Biology, English, History)")]
pub struct ParseSubjectError;

impl FromStr for Subject {
    type Err = ParseSubjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .iter()
            .copied()
            .find(|subj| subj.as_str().eq_ignore_ascii_case(s))
            .ok_or(ParseSubjectError)
    }
}

/// A single study item.
///
/// `id` is the creation timestamp in milliseconds. Only `completed` is ever
/// mutated after creation; `status` and `deadline` keep their add-time
/// values until the record is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub subject: Subject,
    pub task: String,
    pub completed: bool,
    pub deadline: String,
    pub status: String,
}

/// Ordered task list, flushed whole to the `tasks` slot on every mutation.
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn load<B: StorageBackend>(store: &PersistenceStore<B>) -> Result<Self, StoreError> {
        Ok(Self {
            tasks: store.load_tasks()?,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Appends a new task. Empty or whitespace-only descriptions are
    /// rejected; returns whether a task was actually added.
    pub fn add<B: StorageBackend>(
        &mut self,
        subject: Subject,
        text: &str,
        store: &mut PersistenceStore<B>,
    ) -> Result<bool, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        let id = self.next_id();
        self.tasks.push(Task {
            id,
            subject,
            task: text.to_string(),
            completed: false,
            deadline: Local::now().format("%Y-%m-%d").to_string(),
            status: "in-progress".to_string(),
        });
        store.save_tasks(&self.tasks)?;
        debug!(id, %subject, "task added");
        Ok(true)
    }

    /// Flips completion on the matching task; no-op when the id is unknown.
    pub fn toggle<B: StorageBackend>(
        &mut self,
        id: i64,
        store: &mut PersistenceStore<B>,
    ) -> Result<bool, StoreError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.completed = !task.completed;
        store.save_tasks(&self.tasks)?;
        Ok(true)
    }

    /// Removes the matching task; no-op when the id is unknown.
    pub fn delete<B: StorageBackend>(
        &mut self,
        id: i64,
        store: &mut PersistenceStore<B>,
    ) -> Result<bool, StoreError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Ok(false);
        }
        store.save_tasks(&self.tasks)?;
        debug!(id, "task deleted");
        Ok(true)
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Task counts per subject, in `Subject::ALL` order, subjects with no
    /// tasks omitted.
    pub fn subject_breakdown(&self) -> Vec<(Subject, usize)> {
        Subject::ALL
            .iter()
            .filter_map(|&subject| {
                let count = self.tasks.iter().filter(|t| t.subject == subject).count();
                (count > 0).then_some((subject, count))
            })
            .collect()
    }

    // Creation-timestamp ids, bumped past the current max when the clock
    // hands out a duplicate within the same millisecond.
    fn next_id(&self) -> i64 {
        let now = Local::now().timestamp_millis();
        let max = self.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        now.max(max + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;

    fn fixture() -> (TaskStore, PersistenceStore<MemoryBackend>) {
        let store = PersistenceStore::new(MemoryBackend::default());
        let tasks = TaskStore::load(&store).unwrap();
        (tasks, store)
    }

    #[test]
    fn blank_add_is_a_no_op() {
        let (mut tasks, mut store) = fixture();
        assert!(!tasks.add(Subject::Mathematics, "", &mut store).unwrap());
        assert!(!tasks.add(Subject::Mathematics, "   ", &mut store).unwrap());
        assert!(tasks.is_empty());
        assert!(store.load_tasks().unwrap().is_empty());
    }

    #[test]
    fn add_sets_defaults_and_persists() {
        let (mut tasks, mut store) = fixture();
        assert!(tasks
            .add(Subject::Biology, "  revise mitosis  ", &mut store)
            .unwrap());
        let task = &tasks.tasks()[0];
        assert_eq!(task.task, "revise mitosis");
        assert!(!task.completed);
        assert_eq!(task.status, "in-progress");
        assert_eq!(task.deadline, Local::now().format("%Y-%m-%d").to_string());
        assert_eq!(store.load_tasks().unwrap(), tasks.tasks());
    }

    #[test]
    fn ids_are_unique_even_within_one_millisecond() {
        let (mut tasks, mut store) = fixture();
        tasks.add(Subject::English, "essay outline", &mut store).unwrap();
        tasks.add(Subject::English, "essay draft", &mut store).unwrap();
        tasks.add(Subject::English, "essay final", &mut store).unwrap();
        let ids: Vec<i64> = tasks.tasks().iter().map(|t| t.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn toggle_is_an_involution() {
        let (mut tasks, mut store) = fixture();
        tasks.add(Subject::Physics, "problem set", &mut store).unwrap();
        let id = tasks.tasks()[0].id;

        assert!(tasks.toggle(id, &mut store).unwrap());
        assert!(tasks.tasks()[0].completed);
        assert!(tasks.toggle(id, &mut store).unwrap());
        assert!(!tasks.tasks()[0].completed);
    }

    #[test]
    fn toggle_only_touches_completed() {
        let (mut tasks, mut store) = fixture();
        tasks.add(Subject::History, "timeline", &mut store).unwrap();
        let before = tasks.tasks()[0].clone();
        let id = before.id;

        tasks.toggle(id, &mut store).unwrap();
        let after = &tasks.tasks()[0];
        assert_eq!(after.id, before.id);
        assert_eq!(after.subject, before.subject);
        assert_eq!(after.task, before.task);
        assert_eq!(after.deadline, before.deadline);
        assert_eq!(after.status, before.status);
        assert_ne!(after.completed, before.completed);
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let (mut tasks, mut store) = fixture();
        tasks.add(Subject::Chemistry, "lab report", &mut store).unwrap();
        let snapshot: Vec<Task> = tasks.tasks().to_vec();

        assert!(!tasks.toggle(999, &mut store).unwrap());
        assert!(!tasks.delete(999, &mut store).unwrap());
        assert_eq!(tasks.tasks(), snapshot);
    }

    #[test]
    fn delete_removes_and_persists() {
        let (mut tasks, mut store) = fixture();
        tasks.add(Subject::Physics, "a", &mut store).unwrap();
        tasks.add(Subject::Physics, "b", &mut store).unwrap();
        let id = tasks.tasks()[0].id;

        assert!(tasks.delete(id, &mut store).unwrap());
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks.tasks()[0].task, "b");
        assert_eq!(store.load_tasks().unwrap().len(), 1);
    }

    #[test]
    fn breakdown_counts_by_subject() {
        let (mut tasks, mut store) = fixture();
        tasks.add(Subject::Physics, "a", &mut store).unwrap();
        tasks.add(Subject::Physics, "b", &mut store).unwrap();
        tasks.add(Subject::English, "c", &mut store).unwrap();
        tasks.toggle(tasks.tasks()[0].id, &mut store).unwrap();

        assert_eq!(tasks.completed_count(), 1);
        assert_eq!(
            tasks.subject_breakdown(),
            vec![(Subject::Physics, 2), (Subject::English, 1)]
        );
    }

    #[test]
    fn subject_parsing() {
        assert_eq!("physics".parse::<Subject>().unwrap(), Subject::Physics);
        assert_eq!("Mathematics".parse::<Subject>().unwrap(), Subject::Mathematics);
        assert!("Geography".parse::<Subject>().is_err());
    }
}
