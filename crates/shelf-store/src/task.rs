//! Units of work that run against a sample home.
//!
//! A pipeline asks a store for a sample home, then runs each of its
//! [`SampleTask`]s there: `start`, `execute`, `stop`, in insertion order.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::StoreResult;

/// A named step that produces or consumes data in one sample home.
pub trait SampleTask {
    /// Unique name of this task within a pipeline.
    fn identifier(&self) -> &str;

    /// The sample home this task currently works in.
    fn sample_home(&self) -> &Path;

    /// Point this task at a new sample home.
    fn set_sample_home(&mut self, sample_home: PathBuf);

    fn start(&mut self) -> StoreResult<()> {
        debug!(
            task = self.identifier(),
            sample_home = %self.sample_home().display(),
            "task start"
        );
        Ok(())
    }

    fn execute(&mut self) -> StoreResult<()>;

    fn stop(&mut self) -> StoreResult<()> {
        debug!(
            task = self.identifier(),
            sample_home = %self.sample_home().display(),
            "task stop"
        );
        Ok(())
    }
}

/// Ordered collection of [`SampleTask`]s, unique by identifier.
#[derive(Default)]
pub struct SampleTaskPipeline {
    tasks: Vec<Box<dyn SampleTask>>,
}

impl SampleTaskPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task. A task with the same identifier is replaced in place,
    /// keeping its position.
    pub fn add(&mut self, task: Box<dyn SampleTask>) {
        match self
            .tasks
            .iter()
            .position(|t| t.identifier() == task.identifier())
        {
            Some(slot) => self.tasks[slot] = task,
            None => self.tasks.push(task),
        }
    }

    /// Remove the task named `identifier`. Removing an unknown task is a
    /// no-op.
    pub fn remove(&mut self, identifier: &str) {
        self.tasks.retain(|t| t.identifier() != identifier);
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = &dyn SampleTask> {
        self.tasks.iter().map(|t| t.as_ref())
    }

    pub fn tasks_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn SampleTask>> {
        self.tasks.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run every task against `sample_home`. Stops at the first failure.
    pub fn run(&mut self, sample_home: &Path) -> StoreResult<()> {
        info!(
            tasks = self.tasks.len(),
            sample_home = %sample_home.display(),
            "running pipeline"
        );
        for task in &mut self.tasks {
            task.set_sample_home(sample_home.to_path_buf());
            task.start()?;
            task.execute()?;
            task.stop()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for SampleTaskPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.tasks.iter().map(|t| t.identifier()).collect();
        f.debug_struct("SampleTaskPipeline")
            .field("tasks", &names)
            .finish()
    }
}
