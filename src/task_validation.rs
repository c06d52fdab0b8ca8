use crate::task::Task;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone)]
pub struct TaskValidationError {
    message: String,
}

impl TaskValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TaskValidationError {}

pub fn validate_task(task: &Task) -> Result<(), TaskValidationError> {
    if task.title.trim().is_empty() {
        return Err(TaskValidationError::new(format!(
            "task {} requires a non-empty title",
            task.id
        )));
    }

    if !task.estimated_hours.is_finite() || task.estimated_hours <= 0.0 {
        return Err(TaskValidationError::new(format!(
            "task {} has invalid estimated_hours {} (must be positive)",
            task.id, task.estimated_hours
        )));
    }

    if !(1..=10).contains(&task.importance) {
        return Err(TaskValidationError::new(format!(
            "task {} has invalid importance {} (must be between 1 and 10)",
            task.id, task.importance
        )));
    }

    // A direct self-edge is left to the cycle gate; only duplicates are
    // rejected here.
    let mut seen_deps = HashSet::with_capacity(task.dependencies.len());
    for dep in &task.dependencies {
        if !seen_deps.insert(*dep) {
            return Err(TaskValidationError::new(format!(
                "task {} has duplicate dependency {}",
                task.id, dep
            )));
        }
    }

    Ok(())
}

pub fn validate_task_collection(tasks: &[Task]) -> Result<(), TaskValidationError> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(task.id) {
            return Err(TaskValidationError::new(format!(
                "duplicate task id {}",
                task.id
            )));
        }
        validate_task(task)?;
    }
    for task in tasks {
        for dep in &task.dependencies {
            if !seen_ids.contains(dep) {
                return Err(TaskValidationError::new(format!(
                    "task {} references unknown dependency {}",
                    task.id, dep
                )));
            }
        }
    }
    Ok(())
}
