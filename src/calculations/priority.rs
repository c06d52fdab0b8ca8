use crate::task::Task;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// One entry of the ranking produced by [`PriorityPass`]. The
/// `dependencies` field lists the titles of the task's incomplete direct
/// dependencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    pub id: i32,
    pub title: String,
    pub due_date: NaiveDate,
    pub priority_score: f64,
    pub explanation: String,
    pub estimated_hours: f64,
    pub importance: i32,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub score: f64,
    pub reason: String,
}

impl From<ScoredTask> for Suggestion {
    fn from(entry: ScoredTask) -> Self {
        Self {
            title: entry.title,
            score: entry.priority_score,
            reason: entry.explanation,
        }
    }
}

/// Priority score of a single task, combining urgency, importance, and
/// effort signals. Higher means more actionable now.
///
/// `dependencies` are the resolved direct dependencies in ascending-id
/// order; a task blocked by an incomplete dependency scores the -1.0
/// sentinel and names the first incomplete one. `today` is an explicit
/// input so the function stays deterministic; callers own the clock.
///
/// The numeric outputs and explanation strings are a compatibility
/// surface for API consumers.
pub fn priority_score(task: &Task, dependencies: &[Task], today: NaiveDate) -> (f64, String) {
    for dependency in dependencies {
        if !dependency.is_completed {
            return (
                -1.0,
                format!("Blocked by incomplete task: {}", dependency.title),
            );
        }
    }

    let days_until_due = (task.due_date - today).num_days();

    let urgency_score = if days_until_due < 0 {
        // A task 1 day late scores 105, 5 days late 125; capped at 300 so
        // ancient tasks do not dwarf everything else.
        let days_overdue = days_until_due.abs() as f64;
        100.0 + (days_overdue * 5.0).min(200.0)
    } else if days_until_due == 0 {
        90.0
    } else {
        // Decays as the due date recedes: 1 day away -> 40, 7 days -> 10.
        80.0 / (days_until_due as f64 + 1.0)
    };

    let importance_score = f64::from(task.importance) * 1.5;

    // Short tasks get a momentum bonus; both boundaries are exclusive, so
    // exactly 2 or 8 hours scores zero.
    let effort_score = if task.estimated_hours < 2.0 {
        10.0
    } else if task.estimated_hours > 8.0 {
        -5.0
    } else {
        0.0
    };

    let mut reasons = Vec::new();
    if urgency_score > 80.0 {
        reasons.push("Due very soon");
    }
    if task.importance >= 8 {
        reasons.push("High importance");
    }
    if effort_score > 0.0 {
        reasons.push("Quick win (< 2h)");
    }

    let mut explanation = if reasons.is_empty() {
        "Standard priority".to_string()
    } else {
        reasons.join(", ")
    };

    if days_until_due < 0 {
        explanation = format!("OVERDUE by {} days!", days_until_due.abs());
    } else if days_until_due == 0 {
        explanation = format!("Due today! {explanation}");
    }

    let total = urgency_score + importance_score + effort_score;
    ((total * 100.0).round() / 100.0, explanation)
}

/// Scores every incomplete task in the frame and returns the ranking
/// sorted by score descending, ties broken by ascending id.
pub struct PriorityPass<'a> {
    df: &'a DataFrame,
}

impl<'a> PriorityPass<'a> {
    pub fn new(df: &'a DataFrame) -> Self {
        Self { df }
    }

    pub fn execute(&self, today: NaiveDate) -> Result<Vec<ScoredTask>, PolarsError> {
        let mut tasks = Vec::with_capacity(self.df.height());
        for idx in 0..self.df.height() {
            tasks.push(Task::from_dataframe_row(self.df, idx)?);
        }

        let by_id: HashMap<i32, Task> = tasks.iter().map(|t| (t.id, t.clone())).collect();

        let mut ranking = Vec::new();
        for task in tasks.iter().filter(|t| !t.is_completed) {
            let mut dependencies = Vec::with_capacity(task.dependencies.len());
            for dep_id in &task.dependencies {
                let dependency = by_id.get(dep_id).ok_or_else(|| {
                    PolarsError::ComputeError(
                        format!("task {} references unknown dependency {}", task.id, dep_id)
                            .into(),
                    )
                })?;
                dependencies.push(dependency.clone());
            }

            let (score, explanation) = priority_score(task, &dependencies, today);

            ranking.push(ScoredTask {
                id: task.id,
                title: task.title.clone(),
                due_date: task.due_date,
                priority_score: score,
                explanation,
                estimated_hours: task.estimated_hours,
                importance: task.importance,
                dependencies: dependencies
                    .iter()
                    .filter(|d| !d.is_completed)
                    .map(|d| d.title.clone())
                    .collect(),
            });
        }

        ranking.sort_by(|a, b| {
            b.priority_score
                .partial_cmp(&a.priority_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(ranking)
    }
}
