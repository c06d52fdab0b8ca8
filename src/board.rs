use crate::calculations::priority::{PriorityPass, ScoredTask, Suggestion};
use crate::graph::task_dag::TaskDag;
use crate::metadata::BoardMetadata;
use crate::task::Task;
use crate::task_validation::{self, TaskValidationError};
use chrono::NaiveDate;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingSummary {
    pub task_count: usize,
    pub blocked_count: usize,
    pub overdue_count: usize,
    pub top_task: Option<String>,
}

impl RankingSummary {
    pub fn from_ranking(ranking: &[ScoredTask]) -> Self {
        let blocked_count = ranking
            .iter()
            .filter(|entry| entry.priority_score < 0.0)
            .count();
        let overdue_count = ranking
            .iter()
            .filter(|entry| entry.explanation.starts_with("OVERDUE"))
            .count();
        let top_task = ranking
            .iter()
            .find(|entry| entry.priority_score > 0.0)
            .map(|entry| entry.title.clone());
        Self {
            task_count: ranking.len(),
            blocked_count,
            overdue_count,
            top_task,
        }
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        if self.blocked_count > 0 {
            parts.push(format!("blocked={}", self.blocked_count));
        }
        if self.overdue_count > 0 {
            parts.push(format!("overdue={}", self.overdue_count));
        }
        if let Some(title) = &self.top_task {
            parts.push(format!("top={}", title));
        }
        parts.join(", ")
    }
}

#[derive(Debug, Clone)]
pub enum BoardMetadataError {
    EmptyName,
}

impl fmt::Display for BoardMetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardMetadataError::EmptyName => write!(f, "board name must not be empty"),
        }
    }
}

impl std::error::Error for BoardMetadataError {}

pub struct TaskBoard {
    df: DataFrame,
    metadata: BoardMetadata,
}

impl TaskBoard {
    pub(crate) fn from_parts(metadata: BoardMetadata) -> Self {
        let schema = Self::default_schema();
        let df = DataFrame::empty_with_schema(&schema);
        Self { df, metadata }
    }

    pub fn new() -> Self {
        Self::from_parts(BoardMetadata::default())
    }

    pub fn new_with_metadata(metadata: BoardMetadata) -> Self {
        Self::from_parts(metadata)
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn metadata(&self) -> &BoardMetadata {
        &self.metadata
    }

    pub fn board_name(&self) -> &str {
        &self.metadata.board_name
    }

    pub fn board_description(&self) -> &str {
        &self.metadata.board_description
    }

    pub fn set_metadata(&mut self, metadata: BoardMetadata) -> Result<(), BoardMetadataError> {
        if metadata.board_name.trim().is_empty() {
            return Err(BoardMetadataError::EmptyName);
        }
        self.metadata = metadata;
        Ok(())
    }

    pub fn set_board_name(&mut self, name: impl Into<String>) -> Result<(), BoardMetadataError> {
        let mut metadata = self.metadata.clone();
        metadata.board_name = name.into();
        self.set_metadata(metadata)
    }

    pub fn set_board_description(&mut self, description: impl Into<String>) {
        self.metadata.board_description = description.into();
    }

    fn default_schema() -> Schema {
        Schema::from_iter(vec![
            Field::new("id".into(), DataType::Int32),
            Field::new("title".into(), DataType::String),
            Field::new("due_date".into(), DataType::Date),
            Field::new("estimated_hours".into(), DataType::Float64),
            Field::new("importance".into(), DataType::Int32),
            Field::new("is_completed".into(), DataType::Boolean),
            Field::new(
                "dependencies".into(),
                DataType::List(Box::new(DataType::Int32)),
            ),
        ])
    }

    pub fn tasks(&self) -> Result<Vec<Task>, PolarsError> {
        let df = self.dataframe();
        let mut tasks = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            tasks.push(Task::from_dataframe_row(df, idx)?);
        }
        Ok(tasks)
    }

    pub fn find_task(&self, task_id: i32) -> Result<Option<Task>, PolarsError> {
        if self.df.height() == 0 {
            return Ok(None);
        }
        let ids = self.df.column("id")?.i32()?;
        for (idx, id_opt) in ids.into_iter().enumerate() {
            if id_opt == Some(task_id) {
                let task = Task::from_dataframe_row(self.dataframe(), idx)?;
                return Ok(Some(task));
            }
        }
        Ok(None)
    }

    /// Incomplete tasks, each with its dependency list filtered down to
    /// incomplete dependencies (what a client still has to wait for).
    pub fn open_tasks(&self) -> Result<Vec<Task>, PolarsError> {
        let all = self.tasks()?;
        let completed: HashSet<i32> = all
            .iter()
            .filter(|task| task.is_completed)
            .map(|task| task.id)
            .collect();
        Ok(all
            .into_iter()
            .filter(|task| !task.is_completed)
            .map(|mut task| {
                task.dependencies.retain(|dep| !completed.contains(dep));
                task
            })
            .collect())
    }

    pub fn next_task_id(&self) -> i32 {
        if self.df.height() == 0 {
            return 1;
        }
        self.df
            .column("id")
            .ok()
            .and_then(|s| s.i32().ok())
            .and_then(|ca| ca.into_iter().flatten().max())
            .map(|m| m + 1)
            .unwrap_or(1)
    }

    /// Creates a task with a store-assigned id. The candidate row is
    /// inserted before the cycle gate runs so the detector sees the new
    /// edges; on a cycle the row is rolled back and the creation rejected.
    pub fn add_task(
        &mut self,
        title: &str,
        due_date: NaiveDate,
        estimated_hours: f64,
        importance: i32,
        dependencies: Vec<i32>,
    ) -> Result<Task, PolarsError> {
        let id = self.next_task_id();
        let mut task = Task::new(id, title, due_date, estimated_hours, importance);
        task.dependencies = dependencies;
        task.dependencies.sort_unstable();
        task.dependencies.dedup();
        task_validation::validate_task(&task).map_err(Self::validation_error)?;
        for dep in &task.dependencies {
            if self.find_task(*dep)?.is_none() {
                return Err(PolarsError::ComputeError(
                    format!("dependency {dep} not found").into(),
                ));
            }
        }

        let new_row = task.to_dataframe_row()?;
        self.df = self.df.vstack(&new_row)?;

        let dag = TaskDag::build(&self.df)?;
        if dag.has_cycle(id) {
            self.delete_task(id)?;
            return Err(PolarsError::ComputeError(
                format!("circular dependency detected; task {id} rejected").into(),
            ));
        }

        Ok(task)
    }

    /// Attaches one dependency edge to an existing task. The edge is
    /// written, the detector consulted, and the previous list restored if
    /// the edge would close a cycle. Adding an existing edge is a no-op.
    pub fn add_dependency(&mut self, task_id: i32, depends_on: i32) -> Result<Task, PolarsError> {
        let task = self.find_task(task_id)?.ok_or_else(|| {
            PolarsError::ComputeError(format!("task {task_id} not found").into())
        })?;
        if self.find_task(depends_on)?.is_none() {
            return Err(PolarsError::ComputeError(
                format!("dependency {depends_on} not found").into(),
            ));
        }
        if task.dependencies.contains(&depends_on) {
            return Ok(task);
        }

        let previous = task.dependencies.clone();
        let mut updated = previous.clone();
        updated.push(depends_on);
        updated.sort_unstable();
        updated.dedup();
        self.update_list_i32_column("dependencies", task_id, updated)?;

        let dag = TaskDag::build(&self.df)?;
        if dag.has_cycle(task_id) {
            self.update_list_i32_column("dependencies", task_id, previous)?;
            return Err(PolarsError::ComputeError(
                format!("circular dependency detected; dependency {depends_on} rejected").into(),
            ));
        }

        self.find_task(task_id)?.ok_or_else(|| {
            PolarsError::ComputeError("task not found after dependency update".into())
        })
    }

    /// Marks a task completed. Completion is one-way; there is no reopen.
    pub fn complete_task(&mut self, task_id: i32) -> Result<bool, PolarsError> {
        if self.find_task(task_id)?.is_none() {
            return Ok(false);
        }
        self.update_bool_column("is_completed", task_id, true)?;
        Ok(true)
    }

    pub fn delete_task(&mut self, task_id: i32) -> Result<bool, PolarsError> {
        if self.df.height() == 0 {
            return Ok(false);
        }
        let snapshot = self.df.clone();
        let mut tasks: Vec<Task> = Vec::with_capacity(snapshot.height());
        let mut found = false;
        for idx in 0..snapshot.height() {
            let mut task = Task::from_dataframe_row(&snapshot, idx)?;
            if task.id == task_id {
                found = true;
                continue;
            }
            task.dependencies.retain(|&dep| dep != task_id);
            tasks.push(task);
        }
        if !found {
            return Ok(false);
        }

        self.df = DataFrame::empty_with_schema(&Self::default_schema());
        for task in tasks {
            self.upsert_task_record(task)?;
        }
        Ok(true)
    }

    /// Raw record write used by persistence loads. Performs field
    /// validation only; whole-board acyclicity is the loader's concern.
    pub fn upsert_task_record(&mut self, mut task: Task) -> Result<(), PolarsError> {
        task.dependencies.sort_unstable();
        task.dependencies.dedup();
        task_validation::validate_task(&task).map_err(Self::validation_error)?;
        let id_exists = if self.df.height() == 0 {
            false
        } else {
            self.df
                .column("id")?
                .i32()?
                .into_iter()
                .any(|v| v == Some(task.id))
        };

        if id_exists {
            self.update_string_column("title", task.id, &task.title)?;
            self.update_date_column("due_date", task.id, task.due_date)?;
            self.update_float_column("estimated_hours", task.id, task.estimated_hours)?;
            self.update_i32_column("importance", task.id, task.importance)?;
            self.update_bool_column("is_completed", task.id, task.is_completed)?;
            self.update_list_i32_column("dependencies", task.id, task.dependencies.clone())?;
            return Ok(());
        }

        let new_row = task.to_dataframe_row()?;
        self.df = self.df.vstack(&new_row)?;
        Ok(())
    }

    pub fn rank(&self, today: NaiveDate) -> Result<Vec<ScoredTask>, PolarsError> {
        PriorityPass::new(&self.df).execute(today)
    }

    /// Top three actionable tasks; blocked tasks carry the -1.0 sentinel
    /// and fall out of the score > 0 filter.
    pub fn suggest(&self, today: NaiveDate) -> Result<Vec<Suggestion>, PolarsError> {
        let ranking = self.rank(today)?;
        Ok(ranking
            .into_iter()
            .filter(|entry| entry.priority_score > 0.0)
            .take(3)
            .map(Suggestion::from)
            .collect())
    }

    fn validation_error(err: TaskValidationError) -> PolarsError {
        PolarsError::ComputeError(err.to_string().into())
    }

    fn update_string_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_value: &str,
    ) -> Result<(), PolarsError> {
        let id_col = self.df.column("id")?;
        let target_col = self.df.column(column_name)?;

        let new_series = target_col
            .str()?
            .into_iter()
            .zip(id_col.i32()?.into_iter())
            .map(|(val, id)| {
                if id == Some(task_id) {
                    Some(new_value)
                } else {
                    val
                }
            })
            .collect::<StringChunked>()
            .into_series()
            .with_name(column_name.into());

        self.df.replace(column_name, new_series)?;
        Ok(())
    }

    fn update_i32_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_value: i32,
    ) -> Result<(), PolarsError> {
        let id_col = self.df.column("id")?;
        let target_col = self.df.column(column_name)?;

        let new_series = target_col
            .i32()?
            .into_iter()
            .zip(id_col.i32()?.into_iter())
            .map(|(val, id)| {
                if id == Some(task_id) {
                    Some(new_value)
                } else {
                    val
                }
            })
            .collect::<Int32Chunked>()
            .into_series()
            .with_name(column_name.into());

        self.df.replace(column_name, new_series)?;
        Ok(())
    }

    fn update_float_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_value: f64,
    ) -> Result<(), PolarsError> {
        let id_col = self.df.column("id")?;
        let target_col = self.df.column(column_name)?;

        let new_series = target_col
            .f64()?
            .into_iter()
            .zip(id_col.i32()?.into_iter())
            .map(|(val, id)| {
                if id == Some(task_id) {
                    Some(new_value)
                } else {
                    val
                }
            })
            .collect::<Float64Chunked>()
            .into_series()
            .with_name(column_name.into());

        self.df.replace(column_name, new_series)?;
        Ok(())
    }

    fn update_bool_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_value: bool,
    ) -> Result<(), PolarsError> {
        let id_col = self.df.column("id")?;
        let target_col = self.df.column(column_name)?;

        let new_series = target_col
            .bool()?
            .into_iter()
            .zip(id_col.i32()?.into_iter())
            .map(|(val, id)| {
                if id == Some(task_id) {
                    Some(new_value)
                } else {
                    val
                }
            })
            .collect::<BooleanChunked>()
            .into_series()
            .with_name(column_name.into());

        self.df.replace(column_name, new_series)?;
        Ok(())
    }

    fn update_list_i32_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_values: Vec<i32>,
    ) -> Result<(), PolarsError> {
        let id_col = self.df.column("id")?;
        let target_col = self.df.column(column_name)?;

        let new_series = target_col
            .list()?
            .into_iter()
            .zip(id_col.i32()?.into_iter())
            .map(|(val, id)| {
                if id == Some(task_id) {
                    Some(Series::new(PlSmallStr::from_static(""), new_values.clone()))
                } else {
                    val
                }
            })
            .collect::<ListChunked>()
            .into_series()
            .with_name(column_name.into());

        self.df.replace(column_name, new_series)?;
        Ok(())
    }

    fn update_date_column(
        &mut self,
        column_name: &str,
        task_id: i32,
        new_date: NaiveDate,
    ) -> Result<(), PolarsError> {
        self.df = self
            .df
            .clone()
            .lazy()
            .with_column(
                when(col("id").eq(lit(task_id)))
                    .then(lit(new_date).cast(DataType::Date))
                    .otherwise(col(column_name).cast(DataType::Date))
                    .alias(column_name),
            )
            .collect()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn default_schema_contains_expected_columns() {
        let schema = TaskBoard::default_schema();
        let expected = vec![
            "id",
            "title",
            "due_date",
            "estimated_hours",
            "importance",
            "is_completed",
            "dependencies",
        ];
        for name in expected {
            assert!(schema.contains(name.into()), "missing column {name}");
        }
    }

    #[test]
    fn add_task_assigns_sequential_ids() {
        let mut board = TaskBoard::new();
        let a = board
            .add_task("Write draft", d(2025, 6, 9), 3.0, 5, Vec::new())
            .unwrap();
        let b = board
            .add_task("Review draft", d(2025, 6, 10), 1.0, 5, vec![a.id])
            .unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(board.dataframe().height(), 2);
    }

    #[test]
    fn add_task_normalizes_dependency_list() {
        let mut board = TaskBoard::new();
        board
            .add_task("Base", d(2025, 6, 9), 1.0, 5, Vec::new())
            .unwrap();
        board
            .add_task("Other", d(2025, 6, 9), 1.0, 5, Vec::new())
            .unwrap();
        let task = board
            .add_task("Dependent", d(2025, 6, 10), 1.0, 5, vec![2, 1, 2])
            .unwrap();
        assert_eq!(task.dependencies, vec![1, 2]);
    }
}
