use super::{PersistenceError, PersistenceResult};
use crate::{BoardMetadata, Task, TaskBoard};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct BoardSnapshot {
    metadata: BoardMetadata,
    tasks: Vec<Task>,
}

impl BoardSnapshot {
    fn from_board(board: &TaskBoard) -> PersistenceResult<Self> {
        let df = board.dataframe();
        let mut tasks = Vec::with_capacity(df.height());
        for row_idx in 0..df.height() {
            tasks.push(Task::from_dataframe_row(df, row_idx)?);
        }
        super::validate_tasks(&tasks)?;
        Ok(Self {
            metadata: board.metadata().clone(),
            tasks,
        })
    }

    fn into_board(self) -> PersistenceResult<TaskBoard> {
        super::validate_tasks(&self.tasks)?;
        let mut board = TaskBoard::new_with_metadata(self.metadata);
        for task in self.tasks {
            board.upsert_task_record(task)?;
        }
        super::validate_board(&board)?;
        Ok(board)
    }
}

pub fn save_board_to_json<P: AsRef<Path>>(board: &TaskBoard, path: P) -> PersistenceResult<()> {
    let snapshot = BoardSnapshot::from_board(board)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_board_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<TaskBoard> {
    let file = File::open(path)?;
    let snapshot: BoardSnapshot = serde_json::from_reader(file)?;
    snapshot.into_board()
}

#[derive(Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    id: i32,
    title: String,
    due_date: String,
    estimated_hours: f64,
    importance: i32,
    is_completed: bool,
    dependencies: String,
    #[serde(default)]
    metadata_json: String,
}

impl From<&Task> for TaskCsvRecord {
    fn from(task: &Task) -> Self {
        let mut record = TaskCsvRecord::default();
        record.id = task.id;
        record.title = task.title.clone();
        record.due_date = format_date(task.due_date);
        record.estimated_hours = task.estimated_hours;
        record.importance = task.importance;
        record.is_completed = task.is_completed;
        record.dependencies = join_i32(&task.dependencies);
        record
    }
}

impl TaskCsvRecord {
    fn metadata_row(board: &TaskBoard) -> PersistenceResult<Self> {
        let metadata_json = serde_json::to_string(board.metadata())?;
        let mut record = TaskCsvRecord::default();
        record.title = "__metadata__".to_string();
        record.metadata_json = metadata_json;
        Ok(record)
    }

    fn is_metadata_row(&self) -> bool {
        !self.metadata_json.trim().is_empty()
    }

    fn into_task(self) -> PersistenceResult<Task> {
        if self.is_metadata_row() {
            return Err(PersistenceError::InvalidData(
                "metadata row cannot be converted to task".into(),
            ));
        }
        let due_date = parse_date(&self.due_date)?;
        let mut task = Task::new(
            self.id,
            self.title,
            due_date,
            self.estimated_hours,
            self.importance,
        );
        task.is_completed = self.is_completed;
        task.dependencies = split_i32(&self.dependencies)?;
        Ok(task)
    }
}

pub fn save_board_to_csv<P: AsRef<Path>>(board: &TaskBoard, path: P) -> PersistenceResult<()> {
    super::validate_board(board)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.serialize(TaskCsvRecord::metadata_row(board)?)?;
    let df = board.dataframe();
    for row_idx in 0..df.height() {
        let task = Task::from_dataframe_row(df, row_idx)?;
        writer.serialize(TaskCsvRecord::from(&task))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_board_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<TaskBoard> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut tasks = Vec::new();
    let mut metadata: Option<BoardMetadata> = None;
    for record in reader.deserialize::<TaskCsvRecord>() {
        let record = record?;
        if record.is_metadata_row() {
            if metadata.is_some() {
                return Err(PersistenceError::InvalidData(
                    "CSV file contained multiple metadata rows".into(),
                ));
            }
            metadata = Some(serde_json::from_str(&record.metadata_json).map_err(|err| {
                PersistenceError::InvalidData(format!("invalid metadata json: {err}"))
            })?);
            continue;
        }
        tasks.push(record.into_task()?);
    }

    if tasks.is_empty() {
        return Err(PersistenceError::InvalidData(
            "CSV file contained no tasks".into(),
        ));
    }

    super::validate_tasks(&tasks)?;

    let mut board = match metadata {
        Some(metadata) => TaskBoard::new_with_metadata(metadata),
        None => TaskBoard::new(),
    };
    for task in tasks {
        board.upsert_task_record(task)?;
    }
    super::validate_board(&board)?;
    Ok(board)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(input: &str) -> PersistenceResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}

fn join_i32(values: &[i32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn split_i32(input: &str) -> PersistenceResult<Vec<i32>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    input
        .split(',')
        .map(|part| {
            part.trim().parse::<i32>().map_err(|e| {
                PersistenceError::InvalidData(format!("invalid integer '{part}': {e}"))
            })
        })
        .collect()
}
