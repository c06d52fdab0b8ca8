use chrono::{Duration, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub due_date: NaiveDate,
    pub estimated_hours: f64,
    pub importance: i32,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub dependencies: Vec<i32>,
}

impl Task {
    pub fn new(
        id: i32,
        title: impl Into<String>,
        due_date: NaiveDate,
        estimated_hours: f64,
        importance: i32,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            due_date,
            estimated_hours,
            importance,
            is_completed: false,
            dependencies: Vec::new(),
        }
    }

    pub fn to_dataframe_row(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(7);

        let id_data: [i32; 1] = [self.id];
        columns.push(Series::new(PlSmallStr::from_static("id"), id_data).into_column());

        let title_data: [&str; 1] = [self.title.as_str()];
        columns.push(Series::new(PlSmallStr::from_static("title"), title_data).into_column());

        columns.push(Self::series_from_date("due_date", self.due_date)?.into_column());

        let hours_data: [f64; 1] = [self.estimated_hours];
        columns.push(
            Series::new(PlSmallStr::from_static("estimated_hours"), hours_data).into_column(),
        );

        let importance_data: [i32; 1] = [self.importance];
        columns.push(
            Series::new(PlSmallStr::from_static("importance"), importance_data).into_column(),
        );

        let completed_data: [bool; 1] = [self.is_completed];
        columns.push(
            Series::new(PlSmallStr::from_static("is_completed"), completed_data).into_column(),
        );

        columns.push(Self::series_from_i32_list("dependencies", &self.dependencies).into_column());

        DataFrame::new(columns)
    }

    pub fn from_dataframe_row(df: &DataFrame, row_idx: usize) -> PolarsResult<Self> {
        let id = df
            .column("id")?
            .i32()?
            .get(row_idx)
            .ok_or_else(|| PolarsError::ComputeError("task row missing id".into()))?;

        let title = df
            .column("title")?
            .str()?
            .get(row_idx)
            .unwrap_or("")
            .to_string();

        let due_date = df
            .column("due_date")?
            .date()?
            .get(row_idx)
            .map(Self::date_from_i32)
            .ok_or_else(|| PolarsError::ComputeError("task row missing due_date".into()))?;

        let estimated_hours = df
            .column("estimated_hours")?
            .f64()?
            .get(row_idx)
            .unwrap_or(0.0);

        let importance = df.column("importance")?.i32()?.get(row_idx).unwrap_or(0);

        let is_completed = df
            .column("is_completed")?
            .bool()?
            .get(row_idx)
            .unwrap_or(false);

        let dependencies = Self::vec_from_i32_list(df.column("dependencies")?.list()?, row_idx)?;

        Ok(Self {
            id,
            title,
            due_date,
            estimated_hours,
            importance,
            is_completed,
            dependencies,
        })
    }

    fn series_from_i32_list(name: &str, values: &[i32]) -> Series {
        let inner = Series::new(PlSmallStr::from_static(""), values.to_vec());
        Series::new(name.into(), &[inner])
    }

    fn series_from_date(name: &str, date: NaiveDate) -> PolarsResult<Series> {
        let data: [i32; 1] = [Self::date_to_i32(date)];
        Series::new(name.into(), data).cast(&DataType::Date)
    }

    fn vec_from_i32_list(list: &ListChunked, row_idx: usize) -> PolarsResult<Vec<i32>> {
        if let Some(series) = list.get_as_series(row_idx) {
            Ok(series.i32()?.into_iter().flatten().collect::<Vec<_>>())
        } else {
            Ok(Vec::new())
        }
    }

    fn date_to_i32(date: NaiveDate) -> i32 {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        (date - epoch).num_days() as i32
    }

    fn date_from_i32(days: i32) -> NaiveDate {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        epoch + Duration::days(days as i64)
    }
}
