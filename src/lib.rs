pub mod board;
pub mod calculations;
pub mod graph;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod metadata;
pub mod persistence;
pub mod task;
pub(crate) mod task_validation;

pub use board::{BoardMetadataError, RankingSummary, TaskBoard};
pub use calculations::priority::{PriorityPass, ScoredTask, Suggestion, priority_score};
pub use graph::task_dag::TaskDag;
pub use metadata::BoardMetadata;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteBoardStore;
pub use persistence::{
    BoardStore, PersistenceError, load_board_from_csv, load_board_from_json, save_board_to_csv,
    save_board_to_json, validate_board, validate_tasks,
};
pub use task::Task;
