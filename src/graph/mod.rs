pub mod task_dag;
