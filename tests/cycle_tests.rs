use chrono::NaiveDate;
use triage_tool::{Task, TaskBoard, TaskDag};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn record(id: i32, dependencies: Vec<i32>) -> Task {
    let mut task = Task::new(id, format!("T{id}"), d(2025, 6, 9), 1.0, 5);
    task.dependencies = dependencies;
    task
}

fn board_with(records: Vec<Task>) -> TaskBoard {
    let mut board = TaskBoard::new();
    for task in records {
        board.upsert_task_record(task).unwrap();
    }
    board
}

#[test]
fn task_without_dependencies_never_cycles() {
    let board = board_with(vec![record(1, vec![])]);
    let dag = TaskDag::build(board.dataframe()).unwrap();
    assert!(!dag.has_cycle(1));
    assert!(dag.is_acyclic());
}

#[test]
fn self_dependency_is_a_single_node_cycle() {
    let board = board_with(vec![record(1, vec![1])]);
    let dag = TaskDag::build(board.dataframe()).unwrap();
    assert!(dag.has_cycle(1));
    assert!(!dag.is_acyclic());
}

#[test]
fn chain_is_acyclic_from_every_node() {
    let board = board_with(vec![
        record(1, vec![]),
        record(2, vec![1]),
        record(3, vec![2]),
    ]);
    let dag = TaskDag::build(board.dataframe()).unwrap();
    for id in 1..=3 {
        assert!(!dag.has_cycle(id), "node {id} reported a cycle");
    }
    assert!(dag.is_acyclic());
}

#[test]
fn cycle_is_detected_from_any_node_reaching_it() {
    let board = board_with(vec![
        record(1, vec![2]),
        record(2, vec![3]),
        record(3, vec![1]),
        record(4, vec![1]),
    ]);
    let dag = TaskDag::build(board.dataframe()).unwrap();
    for id in 1..=3 {
        assert!(dag.has_cycle(id), "node {id} missed the cycle");
    }
    // Node 4 is off the cycle but its dependency path runs into it.
    assert!(dag.has_cycle(4));
    assert!(!dag.is_acyclic());
}

#[test]
fn diamond_sharing_is_not_a_cycle() {
    // 4 depends on 2 and 3, both of which depend on 1. The shared node is
    // reached twice but only ever through the visited set.
    let board = board_with(vec![
        record(1, vec![]),
        record(2, vec![1]),
        record(3, vec![1]),
        record(4, vec![2, 3]),
    ]);
    let dag = TaskDag::build(board.dataframe()).unwrap();
    for id in 1..=4 {
        assert!(!dag.has_cycle(id), "node {id} reported a cycle");
    }
    assert!(dag.is_acyclic());
}

#[test]
fn repeated_queries_return_the_same_result() {
    let board = board_with(vec![record(1, vec![2]), record(2, vec![1])]);
    let dag = TaskDag::build(board.dataframe()).unwrap();
    assert!(dag.has_cycle(1));
    assert!(dag.has_cycle(1));
    assert!(dag.has_cycle(2));
}

#[test]
fn unknown_start_id_never_cycles() {
    let board = board_with(vec![record(1, vec![])]);
    let dag = TaskDag::build(board.dataframe()).unwrap();
    assert!(!dag.has_cycle(99));
}

#[test]
fn edges_to_unknown_ids_are_skipped() {
    let board = board_with(vec![record(1, vec![99])]);
    let dag = TaskDag::build(board.dataframe()).unwrap();
    assert!(!dag.has_cycle(1));
    assert!(dag.is_acyclic());
}
