use chrono::NaiveDate;
use triage_tool::{Task, priority_score};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn task(id: i32, title: &str, due: NaiveDate, hours: f64, importance: i32) -> Task {
    Task::new(id, title, due, hours, importance)
}

#[test]
fn due_today_quick_win_scores_115() {
    let t = task(1, "Submit report", d(2025, 6, 9), 1.0, 10);
    let (score, explanation) = priority_score(&t, &[], d(2025, 6, 9));
    assert_eq!(score, 115.0);
    assert!(explanation.starts_with("Due today! "));
    assert_eq!(
        explanation,
        "Due today! Due very soon, High importance, Quick win (< 2h)"
    );
}

#[test]
fn overdue_three_days_scores_116_5() {
    let t = task(1, "Pay invoice", d(2025, 6, 6), 5.0, 1);
    let (score, explanation) = priority_score(&t, &[], d(2025, 6, 9));
    assert_eq!(score, 116.5);
    assert_eq!(explanation, "OVERDUE by 3 days!");
}

#[test]
fn due_in_seven_days_is_standard_priority() {
    let t = task(1, "Plan trip", d(2025, 6, 16), 3.0, 5);
    let (score, explanation) = priority_score(&t, &[], d(2025, 6, 9));
    assert_eq!(score, 17.5);
    assert_eq!(explanation, "Standard priority");
}

#[test]
fn blocked_task_scores_sentinel_regardless_of_urgency() {
    // Overdue and important, but a single incomplete dependency wins.
    let t = task(2, "Deploy", d(2025, 6, 1), 1.0, 10);
    let dep = task(1, "Prepare data", d(2025, 6, 1), 1.0, 5);
    let (score, explanation) = priority_score(&t, &[dep], d(2025, 6, 9));
    assert_eq!(score, -1.0);
    assert_eq!(explanation, "Blocked by incomplete task: Prepare data");
}

#[test]
fn blocked_message_names_first_dependency_in_slice_order() {
    let t = task(9, "Ship", d(2025, 6, 9), 1.0, 10);
    let dep_a = task(2, "Write docs", d(2025, 6, 9), 1.0, 5);
    let dep_b = task(5, "Run QA", d(2025, 6, 9), 1.0, 5);
    let (score, explanation) = priority_score(&t, &[dep_a, dep_b], d(2025, 6, 9));
    assert_eq!(score, -1.0);
    assert_eq!(explanation, "Blocked by incomplete task: Write docs");
}

#[test]
fn completed_dependencies_do_not_block() {
    let t = task(2, "Deploy", d(2025, 6, 16), 3.0, 5);
    let mut dep = task(1, "Prepare data", d(2025, 6, 1), 1.0, 5);
    dep.is_completed = true;
    let (score, explanation) = priority_score(&t, &[dep], d(2025, 6, 9));
    assert_eq!(score, 17.5);
    assert_eq!(explanation, "Standard priority");
}

#[test]
fn effort_boundaries_are_exclusive() {
    let today = d(2025, 6, 9);
    let due = d(2025, 6, 16);

    // Exactly 2 and exactly 8 hours get neither bonus nor penalty.
    let (at_two, _) = priority_score(&task(1, "A", due, 2.0, 5), &[], today);
    let (at_eight, _) = priority_score(&task(1, "A", due, 8.0, 5), &[], today);
    assert_eq!(at_two, 17.5);
    assert_eq!(at_eight, 17.5);

    let (under_two, _) = priority_score(&task(1, "A", due, 1.9, 5), &[], today);
    let (over_eight, _) = priority_score(&task(1, "A", due, 8.5, 5), &[], today);
    assert_eq!(under_two, 27.5);
    assert_eq!(over_eight, 12.5);
}

#[test]
fn overdue_urgency_caps_at_300() {
    // 100 days overdue: urgency is the 300 cap, not 600.
    let t = task(1, "Ancient chore", d(2025, 1, 1), 5.0, 1);
    let (score, explanation) = priority_score(&t, &[], d(2025, 4, 11));
    assert_eq!(score, 301.5);
    assert_eq!(explanation, "OVERDUE by 100 days!");
}

#[test]
fn overdue_forty_days_reaches_cap_exactly() {
    let t = task(1, "Old chore", d(2025, 5, 1), 5.0, 1);
    let (score, _) = priority_score(&t, &[], d(2025, 6, 10));
    assert_eq!(score, 301.5);
}

#[test]
fn totals_round_to_two_decimals() {
    // Due in 2 days: urgency 80/3 = 26.666..., total 34.1666... -> 34.17.
    let t = task(1, "Rounding", d(2025, 6, 11), 3.0, 5);
    let (score, _) = priority_score(&t, &[], d(2025, 6, 9));
    assert_eq!(score, 34.17);
}

#[test]
fn future_tasks_skip_the_due_very_soon_tag() {
    // Due tomorrow: urgency 40, below the 80 tag threshold.
    let t = task(1, "Tomorrow", d(2025, 6, 10), 1.0, 9);
    let (score, explanation) = priority_score(&t, &[], d(2025, 6, 9));
    assert_eq!(score, 63.5);
    assert_eq!(explanation, "High importance, Quick win (< 2h)");
}

#[test]
fn scoring_is_deterministic() {
    let t = task(1, "Repeatable", d(2025, 6, 12), 2.5, 7);
    let first = priority_score(&t, &[], d(2025, 6, 9));
    let second = priority_score(&t, &[], d(2025, 6, 9));
    assert_eq!(first, second);
}
