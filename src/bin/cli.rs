use chrono::{Local, NaiveDate};
use polars::prelude::{AnyValue, DataFrame};
use std::io::{self, Write};
use triage_tool::{
    RankingSummary, ScoredTask, Suggestion, TaskBoard, load_board_from_csv, load_board_from_json,
    save_board_to_csv, save_board_to_json,
};

fn parse_dep_list(s: &str) -> Vec<i32> {
    s.split(',')
        .filter_map(|p| p.trim().parse::<i32>().ok())
        .collect()
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    // Compute column widths
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for (ci, col) in columns.iter().enumerate() {
        for row_idx in 0..df.height() {
            if let Ok(ref av) = col.get(row_idx) {
                let s = render_any_value(av, col.name().as_str());
                if s.len() > widths[ci] {
                    widths[ci] = s.len();
                }
            }
        }
    }

    // Build horizontal separator
    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    // Build output
    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    // Header
    out.push('|');
    for (i, name) in col_names.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        let pad = widths[i] - name.len();
        if pad > 0 {
            out.push_str(&" ".repeat(pad));
        }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    // Rows
    for row_idx in 0..df.height() {
        out.push('|');
        for (ci, col) in columns.iter().enumerate() {
            let mut s = String::new();
            if let Ok(ref av) = col.get(row_idx) {
                s = render_any_value(av, col.name().as_str());
            }
            out.push(' ');
            out.push_str(&s);
            let pad = widths[ci].saturating_sub(s.len());
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_any_value(av: &AnyValue, column_name: &str) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::Float64(v) => v.to_string(),
        AnyValue::Boolean(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::List(inner) if column_name == "dependencies" => {
            if let Ok(ca) = inner.i32() {
                ca.into_iter()
                    .flatten()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            } else {
                av.to_string()
            }
        }
        _ => av.to_string(),
    }
}

fn render_ranking(ranking: &[ScoredTask]) -> String {
    let mut out = String::new();
    for entry in ranking {
        out.push_str(&format!(
            "{:>8.2}  #{:<4} {:<24} due {}  {}\n",
            entry.priority_score, entry.id, entry.title, entry.due_date, entry.explanation
        ));
    }
    out
}

fn render_suggestions(suggestions: &[Suggestion]) -> String {
    let mut out = String::new();
    for (rank, suggestion) in suggestions.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} ({:.2}) - {}\n",
            rank + 1,
            suggestion.title,
            suggestion.score,
            suggestion.reason
        ));
    }
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show current board\n  add <title> <YYYY-MM-DD> <hours> <importance> [deps_csv]\n                                     Create a task (deps like 1,2,3)\n  depend <id> <dep_id>               Make task <id> depend on <dep_id>\n  complete <id>                      Mark a task completed\n  delete <id>                        Delete a task and clean up dependencies\n  analyze [YYYY-MM-DD]               Rank open tasks by priority\n  suggest [YYYY-MM-DD]               Suggest the top 3 actionable tasks\n  meta show                          Show board metadata\n  meta name <text...>                Update board name\n  meta desc <text...>                Update board description\n  save <json|csv> <path>             Persist board to disk\n  load <json|csv> <path>             Load board from disk\n  quit|exit                          Exit"
    );
}

fn print_metadata(board: &TaskBoard) {
    let metadata = board.metadata();
    println!("Board name       : {}", metadata.board_name);
    println!("Board description: {}", metadata.board_description);
}

fn parse_today(arg: Option<&str>) -> Result<NaiveDate, ()> {
    match arg {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ()),
        None => Ok(Local::now().date_naive()),
    }
}

fn main() {
    let mut board = TaskBoard::new();

    println!("Task Triage (CLI) - type 'help' for commands\n");
    println!("{}", render_df_as_text_table(board.dataframe()));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        if stdin.read_line(&mut line).is_err() {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => {
                print_help();
            }
            "quit" | "exit" => break,
            "show" => {
                println!("{}", render_df_as_text_table(board.dataframe()));
            }
            "add" => {
                let title_s = parts.next();
                let due_s = parts.next();
                let hours_s = parts.next();
                let importance_s = parts.next();
                let deps_s = parts.next();
                match (title_s, due_s, hours_s, importance_s) {
                    (Some(title), Some(due_s), Some(hours_s), Some(importance_s)) => {
                        let due_date = match NaiveDate::parse_from_str(due_s, "%Y-%m-%d") {
                            Ok(d) => d,
                            Err(_) => {
                                println!("Invalid date (YYYY-MM-DD)");
                                continue;
                            }
                        };
                        let estimated_hours: f64 = match hours_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid hours");
                                continue;
                            }
                        };
                        let importance: i32 = match importance_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid importance");
                                continue;
                            }
                        };
                        let dependencies = deps_s.map(parse_dep_list).unwrap_or_default();
                        match board.add_task(title, due_date, estimated_hours, importance, dependencies)
                        {
                            Ok(task) => {
                                println!("Task {} created.", task.id);
                                println!("{}", render_df_as_text_table(board.dataframe()));
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => {
                        println!("Usage: add <title> <YYYY-MM-DD> <hours> <importance> [deps_csv]");
                    }
                }
            }
            "depend" => {
                let id_s = parts.next();
                let dep_s = parts.next();
                match (id_s, dep_s) {
                    (Some(id_s), Some(dep_s)) => {
                        let id: i32 = match id_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid id");
                                continue;
                            }
                        };
                        let dep_id: i32 = match dep_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid dep_id");
                                continue;
                            }
                        };
                        match board.add_dependency(id, dep_id) {
                            Ok(_) => {
                                println!("Task {} now depends on {}.", id, dep_id);
                                println!("{}", render_df_as_text_table(board.dataframe()));
                            }
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: depend <id> <dep_id>"),
                }
            }
            "complete" => {
                let id_s = parts.next();
                match id_s {
                    Some(id_s) => match id_s.parse::<i32>() {
                        Ok(id) => match board.complete_task(id) {
                            Ok(true) => {
                                println!("Task {id} completed.");
                                println!("{}", render_df_as_text_table(board.dataframe()));
                            }
                            Ok(false) => println!("Task {id} not found."),
                            Err(e) => println!("Error completing task: {}", e),
                        },
                        Err(_) => println!("Invalid id"),
                    },
                    None => println!("Usage: complete <id>"),
                }
            }
            "delete" => {
                let id_s = parts.next();
                match id_s {
                    Some(id_s) => match id_s.parse::<i32>() {
                        Ok(id) => match board.delete_task(id) {
                            Ok(true) => {
                                println!("Deleted task {id}.");
                                println!("{}", render_df_as_text_table(board.dataframe()));
                            }
                            Ok(false) => println!("Task {id} not found."),
                            Err(e) => println!("Error deleting task: {}", e),
                        },
                        Err(_) => println!("Invalid id"),
                    },
                    None => println!("Usage: delete <id>"),
                }
            }
            "analyze" => {
                let today = match parse_today(parts.next()) {
                    Ok(d) => d,
                    Err(_) => {
                        println!("Invalid date (YYYY-MM-DD)");
                        continue;
                    }
                };
                match board.rank(today) {
                    Ok(ranking) => {
                        let summary = RankingSummary::from_ranking(&ranking);
                        println!(
                            "Analyzed ({})\n{}",
                            summary.to_cli_summary(),
                            render_ranking(&ranking)
                        );
                    }
                    Err(e) => println!("Analyze error: {}", e),
                }
            }
            "suggest" => {
                let today = match parse_today(parts.next()) {
                    Ok(d) => d,
                    Err(_) => {
                        println!("Invalid date (YYYY-MM-DD)");
                        continue;
                    }
                };
                match board.suggest(today) {
                    Ok(suggestions) => {
                        if suggestions.is_empty() {
                            println!("No actionable tasks.");
                        } else {
                            println!("{}", render_suggestions(&suggestions));
                        }
                    }
                    Err(e) => println!("Suggest error: {}", e),
                }
            }
            "meta" => match parts.next() {
                Some("show") | None => print_metadata(&board),
                Some("name") => {
                    let rest: Vec<&str> = parts.collect();
                    if rest.is_empty() {
                        println!("Usage: meta name <text...>");
                        continue;
                    }
                    let name = rest.join(" ");
                    match board.set_board_name(name) {
                        Ok(_) => {
                            println!("Board name updated.");
                            print_metadata(&board);
                        }
                        Err(e) => println!("Metadata update error: {}", e),
                    }
                }
                Some("desc") => {
                    let rest: Vec<&str> = parts.collect();
                    if rest.is_empty() {
                        println!("Usage: meta desc <text...>");
                        continue;
                    }
                    let desc = rest.join(" ");
                    board.set_board_description(desc);
                    println!("Board description updated.");
                    print_metadata(&board);
                }
                Some(other) => {
                    println!("Unknown meta command '{}'.", other);
                    println!("Usage: meta show|name|desc ...");
                }
            },
            "save" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some("json"), Some(path)) => match save_board_to_json(&board, path) {
                        Ok(_) => println!("Board saved to {}.", path),
                        Err(e) => println!("Error saving board: {}", e),
                    },
                    (Some("csv"), Some(path)) => match save_board_to_csv(&board, path) {
                        Ok(_) => println!("Board saved to {}.", path),
                        Err(e) => println!("Error saving board: {}", e),
                    },
                    _ => println!("Usage: save <json|csv> <path>"),
                }
            }
            "load" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some("json"), Some(path)) => match load_board_from_json(path) {
                        Ok(loaded) => {
                            board = loaded;
                            println!("Board loaded from {}.", path);
                            println!("{}", render_df_as_text_table(board.dataframe()));
                        }
                        Err(e) => println!("Error loading board: {}", e),
                    },
                    (Some("csv"), Some(path)) => match load_board_from_csv(path) {
                        Ok(loaded) => {
                            board = loaded;
                            println!("Board loaded from {}.", path);
                            println!("{}", render_df_as_text_table(board.dataframe()));
                        }
                        Err(e) => println!("Error loading board: {}", e),
                    },
                    _ => println!("Usage: load <json|csv> <path>"),
                }
            }
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
