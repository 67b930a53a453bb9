// Terminal rendering for messages, tables and history entries
use colored::Colorize;
use serde_json::Value;

use cricketchat_types::{HistoryEntry, Message, Role, TableData};

/// Sample questions shown while the conversation is empty
pub const EXAMPLE_QUESTIONS: [&str; 3] = [
    "Who has the most runs in Test cricket?",
    "Show top 5 ODI players by average",
    "List T20 players with strike rate above 140",
];

/// `batting_average` -> `BATTING AVERAGE`
pub fn humanize_header(column: &str) -> String {
    column.replace('_', " ").to_uppercase()
}

/// Null and absent cells render as `-`; strings without quotes
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Lay a table out as aligned plain-text lines: header, rule, then one line
/// per row. Rows shorter than the header are padded with `-`.
pub fn table_lines(table: &TableData) -> Vec<String> {
    let headers: Vec<String> = table.columns.iter().map(|c| humanize_header(c)).collect();
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            (0..headers.len())
                .map(|i| row.get(i).map(format_cell).unwrap_or_else(|| "-".to_string()))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let join = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" │ ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(join(&headers));
    lines.push(
        widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    lines.extend(rows.iter().map(|row| join(row)));
    lines
}

pub fn print_message(message: &Message) {
    match message.role {
        Role::User => println!("{} {}", "You:".bright_green().bold(), message.content),
        Role::Assistant => {
            println!("{} {}", "Assistant:".bright_cyan().bold(), message.content);
            if let Some(table) = message.table.as_ref().filter(|_| message.is_table()) {
                let lines = table_lines(table);
                for (i, line) in lines.iter().enumerate() {
                    if i == 0 {
                        println!("  {}", line.bold());
                    } else if i == 1 {
                        println!("  {}", line.bright_black());
                    } else {
                        println!("  {}", line);
                    }
                }
                println!(
                    "{}",
                    format!("  {} row(s)", table.rows.len()).bright_black()
                );
            }
        }
    }
}

pub fn print_welcome() {
    println!("{}", "Welcome to Cricket Stats Chat!".bright_cyan().bold());
    println!("Ask me anything about cricket statistics. Try:");
    for question in EXAMPLE_QUESTIONS {
        println!("  {} {}", "•".bright_yellow(), question);
    }
    println!();
}

pub fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("{}", "No history yet.".bright_black());
        return;
    }

    println!("{}", "Recent questions:".bright_cyan().bold());
    for entry in entries {
        let when = entry
            .timestamp
            .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("  {} {}", when.bright_black(), entry.question.bold());
        let answer = cricketchat_logging::safe_truncate(&entry.answer_text(), 120);
        if !answer.is_empty() {
            println!("    {}", answer);
        }
    }
}
