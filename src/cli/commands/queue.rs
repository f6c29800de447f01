//! Queue commands - enqueue, list, and count tasks.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::path::Path;

use crate::adapters::sqlite::{initialize_database, SqliteQueueStore};
use crate::cli::types::QueueCommands;
use crate::domain::models::Task;
use crate::domain::ports::QueueStore;
use crate::infrastructure::config::ConfigLoader;

pub async fn execute(
    command: QueueCommands,
    profile: &str,
    config_file: Option<&Path>,
    json_mode: bool,
) -> Result<()> {
    let config = ConfigLoader::load(profile, config_file)?;
    let pool =
        initialize_database(&config.database.path, config.database.max_connections).await?;
    let store = SqliteQueueStore::new(pool);

    match command {
        QueueCommands::Add { route, params } => add_task(&store, &route, params, json_mode).await,
        QueueCommands::List { limit } => list_tasks(&store, limit, json_mode).await,
        QueueCommands::Count => count_tasks(&store, json_mode).await,
    }
}

async fn add_task(
    store: &SqliteQueueStore,
    route: &str,
    params: Vec<(String, String)>,
    json_mode: bool,
) -> Result<()> {
    let id = store.enqueue(route, params).await?;

    if json_mode {
        let payload = serde_json::json!({ "id": id, "route": route });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("Task {id} added to queue");
    }
    Ok(())
}

async fn list_tasks(store: &SqliteQueueStore, limit: u32, json_mode: bool) -> Result<()> {
    let tasks = store.list(limit).await?;

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("Queue is empty");
        return Ok(());
    }

    println!("{}", render_task_table(&tasks));
    Ok(())
}

async fn count_tasks(store: &SqliteQueueStore, json_mode: bool) -> Result<()> {
    let tasks = store.count_all().await?;

    if json_mode {
        let payload = serde_json::json!({ "tasks": tasks });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("{tasks} tasks in queue");
    }
    Ok(())
}

fn render_task_table(tasks: &[Task]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Route", "Claimed", "Created", "Params"]);

    for task in tasks {
        let params = task
            .params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(task.id),
            Cell::new(&task.route),
            Cell::new(if task.claimed { "yes" } else { "no" }),
            Cell::new(task.created_at.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(truncate(&params, 60)),
        ]);
    }

    table
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let prefix: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{prefix}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate("cmd=true", 60), "cmd=true");
    }

    #[test]
    fn test_truncate_long_string() {
        let long = "x".repeat(100);
        let out = truncate(&long, 60);
        assert_eq!(out.chars().count(), 60);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_render_task_table_includes_all_rows() {
        use crate::domain::models::{Task, TaskId};
        use chrono::Utc;

        let tasks = vec![
            Task {
                id: TaskId(1),
                route: "shell".to_string(),
                params: vec![("cmd".to_string(), "true".to_string())],
                claimed: false,
                created_at: Utc::now(),
            },
            Task {
                id: TaskId(2),
                route: "shell".to_string(),
                params: vec![],
                claimed: true,
                created_at: Utc::now(),
            },
        ];

        let rendered = render_task_table(&tasks).to_string();
        assert!(rendered.contains("shell"));
        assert!(rendered.contains("cmd=true"));
        assert!(rendered.contains("yes"));
        assert!(rendered.contains("no"));
    }
}
