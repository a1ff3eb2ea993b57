//! Walkthrough of every repository operation against sample data.

use chrono::NaiveDate;
use tododactyl::{TodoItem, TodoRepository, errors::Result};
use tracing::info;

fn sample_todos() -> Vec<TodoItem> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();

    vec![
        TodoItem::new("Learn Rust", ["programming", "rust"], date(2023, 12, 31)),
        TodoItem::new("Build a Todo App", ["project", "practice"], date(2024, 1, 15)),
        TodoItem::new("Write Unit Tests", ["testing", "quality"], date(2024, 2, 1)),
    ]
}

pub async fn run(repo: &TodoRepository) -> Result<()> {
    info!("=== Demonstration of TodoRepository methods ===");

    for todo in sample_todos() {
        let inserted = repo.insert(todo).await?;
        info!(id = inserted.id, description = %inserted.description, "Inserted");
    }

    let todos = repo.list_all().await?;
    info!(count = todos.len(), "All todos: {todos:?}");

    let Some(first) = todos.first() else {
        return Ok(());
    };

    let found = repo.find_by_id(first.id).await?;
    info!(id = first.id, "Found todo by id: {found:?}");

    let updated = TodoItem {
        description: "Learn Advanced Rust".to_string(),
        ..first.clone()
    };
    repo.update(&updated).await?;
    info!(id = updated.id, description = %updated.description, "Updated");

    let removed = repo.remove_by_id(first.id).await?;
    info!(id = removed.id, "Removed");

    Ok(())
}
