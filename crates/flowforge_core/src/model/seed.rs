//! Seeded default board used on first launch and as the load fallback.

use super::board::Board;
use super::column::Column;
use super::ids::{ColumnId, TaskId};
use super::task::Task;
use chrono::{Duration, Utc};

/// Builds the example board shown before any user data exists.
pub fn default_board() -> Board {
    let now = Utc::now();
    let seeded_task = |id: &str, title: &str, description: &str, tags: &[&str]| {
        let mut task = Task::with_id(TaskId::new(id), title, description, now);
        task.tags = tags.iter().map(|tag| (*tag).to_string()).collect();
        task
    };

    let mut design = seeded_task(
        "task-progress-1",
        "Design kanban board UI",
        "Create layout wireframes and color palette.",
        &["design", "ui"],
    );
    design.due_date = Some(now + Duration::days(3));

    let tasks = [
        seeded_task(
            "task-inbox-1",
            "Collect project requirements",
            "Schedule kick-off call and gather user stories from stakeholders.",
            &["discovery"],
        ),
        seeded_task(
            "task-inbox-2",
            "audit existing workflows",
            "Capture current process pain points and blockers.",
            &["research"],
        ),
        design,
        seeded_task(
            "task-review-1",
            "Conduct usability testing",
            "Test drag & drop interactions with 5 users.",
            &["research", "ux"],
        ),
    ];

    let columns = [
        ("inbox", "Backlog", &["task-inbox-1", "task-inbox-2"][..]),
        ("progress", "In Progress", &["task-progress-1"][..]),
        ("review", "Review", &["task-review-1"][..]),
        ("done", "Done", &[][..]),
    ];

    let mut board = Board::new();
    for task in tasks {
        board.tasks.insert(task.id.clone(), task);
    }
    for (id, title, task_ids) in columns {
        let mut column = Column::with_id(ColumnId::new(id), title);
        column.task_ids = task_ids.iter().map(|task_id| TaskId::new(*task_id)).collect();
        board.column_order.push(column.id.clone());
        board.columns.insert(column.id.clone(), column);
    }
    board
}
