use chrono::{TimeZone, Utc};
use flowforge_core::{
    apply_move, Board, BoardSnapshot, Column, ColumnId, Location, MoveKind, MoveResolution, Task,
    TaskId,
};
use std::sync::Arc;

fn board_with(columns: &[(&str, &[&str])]) -> BoardSnapshot {
    let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let mut board = Board::new();
    for (column_id, task_ids) in columns {
        let mut column = Column::with_id(ColumnId::new(*column_id), *column_id);
        for task_id in *task_ids {
            let task = Task::with_id(TaskId::new(*task_id), *task_id, "", created_at);
            column.task_ids.push(task.id.clone());
            board.tasks.insert(task.id.clone(), task);
        }
        board.column_order.push(column.id.clone());
        board.columns.insert(column.id.clone(), column);
    }
    board.validate().unwrap();
    Arc::new(board)
}

fn ids(board: &Board, column_id: &str) -> Vec<String> {
    board
        .column(&ColumnId::new(column_id))
        .unwrap()
        .task_ids
        .iter()
        .map(|id| id.as_str().to_string())
        .collect()
}

fn task_move(task: &str, from: (&str, usize), to: (&str, usize)) -> MoveResolution {
    MoveResolution::task(
        &TaskId::new(task),
        (&ColumnId::new(from.0), from.1),
        Some((&ColumnId::new(to.0), to.1)),
    )
}

#[test]
fn task_moves_into_empty_column() {
    let board = board_with(&[("backlog", &["t1", "t2"]), ("done", &[])]);

    let next = apply_move(&board, &task_move("t1", ("backlog", 0), ("done", 0)));

    assert_eq!(ids(&next, "backlog"), vec!["t2"]);
    assert_eq!(ids(&next, "done"), vec!["t1"]);
}

#[test]
fn column_moves_to_front() {
    let board = board_with(&[("a", &[]), ("b", &[]), ("c", &[])]);

    let next = apply_move(
        &board,
        &MoveResolution::column(&ColumnId::new("b"), 1, Some(0)),
    );

    assert_eq!(
        next.column_order,
        vec![ColumnId::new("b"), ColumnId::new("a"), ColumnId::new("c")]
    );
}

#[test]
fn same_column_move_uses_post_removal_index() {
    let board = board_with(&[("todo", &["a", "b", "c", "d"])]);

    let down = apply_move(&board, &task_move("a", ("todo", 0), ("todo", 2)));
    assert_eq!(ids(&down, "todo"), vec!["b", "c", "a", "d"]);

    let up = apply_move(&board, &task_move("d", ("todo", 3), ("todo", 1)));
    assert_eq!(ids(&up, "todo"), vec!["a", "d", "b", "c"]);
}

#[test]
fn cross_column_move_conserves_tasks() {
    let board = board_with(&[("left", &["a", "b", "c"]), ("right", &["x", "y"])]);

    let next = apply_move(&board, &task_move("b", ("left", 1), ("right", 1)));

    assert_eq!(ids(&next, "left"), vec!["a", "c"]);
    assert_eq!(ids(&next, "right"), vec!["x", "b", "y"]);
    assert_eq!(next.tasks, board.tasks);
    let placed: usize = next.columns.values().map(|column| column.task_ids.len()).sum();
    assert_eq!(placed, board.task_count());
    next.validate().unwrap();
}

#[test]
fn destination_index_past_end_appends() {
    let board = board_with(&[("left", &["a"]), ("right", &["x"])]);

    let next = apply_move(&board, &task_move("a", ("left", 0), ("right", 42)));

    assert_eq!(ids(&next, "right"), vec!["x", "a"]);
}

#[test]
fn in_place_and_dropped_outside_moves_return_same_snapshot() {
    let board = board_with(&[("todo", &["a", "b"])]);

    let in_place = apply_move(&board, &task_move("a", ("todo", 0), ("todo", 0)));
    assert!(Arc::ptr_eq(&board, &in_place));

    let dropped = MoveResolution::task(&TaskId::new("a"), (&ColumnId::new("todo"), 0), None);
    assert!(Arc::ptr_eq(&board, &apply_move(&board, &dropped)));

    let column_in_place = MoveResolution::column(&ColumnId::new("todo"), 0, Some(0));
    assert!(Arc::ptr_eq(&board, &apply_move(&board, &column_in_place)));
}

#[test]
fn stale_or_unknown_moves_are_ignored() {
    let board = board_with(&[("left", &["a", "b"]), ("right", &[])]);

    let wrong_index = task_move("a", ("left", 1), ("right", 0));
    assert!(Arc::ptr_eq(&board, &apply_move(&board, &wrong_index)));

    let unknown_column = task_move("a", ("left", 0), ("ghost", 0));
    assert!(Arc::ptr_eq(&board, &apply_move(&board, &unknown_column)));

    let unknown_task = task_move("zzz", ("left", 0), ("right", 0));
    assert!(Arc::ptr_eq(&board, &apply_move(&board, &unknown_task)));

    let stale_column = MoveResolution::column(&ColumnId::new("right"), 0, Some(1));
    assert!(Arc::ptr_eq(&board, &apply_move(&board, &stale_column)));
}

#[test]
fn move_resolution_uses_camel_case_wire_shape() {
    let resolution = task_move("a", ("left", 0), ("right", 2));

    let json = serde_json::to_value(&resolution).unwrap();

    assert_eq!(json["kind"], "task");
    assert_eq!(json["movedId"], "a");
    assert_eq!(json["source"]["containerId"], "left");
    assert_eq!(json["destination"]["index"], 2);

    let parsed: MoveResolution = serde_json::from_value(json).unwrap();
    assert_eq!(parsed.kind, MoveKind::Task);
    assert_eq!(parsed.destination, Some(Location::new("right", 2)));
}
