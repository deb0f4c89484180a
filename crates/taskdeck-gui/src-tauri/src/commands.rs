use taskdeck_gui_shared::{
  ApiReply,
  SubTaskAddArgs,
  TaskCreate,
  TaskDto,
  TaskIdArg,
  TaskTrashArgs,
  TaskUpdateArgs,
  TasksListArgs,
  TrashMarker,
  UiLogArg,
  UserDto
};
use tauri::State;
use tracing::{
  error,
  info,
  instrument
};

use crate::state::AppState;

type CommandResult<T> =
  Result<ApiReply<T>, String>;

/// Application failures travel inside
/// the reply; the `Err` side is left to
/// IPC-level failures.
fn reply<T>(
  command: &str,
  request_id: Option<&str>,
  result: anyhow::Result<T>,
  message: &str
) -> CommandResult<T> {
  match result {
    | Ok(data) => {
      Ok(ApiReply::ok(message, data))
    }
    | Err(err) => {
      error!(command, request_id = ?request_id, error = %err, "command failed");
      Ok(ApiReply::error(err.to_string()))
    }
  }
}

fn trash_message(
  marker: TrashMarker
) -> &'static str {
  match marker {
    | TrashMarker::Trash => {
      "Task trashed successfully."
    }
    | TrashMarker::Restore => {
      "Task restored successfully."
    }
  }
}

#[tauri::command]
#[instrument(skip(state), fields(request_id = ?request_id))]
pub async fn session_user(
  state: State<'_, AppState>,
  request_id: Option<String>
) -> CommandResult<UserDto> {
  info!(request_id = ?request_id, "session_user command invoked");
  reply(
    "session_user",
    request_id.as_deref(),
    Ok(state.session()),
    "Session loaded."
  )
}

#[tauri::command]
#[instrument(skip(state), fields(request_id = ?request_id, stage = ?args.stage, include_trashed = args.include_trashed))]
pub async fn tasks_list(
  state: State<'_, AppState>,
  args: TasksListArgs,
  request_id: Option<String>
) -> CommandResult<Vec<TaskDto>> {
  info!(request_id = ?request_id, "tasks_list command invoked");
  reply(
    "tasks_list",
    request_id.as_deref(),
    state.list(args),
    "Tasks loaded."
  )
}

#[tauri::command]
#[instrument(skip(state), fields(request_id = ?request_id, uuid = %args.uuid))]
pub async fn task_get(
  state: State<'_, AppState>,
  args: TaskIdArg,
  request_id: Option<String>
) -> CommandResult<TaskDto> {
  info!(request_id = ?request_id, uuid = %args.uuid, "task_get command invoked");
  reply(
    "task_get",
    request_id.as_deref(),
    state.get(args.uuid),
    "Task loaded."
  )
}

#[tauri::command]
#[instrument(skip(state), fields(request_id = ?request_id, title_len = args.title.len()))]
pub async fn task_add(
  state: State<'_, AppState>,
  args: TaskCreate,
  request_id: Option<String>
) -> CommandResult<TaskDto> {
  info!(
    request_id = ?request_id,
    title_len = args.title.len(),
    has_date = args.date.is_some(),
    "task_add command invoked"
  );
  reply(
    "task_add",
    request_id.as_deref(),
    state.add(args),
    "Task created successfully."
  )
}

#[tauri::command]
#[instrument(skip(state), fields(request_id = ?request_id, uuid = %args.uuid))]
pub async fn task_update(
  state: State<'_, AppState>,
  args: TaskUpdateArgs,
  request_id: Option<String>
) -> CommandResult<TaskDto> {
  info!(request_id = ?request_id, uuid = %args.uuid, "task_update command invoked");
  reply(
    "task_update",
    request_id.as_deref(),
    state.update(args),
    "Task updated successfully."
  )
}

#[tauri::command]
#[instrument(skip(state), fields(request_id = ?request_id, uuid = %args.uuid))]
pub async fn task_duplicate(
  state: State<'_, AppState>,
  args: TaskIdArg,
  request_id: Option<String>
) -> CommandResult<TaskDto> {
  info!(request_id = ?request_id, uuid = %args.uuid, "task_duplicate command invoked");
  reply(
    "task_duplicate",
    request_id.as_deref(),
    state.duplicate(args.uuid),
    "Task duplicated successfully."
  )
}

#[tauri::command]
#[instrument(skip(state), fields(request_id = ?request_id, uuid = %args.uuid, marker = ?args.is_trashed))]
pub async fn task_trash(
  state: State<'_, AppState>,
  args: TaskTrashArgs,
  request_id: Option<String>
) -> CommandResult<()> {
  info!(request_id = ?request_id, uuid = %args.uuid, "task_trash command invoked");
  let message =
    trash_message(args.is_trashed);
  reply(
    "task_trash",
    request_id.as_deref(),
    state.trash(args),
    message
  )
}

#[tauri::command]
#[instrument(skip(state), fields(request_id = ?request_id, uuid = %args.uuid))]
pub async fn subtask_add(
  state: State<'_, AppState>,
  args: SubTaskAddArgs,
  request_id: Option<String>
) -> CommandResult<TaskDto> {
  info!(request_id = ?request_id, uuid = %args.uuid, "subtask_add command invoked");
  reply(
    "subtask_add",
    request_id.as_deref(),
    state.add_sub_task(args),
    "SubTask added successfully."
  )
}

#[tauri::command]
#[instrument(fields(request_id = ?request_id, event = %args.event))]
pub async fn ui_log(
  args: UiLogArg,
  request_id: Option<String>
) -> CommandResult<()> {
  info!(request_id = ?request_id, event = %args.event, detail = %args.detail, "ui interaction");
  Ok(ApiReply::ok("logged", ()))
}

#[cfg(test)]
mod tests {
  use anyhow::anyhow;
  use serde_json::json;
  use taskdeck_gui_shared::TrashMarker;

  use super::{
    reply,
    trash_message
  };

  #[test]
  fn failed_result_becomes_error_envelope()
   {
    let out = reply::<()>(
      "task_trash",
      Some("req-1"),
      Err(anyhow!("task not found: x")),
      "Task trashed successfully."
    )
    .unwrap();

    assert_eq!(
      serde_json::to_value(&out).unwrap(),
      json!({
        "status": "error",
        "data": { "message": "task not found: x" }
      })
    );
  }

  #[test]
  fn successful_result_carries_command_message()
   {
    let out = reply(
      "task_duplicate",
      None,
      Ok(()),
      "Task duplicated successfully."
    )
    .unwrap();

    assert_eq!(
      serde_json::to_value(&out).unwrap(),
      json!({
        "status": "ok",
        "message": "Task duplicated successfully.",
        "data": null
      })
    );
  }

  #[test]
  fn trash_marker_selects_message() {
    assert_eq!(
      trash_message(TrashMarker::Trash),
      "Task trashed successfully."
    );
    assert_eq!(
      trash_message(TrashMarker::Restore),
      "Task restored successfully."
    );
  }
}
