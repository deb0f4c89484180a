use serde::{
  Serialize,
  de::DeserializeOwned
};
use taskdeck_gui_shared::{
  ApiAck,
  ApiError,
  ApiReply,
  TaskDto,
  TaskIdArg,
  TaskTrashArgs,
  TrashMarker,
  UiLogArg
};
use tauri_wasm::{
  args,
  invoke
};
use uuid::Uuid;

use crate::menu::TaskMutation;

#[derive(Serialize)]
struct CommandArgs<'a, A: Serialize> {
  args: &'a A
}

/// Invokes a backend command. Failures
/// below the reply envelope are
/// reported as transport errors.
pub async fn invoke_tauri<R, A>(
  cmd: &str,
  args_payload: &A
) -> Result<ApiAck<R>, ApiError>
where
  R: DeserializeOwned,
  A: Serialize
{
  let command_args = CommandArgs {
    args: args_payload
  };
  let payload = args(&command_args)
  .map_err(|e| {
    ApiError::transport(format!(
      "failed to encode args: {e}"
    ))
  })?;
  let value = invoke(cmd)
    .with_args(payload)
    .await
    .map_err(|e| {
      ApiError::transport(format!(
        "invoke error: {e:?}"
      ))
    })?;

  let reply: ApiReply<R> =
    serde_wasm_bindgen::from_value(value)
      .map_err(|e| {
        ApiError::transport(format!(
          "decode error: {e}"
        ))
      })?;
  reply.into_result()
}

pub async fn duplicate_task(
  uuid: Uuid
) -> Result<ApiAck<TaskDto>, ApiError> {
  invoke_tauri(
    "task_duplicate",
    &TaskIdArg { uuid }
  )
  .await
}

pub async fn trash_task(
  uuid: Uuid,
  marker: TrashMarker
) -> Result<ApiAck<()>, ApiError> {
  invoke_tauri("task_trash", &TaskTrashArgs {
    uuid,
    is_trashed: marker
  })
  .await
}

/// Runs a menu mutation and keeps only
/// the server message.
pub async fn run_mutation(
  mutation: TaskMutation
) -> Result<String, ApiError> {
  match mutation {
    | TaskMutation::Duplicate(uuid) => {
      duplicate_task(uuid)
        .await
        .map(|ack| ack.message)
    }
    | TaskMutation::Trash {
      uuid,
      marker
    } => {
      trash_task(uuid, marker)
        .await
        .map(|ack| ack.message)
    }
  }
}

/// Fire-and-forget diagnostic forwarded
/// to the backend log.
pub fn log_ui_event(
  event: &str,
  detail: String
) {
  let arg = UiLogArg {
    event: event.to_string(),
    detail
  };
  wasm_bindgen_futures::spawn_local(
    async move {
      if let Err(err) =
        invoke_tauri::<(), _>(
          "ui_log", &arg
        )
        .await
      {
        tracing::warn!(error = %err, "ui_log failed");
      }
    }
  );
}
