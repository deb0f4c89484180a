use serde::{
  Deserialize,
  Serialize
};
use uuid::Uuid;

const REQUEST_FAILED: &str =
  "Request failed";

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStage {
  Todo,
  InProgress,
  Completed
}

impl TaskStage {
  pub const ALL: [TaskStage; 3] = [
    TaskStage::Todo,
    TaskStage::InProgress,
    TaskStage::Completed
  ];

  pub fn label(self) -> &'static str {
    match self {
      | TaskStage::Todo => "todo",
      | TaskStage::InProgress => {
        "in progress"
      }
      | TaskStage::Completed => {
        "completed"
      }
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
  High,
  Medium,
  Normal,
  Low
}

impl TaskPriority {
  pub const ALL: [TaskPriority; 4] = [
    TaskPriority::High,
    TaskPriority::Medium,
    TaskPriority::Normal,
    TaskPriority::Low
  ];

  pub fn label(self) -> &'static str {
    match self {
      | TaskPriority::High => "high",
      | TaskPriority::Medium => "medium",
      | TaskPriority::Normal => "normal",
      | TaskPriority::Low => "low"
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct SubTaskDto {
  pub uuid:  Uuid,
  pub title: String,
  pub date:  String,
  #[serde(default)]
  pub tag:   String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct TaskDto {
  pub uuid:       Uuid,
  pub title:      String,
  pub date:       String,
  pub priority:   TaskPriority,
  pub stage:      TaskStage,
  #[serde(default)]
  pub sub_tasks:  Vec<SubTaskDto>,
  #[serde(default)]
  pub is_trashed: bool,
  pub created:    String,
  pub modified:   String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  Default,
)]
pub struct TasksListArgs {
  pub stage:           Option<TaskStage>,
  #[serde(default)]
  pub include_trashed: bool
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskCreate {
  pub title:    String,
  pub date:     Option<String>,
  pub priority: TaskPriority,
  pub stage:    TaskStage
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  Default,
)]
pub struct TaskPatch {
  pub title:    Option<String>,
  pub date:     Option<String>,
  pub priority: Option<TaskPriority>,
  pub stage:    Option<TaskStage>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskIdArg {
  pub uuid: Uuid
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskUpdateArgs {
  pub uuid:  Uuid,
  pub patch: TaskPatch
}

/// Soft-delete state carried by the
/// trash mutation.
#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum TrashMarker {
  Trash,
  Restore
}

impl TrashMarker {
  pub fn is_trashed(self) -> bool {
    matches!(self, TrashMarker::Trash)
  }
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TaskTrashArgs {
  pub uuid:       Uuid,
  pub is_trashed: TrashMarker
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct SubTaskCreate {
  pub title: String,
  pub date:  Option<String>,
  #[serde(default)]
  pub tag:   String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct SubTaskAddArgs {
  pub uuid:     Uuid,
  pub sub_task: SubTaskCreate
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct UserDto {
  pub id:       String,
  pub name:     String,
  #[serde(default)]
  pub is_admin: bool
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct UiLogArg {
  pub event:  String,
  pub detail: String
}

#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ErrorData {
  #[serde(default)]
  pub message: Option<String>
}

impl ErrorData {
  fn message_or_fallback(&self) -> &str {
    self
      .message
      .as_deref()
      .filter(|message| {
        !message.trim().is_empty()
      })
      .unwrap_or(REQUEST_FAILED)
  }
}

/// Envelope every backend command
/// replies with.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
#[serde(
  tag = "status",
  rename_all = "snake_case"
)]
pub enum ApiReply<T> {
  Ok { message: String, data: T },
  Error { data: ErrorData }
}

impl<T> ApiReply<T> {
  pub fn ok(
    message: impl Into<String>,
    data: T
  ) -> Self {
    ApiReply::Ok {
      message: message.into(),
      data
    }
  }

  pub fn error(
    message: impl Into<String>
  ) -> Self {
    ApiReply::Error {
      data: ErrorData {
        message: Some(message.into())
      }
    }
  }

  pub fn into_result(
    self
  ) -> Result<ApiAck<T>, ApiError> {
    match self {
      | ApiReply::Ok {
        message,
        data
      } => Ok(ApiAck { message, data }),
      | ApiReply::Error { data } => {
        Err(ApiError::Application { data })
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiAck<T> {
  pub message: String,
  pub data:    T
}

/// Failure of a backend call as seen by
/// the frontend.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  thiserror::Error,
)]
pub enum ApiError {
  /// The backend answered with an
  /// error reply.
  #[error("{}", .data.message_or_fallback())]
  Application { data: ErrorData },
  /// The call never produced a usable
  /// reply.
  #[error("{error}")]
  Transport { error: String }
}

impl ApiError {
  pub fn transport(
    error: impl Into<String>
  ) -> Self {
    ApiError::Transport {
      error: error.into()
    }
  }

  /// Text shown to the user: the
  /// application message when present,
  /// else the transport error.
  pub fn user_message(&self) -> String {
    self.to_string()
  }
}

pub fn task_route(uuid: Uuid) -> String {
  format!("/task/{uuid}")
}
