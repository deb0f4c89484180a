//! State and decisions behind the
//! per-task action menu. Nothing here
//! touches the DOM, so the rules are
//! exercised directly in tests.

use std::future::Future;
use std::rc::Rc;

use taskdeck_gui_shared::{
  ApiError,
  TrashMarker,
  UserDto
};
use uuid::Uuid;
use yew::Reducible;

use crate::toast::ToastLevel;

/// Delay between a successful mutation
/// and the dialog close + list refresh.
pub const SETTLE_DELAY_MS: u32 = 500;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ActionKind {
  Open,
  Edit,
  AddSubTask,
  Duplicate,
  Delete
}

impl ActionKind {
  pub fn label(self) -> &'static str {
    match self {
      | ActionKind::Open => "Open Task",
      | ActionKind::Edit => "Edit",
      | ActionKind::AddSubTask => {
        "Add Sub-Task"
      }
      | ActionKind::Duplicate => {
        "Duplicate"
      }
      | ActionKind::Delete => "Delete"
    }
  }

  pub fn icon(self) -> ActionIcon {
    match self {
      | ActionKind::Open => {
        ActionIcon::FolderOpen
      }
      | ActionKind::Edit => {
        ActionIcon::Pencil
      }
      | ActionKind::AddSubTask => {
        ActionIcon::Plus
      }
      | ActionKind::Duplicate => {
        ActionIcon::Copy
      }
      | ActionKind::Delete => {
        ActionIcon::Bin
      }
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ActionIcon {
  FolderOpen,
  Pencil,
  Plus,
  Copy,
  Bin
}

impl ActionIcon {
  pub fn glyph(self) -> &'static str {
    match self {
      | ActionIcon::FolderOpen => "📂",
      | ActionIcon::Pencil => "✎",
      | ActionIcon::Plus => "＋",
      | ActionIcon::Copy => "⧉",
      | ActionIcon::Bin => "🗑"
    }
  }
}

const OPEN_ONLY_ACTIONS: &[ActionKind] =
  &[ActionKind::Open];

const FULL_ADMIN_ACTIONS: &[ActionKind] =
  &[
    ActionKind::Open,
    ActionKind::Edit,
    ActionKind::AddSubTask,
    ActionKind::Duplicate
  ];

/// Actions a user may see, keyed by
/// capability rather than list position.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ActionSet {
  OpenOnly,
  FullAdminSet
}

impl ActionSet {
  pub fn for_user(
    user: Option<&UserDto>
  ) -> Self {
    match user {
      | Some(user) if user.is_admin => {
        ActionSet::FullAdminSet
      }
      | _ => ActionSet::OpenOnly
    }
  }

  /// Entries of the main menu group.
  /// Delete is rendered separately.
  pub fn menu_actions(
    self
  ) -> &'static [ActionKind] {
    match self {
      | ActionSet::OpenOnly => {
        OPEN_ONLY_ACTIONS
      }
      | ActionSet::FullAdminSet => {
        FULL_ADMIN_ACTIONS
      }
    }
  }

  pub fn has_delete(self) -> bool {
    matches!(
      self,
      ActionSet::FullAdminSet
    )
  }

  pub fn allows(
    self,
    kind: ActionKind
  ) -> bool {
    match kind {
      | ActionKind::Delete => {
        self.has_delete()
      }
      | other => {
        self.menu_actions().contains(&other)
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionEntry {
  pub kind:  ActionKind,
  pub label: &'static str,
  pub icon:  ActionIcon
}

pub fn visible_actions(
  set: ActionSet
) -> Vec<ActionEntry> {
  set
    .menu_actions()
    .iter()
    .map(|kind| {
      ActionEntry {
        kind:  *kind,
        label: kind.label(),
        icon:  kind.icon()
      }
    })
    .collect()
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum MutationKind {
  Duplicate,
  Trash
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum TaskMutation {
  Duplicate(Uuid),
  Trash {
    uuid:   Uuid,
    marker: TrashMarker
  }
}

impl TaskMutation {
  pub fn kind(self) -> MutationKind {
    match self {
      | TaskMutation::Duplicate(_) => {
        MutationKind::Duplicate
      }
      | TaskMutation::Trash { .. } => {
        MutationKind::Trash
      }
    }
  }

  pub fn command(self) -> &'static str {
    match self {
      | TaskMutation::Duplicate(_) => {
        "task_duplicate"
      }
      | TaskMutation::Trash { .. } => {
        "task_trash"
      }
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub enum DeleteFlow {
  #[default]
  Idle,
  ConfirmPending,
  Mutating,
  Settled
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum MenuCommand {
  OpenEdit,
  CloseEdit,
  OpenAddSubTask,
  CloseAddSubTask,
  RequestDelete,
  CancelDelete,
  ConfirmDelete,
  MutationFailed(MutationKind),
  Settle(MutationKind)
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub struct MenuState {
  pub edit_open:        bool,
  pub add_subtask_open: bool,
  pub confirm_open:     bool,
  pub delete_flow:      DeleteFlow
}

impl MenuState {
  pub fn can_confirm(&self) -> bool {
    self.delete_flow
      == DeleteFlow::ConfirmPending
  }

  pub fn is_deleting(&self) -> bool {
    self.delete_flow
      == DeleteFlow::Mutating
  }

  pub fn apply(
    mut self,
    command: MenuCommand
  ) -> Self {
    match command {
      | MenuCommand::OpenEdit => {
        self.edit_open = true;
      }
      | MenuCommand::CloseEdit => {
        self.edit_open = false;
      }
      | MenuCommand::OpenAddSubTask => {
        self.add_subtask_open = true;
      }
      | MenuCommand::CloseAddSubTask => {
        self.add_subtask_open = false;
      }
      | MenuCommand::RequestDelete => {
        if !self.is_deleting() {
          self.confirm_open = true;
          self.delete_flow =
            DeleteFlow::ConfirmPending;
        }
      }
      | MenuCommand::CancelDelete => {
        self.confirm_open = false;
        if self.can_confirm() {
          self.delete_flow =
            DeleteFlow::Idle;
        }
      }
      | MenuCommand::ConfirmDelete => {
        if self.can_confirm() {
          self.delete_flow =
            DeleteFlow::Mutating;
        }
      }
      | MenuCommand::MutationFailed(
        MutationKind::Trash
      ) => {
        if self.is_deleting() {
          self.delete_flow =
            if self.confirm_open {
              DeleteFlow::ConfirmPending
            } else {
              DeleteFlow::Idle
            };
        }
      }
      | MenuCommand::MutationFailed(
        MutationKind::Duplicate
      ) => {}
      | MenuCommand::Settle(
        MutationKind::Trash
      ) => {
        self.confirm_open = false;
        self.delete_flow =
          DeleteFlow::Settled;
      }
      | MenuCommand::Settle(
        MutationKind::Duplicate
      ) => {
        self.confirm_open = false;
        if self.can_confirm() {
          self.delete_flow =
            DeleteFlow::Idle;
        }
      }
    }
    self
  }
}

impl Reducible for MenuState {
  type Action = MenuCommand;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    Rc::new((*self).apply(action))
  }
}

/// What a click on a menu entry does.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum MenuEffect {
  Navigate(Uuid),
  Dispatch(MenuCommand),
  Mutate(TaskMutation)
}

pub fn effect_for(
  kind: ActionKind,
  task_id: Uuid
) -> MenuEffect {
  match kind {
    | ActionKind::Open => {
      MenuEffect::Navigate(task_id)
    }
    | ActionKind::Edit => {
      MenuEffect::Dispatch(
        MenuCommand::OpenEdit
      )
    }
    | ActionKind::AddSubTask => {
      MenuEffect::Dispatch(
        MenuCommand::OpenAddSubTask
      )
    }
    | ActionKind::Duplicate => {
      MenuEffect::Mutate(
        TaskMutation::Duplicate(task_id)
      )
    }
    | ActionKind::Delete => {
      MenuEffect::Dispatch(
        MenuCommand::RequestDelete
      )
    }
  }
}

/// Confirming the delete dialog; `None`
/// unless a confirmation is pending.
pub fn confirm_effect(
  state: &MenuState,
  task_id: Uuid
) -> Option<TaskMutation> {
  state.can_confirm().then_some(
    TaskMutation::Trash {
      uuid:   task_id,
      marker: TrashMarker::Trash
    }
  )
}

#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
  pub level:           ToastLevel,
  pub text:            String,
  pub settle_after_ms: Option<u32>
}

impl MutationOutcome {
  pub fn from_result(
    result: &Result<String, ApiError>
  ) -> Self {
    match result {
      | Ok(message) => {
        Self {
          level:           ToastLevel::Success,
          text:            message.clone(),
          settle_after_ms: Some(
            SETTLE_DELAY_MS
          )
        }
      }
      | Err(err) => {
        Self {
          level:           ToastLevel::Error,
          text:            err.user_message(),
          settle_after_ms: None
        }
      }
    }
  }
}

/// Side effects a running mutation
/// reports back to the menu.
pub trait MutationSink {
  fn notify(
    &self,
    level: ToastLevel,
    text: String
  );

  fn failed(
    &self,
    mutation: TaskMutation,
    err: &ApiError
  );

  fn dispatch(&self, command: MenuCommand);

  fn changed(&self);
}

/// Awaits `request`, toasts the outcome,
/// and on success sleeps for the settle
/// delay before settling the menu and
/// signalling a refresh. Failures never
/// settle or refresh.
pub async fn drive_mutation<R, S, Z>(
  mutation: TaskMutation,
  request: R,
  sleep: S,
  sink: &impl MutationSink
) where
  R: Future<
    Output = Result<String, ApiError>,
  >,
  S: FnOnce(u32) -> Z,
  Z: Future<Output = ()>,
{
  let result = request.await;
  let outcome =
    MutationOutcome::from_result(&result);

  if let Err(err) = &result {
    sink.failed(mutation, err);
  }
  sink.notify(outcome.level, outcome.text);

  match outcome.settle_after_ms {
    | Some(delay) => {
      sleep(delay).await;
      sink.dispatch(MenuCommand::Settle(
        mutation.kind()
      ));
      sink.changed();
    }
    | None => {
      sink.dispatch(
        MenuCommand::MutationFailed(
          mutation.kind()
        )
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;
  use std::future::Future;

  use taskdeck_gui_shared::{
    ApiError,
    ErrorData,
    TrashMarker,
    UserDto
  };
  use uuid::Uuid;

  use super::{
    ActionKind,
    ActionSet,
    DeleteFlow,
    MenuCommand,
    MenuEffect,
    MenuState,
    MutationKind,
    MutationOutcome,
    MutationSink,
    SETTLE_DELAY_MS,
    TaskMutation,
    confirm_effect,
    drive_mutation,
    effect_for,
    visible_actions
  };
  use crate::toast::ToastLevel;

  #[derive(Debug, Clone, PartialEq)]
  enum Event {
    Toast(ToastLevel, String),
    Failed(MutationKind),
    Slept(u32),
    Dispatch(MenuCommand),
    Changed
  }

  #[derive(Default)]
  struct Recorder {
    events: RefCell<Vec<Event>>
  }

  impl Recorder {
    fn push(&self, event: Event) {
      self.events.borrow_mut().push(event);
    }

    fn take(&self) -> Vec<Event> {
      self.events.take()
    }
  }

  impl MutationSink for Recorder {
    fn notify(
      &self,
      level: ToastLevel,
      text: String
    ) {
      self.push(Event::Toast(level, text));
    }

    fn failed(
      &self,
      mutation: TaskMutation,
      _err: &ApiError
    ) {
      self.push(Event::Failed(
        mutation.kind()
      ));
    }

    fn dispatch(
      &self,
      command: MenuCommand
    ) {
      self.push(Event::Dispatch(command));
    }

    fn changed(&self) {
      self.push(Event::Changed);
    }
  }

  fn run_async<T>(
    future: impl Future<Output = T>
  ) -> T {
    tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .expect("tokio runtime")
      .block_on(future)
  }

  fn drive(
    mutation: TaskMutation,
    result: Result<String, ApiError>
  ) -> Vec<Event> {
    let recorder = Recorder::default();
    run_async(drive_mutation(
      mutation,
      async move { result },
      |ms| {
        recorder.push(Event::Slept(ms));
        std::future::ready(())
      },
      &recorder
    ));
    recorder.take()
  }

  fn user(is_admin: bool) -> UserDto {
    UserDto {
      id: "u1".to_string(),
      name: "Sam".to_string(),
      is_admin
    }
  }

  #[test]
  fn non_admin_sees_only_open() {
    let set = ActionSet::for_user(Some(
      &user(false)
    ));
    let labels: Vec<_> =
      visible_actions(set)
        .into_iter()
        .map(|entry| entry.label)
        .collect();

    assert_eq!(labels, vec!["Open Task"]);
    assert!(!set.has_delete());
    assert!(!set.allows(ActionKind::Delete));
    assert!(!set.allows(ActionKind::Duplicate));
  }

  #[test]
  fn missing_user_falls_back_to_open_only()
   {
    assert_eq!(
      ActionSet::for_user(None),
      ActionSet::OpenOnly
    );
  }

  #[test]
  fn admin_sees_four_actions_in_order_plus_delete()
   {
    let set = ActionSet::for_user(Some(
      &user(true)
    ));
    let kinds: Vec<_> =
      visible_actions(set)
        .into_iter()
        .map(|entry| entry.kind)
        .collect();

    assert_eq!(
      kinds,
      vec![
        ActionKind::Open,
        ActionKind::Edit,
        ActionKind::AddSubTask,
        ActionKind::Duplicate
      ]
    );
    assert!(set.has_delete());
    assert!(set.allows(ActionKind::Delete));
  }

  #[test]
  fn delete_click_only_opens_confirmation()
   {
    let id = Uuid::new_v4();
    let effect =
      effect_for(ActionKind::Delete, id);
    assert_eq!(
      effect,
      MenuEffect::Dispatch(
        MenuCommand::RequestDelete
      )
    );

    let state = MenuState::default()
      .apply(MenuCommand::RequestDelete);
    assert!(state.confirm_open);
    assert_eq!(
      state.delete_flow,
      DeleteFlow::ConfirmPending
    );
    assert!(!state.edit_open);
    assert!(!state.add_subtask_open);
  }

  #[test]
  fn confirm_requires_pending_delete() {
    let id = Uuid::new_v4();
    assert_eq!(
      confirm_effect(
        &MenuState::default(),
        id
      ),
      None
    );

    let pending = MenuState::default()
      .apply(MenuCommand::RequestDelete);
    assert_eq!(
      confirm_effect(&pending, id),
      Some(TaskMutation::Trash {
        uuid:   id,
        marker: TrashMarker::Trash
      })
    );

    let mutating = pending
      .apply(MenuCommand::ConfirmDelete);
    assert!(mutating.is_deleting());
    assert_eq!(
      confirm_effect(&mutating, id),
      None
    );
  }

  #[test]
  fn edit_toggles_only_edit_flag() {
    let state = MenuState::default()
      .apply(MenuCommand::OpenEdit);
    assert!(state.edit_open);
    assert!(!state.add_subtask_open);
    assert!(!state.confirm_open);
    assert_eq!(
      state.delete_flow,
      DeleteFlow::Idle
    );

    let closed =
      state.apply(MenuCommand::CloseEdit);
    assert_eq!(closed, MenuState::default());
  }

  #[test]
  fn add_subtask_toggles_only_its_flag() {
    let state = MenuState::default()
      .apply(MenuCommand::OpenAddSubTask);
    assert!(state.add_subtask_open);
    assert!(!state.edit_open);
    assert!(!state.confirm_open);
  }

  #[test]
  fn successful_trash_settles_and_closes()
   {
    let state = MenuState::default()
      .apply(MenuCommand::RequestDelete)
      .apply(MenuCommand::ConfirmDelete)
      .apply(MenuCommand::Settle(
        MutationKind::Trash
      ));

    assert!(!state.confirm_open);
    assert_eq!(
      state.delete_flow,
      DeleteFlow::Settled
    );
  }

  #[test]
  fn failed_trash_keeps_dialog_open() {
    let state = MenuState::default()
      .apply(MenuCommand::RequestDelete)
      .apply(MenuCommand::ConfirmDelete)
      .apply(MenuCommand::MutationFailed(
        MutationKind::Trash
      ));

    assert!(state.confirm_open);
    assert!(state.can_confirm());
  }

  #[test]
  fn duplicate_settle_closes_pending_confirmation()
   {
    let state = MenuState::default()
      .apply(MenuCommand::RequestDelete)
      .apply(MenuCommand::Settle(
        MutationKind::Duplicate
      ));

    assert!(!state.confirm_open);
    assert_eq!(
      state.delete_flow,
      DeleteFlow::Idle
    );
  }

  #[test]
  fn duplicate_resolves_to_success_outcome()
   {
    let id = Uuid::new_v4();
    assert_eq!(
      effect_for(ActionKind::Duplicate, id),
      MenuEffect::Mutate(
        TaskMutation::Duplicate(id)
      )
    );

    let outcome =
      MutationOutcome::from_result(&Ok(
        "Task duplicated".to_string()
      ));
    assert_eq!(
      outcome.level,
      ToastLevel::Success
    );
    assert_eq!(
      outcome.text,
      "Task duplicated"
    );
    assert_eq!(
      outcome.settle_after_ms,
      Some(SETTLE_DELAY_MS)
    );
  }

  #[test]
  fn successful_duplicate_toasts_then_waits_then_refreshes()
   {
    let id = Uuid::new_v4();
    let events = drive(
      TaskMutation::Duplicate(id),
      Ok("Task duplicated".to_string())
    );

    assert_eq!(events, vec![
      Event::Toast(
        ToastLevel::Success,
        "Task duplicated".to_string()
      ),
      Event::Slept(500),
      Event::Dispatch(MenuCommand::Settle(
        MutationKind::Duplicate
      )),
      Event::Changed,
    ]);
  }

  #[test]
  fn failed_trash_reports_and_never_settles()
   {
    let id = Uuid::new_v4();
    let events = drive(
      TaskMutation::Trash {
        uuid:   id,
        marker: TrashMarker::Trash
      },
      Err(ApiError::Application {
        data: ErrorData {
          message: Some(
            "Not authorized".to_string()
          )
        }
      })
    );

    assert_eq!(events, vec![
      Event::Failed(MutationKind::Trash),
      Event::Toast(
        ToastLevel::Error,
        "Not authorized".to_string()
      ),
      Event::Dispatch(
        MenuCommand::MutationFailed(
          MutationKind::Trash
        )
      ),
    ]);
    assert!(!events.iter().any(|event| {
      matches!(
        event,
        Event::Changed
          | Event::Slept(_)
          | Event::Dispatch(
            MenuCommand::Settle(_)
          )
      )
    }));
  }

  #[test]
  fn application_error_message_wins() {
    let outcome =
      MutationOutcome::from_result(&Err(
        ApiError::Application {
          data: ErrorData {
            message: Some(
              "Not authorized".to_string()
            )
          }
        }
      ));
    assert_eq!(
      outcome.level,
      ToastLevel::Error
    );
    assert_eq!(
      outcome.text,
      "Not authorized"
    );
    assert_eq!(
      outcome.settle_after_ms,
      None
    );
  }

  #[test]
  fn transport_error_uses_generic_message()
   {
    let outcome =
      MutationOutcome::from_result(&Err(
        ApiError::transport(
          "invoke error: timeout"
        )
      ));
    assert_eq!(
      outcome.text,
      "invoke error: timeout"
    );
  }

  #[test]
  fn open_navigates_without_state_change()
   {
    let id = Uuid::new_v4();
    assert_eq!(
      effect_for(ActionKind::Open, id),
      MenuEffect::Navigate(id)
    );
  }
}
