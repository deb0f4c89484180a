use taskdeck_gui_shared::{
  TaskCreate,
  TaskDto,
  TaskPatch,
  TaskPriority,
  TaskStage,
  TaskUpdateArgs
};
use web_sys::{
  HtmlInputElement,
  HtmlSelectElement
};
use yew::{
  Callback,
  Event,
  Html,
  InputEvent,
  MouseEvent,
  Properties,
  TargetCast,
  function_component,
  html,
  use_effect_with,
  use_state
};

use crate::api::invoke_tauri;
use crate::toast::{
  ToastContext,
  ToastLevel,
  notify
};

#[derive(Debug, Clone, PartialEq)]
struct FormDraft {
  title:       String,
  date:        String,
  /// Input value the edit form opened
  /// with; the date is only patched when
  /// it differs.
  loaded_date: String,
  stage:       TaskStage,
  priority:    TaskPriority,
  error:       Option<String>
}

impl FormDraft {
  fn from_task(
    task: Option<&TaskDto>
  ) -> Self {
    match task {
      | Some(task) => {
        let date = date_input_value(&task.date);
        Self {
          title:       task.title.clone(),
          loaded_date: date.clone(),
          date,
          stage:       task.stage,
          priority:    task.priority,
          error:       None
        }
      }
      | None => {
        Self {
          title:       String::new(),
          date:        String::new(),
          loaded_date: String::new(),
          stage:       TaskStage::Todo,
          priority:    TaskPriority::Normal,
          error:       None
        }
      }
    }
  }

  fn validate(
    &self
  ) -> Result<(), String> {
    if self.title.trim().is_empty() {
      return Err(
        "Title is required.".to_string()
      );
    }
    Ok(())
  }

  fn date_arg(&self) -> Option<String> {
    let date = self.date.trim();
    (!date.is_empty())
      .then(|| date.to_string())
  }

  fn to_create(&self) -> TaskCreate {
    TaskCreate {
      title:    self.title.trim().to_string(),
      date:     self.date_arg(),
      priority: self.priority,
      stage:    self.stage
    }
  }

  fn to_patch(&self) -> TaskPatch {
    TaskPatch {
      title:    Some(
        self.title.trim().to_string()
      ),
      date:     self
        .date_arg()
        .filter(|date| {
          *date != self.loaded_date
        }),
      priority: Some(self.priority),
      stage:    Some(self.stage)
    }
  }
}

/// `YYYY-MM-DD` prefix of an RFC 3339
/// timestamp, as `<input type=date>`
/// expects.
fn date_input_value(raw: &str) -> String {
  raw.get(..10)
    .unwrap_or_default()
    .to_string()
}

fn stage_value(
  stage: TaskStage
) -> &'static str {
  match stage {
    | TaskStage::Todo => "todo",
    | TaskStage::InProgress => {
      "in_progress"
    }
    | TaskStage::Completed => "completed"
  }
}

fn stage_from_value(
  value: &str
) -> Option<TaskStage> {
  TaskStage::ALL.into_iter().find(
    |stage| stage_value(*stage) == value
  )
}

fn priority_from_value(
  value: &str
) -> Option<TaskPriority> {
  TaskPriority::ALL.into_iter().find(
    |priority| priority.label() == value
  )
}

#[derive(Properties, PartialEq)]
pub struct TaskFormDialogProps {
  pub open:     bool,
  #[prop_or_default]
  pub task:     Option<TaskDto>,
  pub on_close: Callback<()>,
  pub on_saved: Callback<()>
}

#[function_component(TaskFormDialog)]
pub fn task_form_dialog(
  props: &TaskFormDialogProps
) -> Html {
  let toasts =
    yew::use_context::<ToastContext>();
  let draft = use_state(|| {
    FormDraft::from_task(
      props.task.as_ref()
    )
  });
  let busy = use_state(|| false);

  {
    let draft = draft.clone();
    let busy = busy.clone();
    let task = props.task.clone();
    use_effect_with(
      (props.open, props.task.clone()),
      move |_| {
        draft.set(FormDraft::from_task(
          task.as_ref()
        ));
        busy.set(false);
        || ()
      }
    );
  }

  if !props.open {
    return html! {};
  }

  let on_close_click = {
    let on_close = props.on_close.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_close.emit(())
      }
    )
  };

  let on_title_input = {
    let draft = draft.clone();
    Callback::from(
      move |e: InputEvent| {
        let input: HtmlInputElement =
          e.target_unchecked_into();
        let mut next = (*draft).clone();
        next.title = input.value();
        next.error = None;
        draft.set(next);
      }
    )
  };

  let on_date_change = {
    let draft = draft.clone();
    Callback::from(move |e: Event| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      let mut next = (*draft).clone();
      next.date = input.value();
      draft.set(next);
    })
  };

  let on_stage_change = {
    let draft = draft.clone();
    Callback::from(move |e: Event| {
      let select: HtmlSelectElement =
        e.target_unchecked_into();
      if let Some(stage) =
        stage_from_value(&select.value())
      {
        let mut next = (*draft).clone();
        next.stage = stage;
        draft.set(next);
      }
    })
  };

  let on_priority_change = {
    let draft = draft.clone();
    Callback::from(move |e: Event| {
      let select: HtmlSelectElement =
        e.target_unchecked_into();
      if let Some(priority) =
        priority_from_value(
          &select.value()
        )
      {
        let mut next = (*draft).clone();
        next.priority = priority;
        draft.set(next);
      }
    })
  };

  let on_submit = {
    let draft = draft.clone();
    let busy = busy.clone();
    let toasts = toasts.clone();
    let task_id = props
      .task
      .as_ref()
      .map(|task| task.uuid);
    let on_close = props.on_close.clone();
    let on_saved = props.on_saved.clone();
    Callback::from(
      move |_: MouseEvent| {
        if *busy {
          return;
        }
        let current = (*draft).clone();
        if let Err(message) =
          current.validate()
        {
          let mut next = current;
          next.error = Some(message);
          draft.set(next);
          return;
        }

        busy.set(true);
        let draft = draft.clone();
        let busy = busy.clone();
        let toasts = toasts.clone();
        let on_close = on_close.clone();
        let on_saved = on_saved.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            let result = match task_id {
              | Some(uuid) => {
                invoke_tauri::<TaskDto, _>(
                  "task_update",
                  &TaskUpdateArgs {
                    uuid,
                    patch: current
                      .to_patch()
                  }
                )
                .await
              }
              | None => {
                invoke_tauri::<TaskDto, _>(
                  "task_add",
                  &current.to_create()
                )
                .await
              }
            };

            busy.set(false);
            match result {
              | Ok(ack) => {
                tracing::debug!(uuid = %ack.data.uuid, "task saved");
                notify(
                  toasts.as_ref(),
                  ToastLevel::Success,
                  ack.message
                );
                on_close.emit(());
                on_saved.emit(());
              }
              | Err(err) => {
                tracing::error!(error = %err, "task save failed");
                let message =
                  err.user_message();
                notify(
                  toasts.as_ref(),
                  ToastLevel::Error,
                  message.clone()
                );
                let mut next = current;
                next.error = Some(message);
                draft.set(next);
              }
            }
          }
        );
      }
    )
  };

  let heading = if props.task.is_some() {
    "Update Task"
  } else {
    "Add Task"
  };

  html! {
      <div class="modal-backdrop" onclick={on_close_click.clone()}>
          <div class="modal task-form-dialog" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
              <div class="header">{ heading }</div>
              <div class="content">
                  <label class="field">
                      <span>{ "Task Title" }</span>
                      <input
                          type="text"
                          placeholder="Task title"
                          value={draft.title.clone()}
                          oninput={on_title_input}
                      />
                  </label>
                  <div class="field-row">
                      <label class="field">
                          <span>{ "Task Stage" }</span>
                          <select onchange={on_stage_change}>
                              {
                                  for TaskStage::ALL.into_iter().map(|stage| html! {
                                      <option value={stage_value(stage)} selected={stage == draft.stage}>
                                          { stage.label() }
                                      </option>
                                  })
                              }
                          </select>
                      </label>
                      <label class="field">
                          <span>{ "Task Date" }</span>
                          <input
                              type="date"
                              value={draft.date.clone()}
                              onchange={on_date_change}
                          />
                      </label>
                  </div>
                  <label class="field">
                      <span>{ "Priority Level" }</span>
                      <select onchange={on_priority_change}>
                          {
                              for TaskPriority::ALL.into_iter().map(|priority| html! {
                                  <option value={priority.label()} selected={priority == draft.priority}>
                                      { priority.label() }
                                  </option>
                              })
                          }
                      </select>
                  </label>
                  {
                      if let Some(error) = &draft.error {
                          html! { <div class="field-error">{ error }</div> }
                      } else {
                          html! {}
                      }
                  }
              </div>
              <div class="footer">
                  <button class="btn" type="button" onclick={on_close_click}>{ "Cancel" }</button>
                  <button class="btn ok" type="button" disabled={*busy} onclick={on_submit}>
                      { if *busy { "Saving…" } else { "Submit" } }
                  </button>
              </div>
          </div>
      </div>
  }
}

#[cfg(test)]
mod tests {
  use taskdeck_gui_shared::{
    TaskDto,
    TaskPriority,
    TaskStage
  };
  use uuid::Uuid;

  use super::{
    FormDraft,
    date_input_value,
    priority_from_value,
    stage_from_value,
    stage_value
  };

  fn task() -> TaskDto {
    TaskDto {
      uuid:       Uuid::nil(),
      title:      "Fix login".to_string(),
      date:       "2026-02-10T00:00:00+00:00"
        .to_string(),
      priority:   TaskPriority::High,
      stage:      TaskStage::InProgress,
      sub_tasks:  vec![],
      is_trashed: false,
      created:    "2026-02-01T00:00:00+00:00"
        .to_string(),
      modified:   "2026-02-01T00:00:00+00:00"
        .to_string()
    }
  }

  #[test]
  fn edit_draft_prefills_from_task() {
    let draft =
      FormDraft::from_task(Some(&task()));
    assert_eq!(draft.title, "Fix login");
    assert_eq!(draft.date, "2026-02-10");
    assert_eq!(
      draft.stage,
      TaskStage::InProgress
    );

    let patch = draft.to_patch();
    assert_eq!(
      patch.title.as_deref(),
      Some("Fix login")
    );
    assert_eq!(patch.date, None);
  }

  #[test]
  fn title_only_edit_keeps_stored_timestamp()
   {
    let mut stored = task();
    stored.date =
      "2026-02-10T15:30:00+00:00".to_string();
    let mut draft =
      FormDraft::from_task(Some(&stored));
    draft.title = "Fix login flow".to_string();

    let patch = draft.to_patch();
    assert_eq!(
      patch.title.as_deref(),
      Some("Fix login flow")
    );
    assert_eq!(patch.date, None);

    draft.date = "2026-02-12".to_string();
    assert_eq!(
      draft.to_patch().date.as_deref(),
      Some("2026-02-12")
    );
  }

  #[test]
  fn blank_title_is_rejected() {
    let mut draft =
      FormDraft::from_task(None);
    draft.title = "   ".to_string();
    assert_eq!(
      draft.validate(),
      Err("Title is required.".to_string())
    );

    draft.title = " Ship ".to_string();
    assert!(draft.validate().is_ok());
    let create = draft.to_create();
    assert_eq!(create.title, "Ship");
    assert_eq!(create.date, None);
  }

  #[test]
  fn select_values_round_trip() {
    for stage in TaskStage::ALL {
      assert_eq!(
        stage_from_value(stage_value(
          stage
        )),
        Some(stage)
      );
    }
    assert_eq!(
      priority_from_value("medium"),
      Some(TaskPriority::Medium)
    );
    assert_eq!(
      priority_from_value("urgent"),
      None
    );
  }

  #[test]
  fn short_dates_do_not_panic() {
    assert_eq!(date_input_value("2026"), "");
  }
}
