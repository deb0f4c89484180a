use taskdeck_gui_shared::{
  SubTaskAddArgs,
  SubTaskCreate,
  TaskDto
};
use uuid::Uuid;
use web_sys::HtmlInputElement;
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
  use_context,
  use_effect_with,
  use_state
};

use crate::api::invoke_tauri;
use crate::toast::{
  ToastContext,
  ToastLevel,
  notify
};

#[derive(
  Debug, Clone, PartialEq, Default,
)]
struct SubTaskDraft {
  title: String,
  date:  String,
  tag:   String,
  error: Option<String>
}

impl SubTaskDraft {
  fn to_create(
    &self
  ) -> Result<SubTaskCreate, String> {
    let title = self.title.trim();
    if title.is_empty() {
      return Err(
        "Sub-task title is required."
          .to_string()
      );
    }
    let date = self.date.trim();
    Ok(SubTaskCreate {
      title: title.to_string(),
      date:  (!date.is_empty())
        .then(|| date.to_string()),
      tag:   self.tag.trim().to_string()
    })
  }
}

#[derive(Properties, PartialEq)]
pub struct AddSubTaskDialogProps {
  pub open:     bool,
  pub task_id:  Uuid,
  pub on_close: Callback<()>,
  pub on_saved: Callback<()>
}

#[function_component(AddSubTaskDialog)]
pub fn add_subtask_dialog(
  props: &AddSubTaskDialogProps
) -> Html {
  let toasts =
    use_context::<ToastContext>();
  let draft =
    use_state(SubTaskDraft::default);
  let busy = use_state(|| false);

  {
    let draft = draft.clone();
    let busy = busy.clone();
    use_effect_with(
      props.open,
      move |_| {
        draft.set(SubTaskDraft::default());
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

  let on_tag_input = {
    let draft = draft.clone();
    Callback::from(
      move |e: InputEvent| {
        let input: HtmlInputElement =
          e.target_unchecked_into();
        let mut next = (*draft).clone();
        next.tag = input.value();
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

  let on_submit = {
    let draft = draft.clone();
    let busy = busy.clone();
    let toasts = toasts.clone();
    let task_id = props.task_id;
    let on_close = props.on_close.clone();
    let on_saved = props.on_saved.clone();
    Callback::from(
      move |_: MouseEvent| {
        if *busy {
          return;
        }
        let current = (*draft).clone();
        let sub_task =
          match current.to_create() {
            | Ok(sub_task) => sub_task,
            | Err(message) => {
              let mut next = current;
              next.error = Some(message);
              draft.set(next);
              return;
            }
          };

        busy.set(true);
        let draft = draft.clone();
        let busy = busy.clone();
        let toasts = toasts.clone();
        let on_close = on_close.clone();
        let on_saved = on_saved.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            let args = SubTaskAddArgs {
              uuid: task_id,
              sub_task
            };
            let result =
              invoke_tauri::<TaskDto, _>(
                "subtask_add",
                &args
              )
              .await;

            busy.set(false);
            match result {
              | Ok(ack) => {
                notify(
                  toasts.as_ref(),
                  ToastLevel::Success,
                  ack.message
                );
                on_close.emit(());
                on_saved.emit(());
              }
              | Err(err) => {
                tracing::error!(uuid = %task_id, error = %err, "subtask_add failed");
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

  html! {
      <div class="modal-backdrop" onclick={on_close_click.clone()}>
          <div class="modal modal-sm add-subtask-dialog" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
              <div class="header">{ "Add Sub-Task" }</div>
              <div class="content">
                  <label class="field">
                      <span>{ "Title" }</span>
                      <input type="text" placeholder="Sub-task title" value={draft.title.clone()} oninput={on_title_input} />
                  </label>
                  <div class="field-row">
                      <label class="field">
                          <span>{ "Task Date" }</span>
                          <input type="date" value={draft.date.clone()} onchange={on_date_change} />
                      </label>
                      <label class="field">
                          <span>{ "Tag" }</span>
                          <input type="text" placeholder="Tag" value={draft.tag.clone()} oninput={on_tag_input} />
                      </label>
                  </div>
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
                      { if *busy { "Adding…" } else { "Add Sub-Task" } }
                  </button>
              </div>
          </div>
      </div>
  }
}

#[cfg(test)]
mod tests {
  use super::SubTaskDraft;

  #[test]
  fn trims_fields_and_drops_empty_date() {
    let draft = SubTaskDraft {
      title: "  Write tests ".to_string(),
      date:  String::new(),
      tag:   " qa ".to_string(),
      error: None
    };
    let create = draft.to_create().unwrap();
    assert_eq!(create.title, "Write tests");
    assert_eq!(create.tag, "qa");
    assert_eq!(create.date, None);
  }

  #[test]
  fn empty_title_is_an_error() {
    let draft = SubTaskDraft::default();
    assert!(draft.to_create().is_err());
  }
}
