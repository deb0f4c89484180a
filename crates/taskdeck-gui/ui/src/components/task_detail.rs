use taskdeck_gui_shared::{
  TaskDto,
  TaskIdArg
};
use uuid::Uuid;
use yew::{
  Html,
  Properties,
  function_component,
  html,
  use_effect_with,
  use_state
};
use yew_router::prelude::Link;

use super::task_list::{
  priority_class,
  short_date,
  stage_class
};
use crate::api::invoke_tauri;
use crate::app::Route;

#[derive(Properties, PartialEq)]
pub struct TaskDetailPageProps {
  pub id: Uuid
}

#[derive(Clone, PartialEq)]
enum DetailState {
  Loading,
  Loaded(TaskDto),
  Failed(String)
}

#[function_component(TaskDetailPage)]
pub fn task_detail_page(
  props: &TaskDetailPageProps
) -> Html {
  let state =
    use_state(|| DetailState::Loading);

  {
    let state = state.clone();
    use_effect_with(props.id, move |id| {
      let uuid = *id;
      state.set(DetailState::Loading);
      wasm_bindgen_futures::spawn_local(
        async move {
          match invoke_tauri::<TaskDto, _>(
            "task_get",
            &TaskIdArg { uuid }
          )
          .await
          {
            | Ok(ack) => {
              state.set(DetailState::Loaded(
                ack.data
              ))
            }
            | Err(err) => {
              tracing::error!(uuid = %uuid, error = %err, "task_get failed");
              state.set(DetailState::Failed(
                err.user_message()
              ));
            }
          }
        }
      );
      || ()
    });
  }

  let body = match &*state {
    | DetailState::Loading => {
      html! { <div class="empty">{ "Loading…" }</div> }
    }
    | DetailState::Failed(message) => {
      html! { <div class="field-error">{ message }</div> }
    }
    | DetailState::Loaded(task) => {
      html! {
          <div class="details">
              <div style="font-family:var(--mono);color:var(--muted);">{ format!("uuid: {}", task.uuid) }</div>
              <div style="font-size:1.15rem;font-weight:700;">{ &task.title }</div>

              <div class="kv">
                  <strong>{ "stage" }</strong>
                  <div><span class={stage_class(task.stage)}></span>{ task.stage.label() }</div>
              </div>
              <div class="kv">
                  <strong>{ "priority" }</strong>
                  <div><span class={priority_class(task.priority)}>{ task.priority.label() }</span></div>
              </div>
              <div class="kv">
                  <strong>{ "date" }</strong>
                  <div>{ short_date(&task.date) }</div>
              </div>

              <div class="header">{ "Sub-Tasks" }</div>
              {
                  if task.sub_tasks.is_empty() {
                      html! { <div style="color:var(--muted);">{ "—" }</div> }
                  } else {
                      html! {
                          <ul class="subtasks">
                              {
                                  for task.sub_tasks.iter().map(|sub| html! {
                                      <li key={sub.uuid.to_string()}>
                                          <span>{ &sub.title }</span>
                                          <span class="badge">{ short_date(&sub.date) }</span>
                                          {
                                              if sub.tag.is_empty() {
                                                  html! {}
                                              } else {
                                                  html! { <span class="badge">{ format!("#{}", sub.tag) }</span> }
                                              }
                                          }
                                      </li>
                                  })
                              }
                          </ul>
                      }
                  }
              }
          </div>
      }
    }
  };

  html! {
      <div class="panel">
          <div class="header">
              <Link<Route> to={Route::Tasks} classes="btn">{ "← Tasks" }</Link<Route>>
              <span>{ "Task" }</span>
          </div>
          { body }
      </div>
  }
}
