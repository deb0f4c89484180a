use std::rc::Rc;

use taskdeck_gui_shared::{
  TaskDto,
  TaskPriority,
  TaskStage,
  TasksListArgs
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  Reducible,
  function_component,
  html,
  use_effect_with,
  use_reducer,
  use_state
};
use yew_router::prelude::Link;

use super::{
  ActionMenu,
  TaskFormDialog
};
use crate::api::invoke_tauri;
use crate::app::Route;
use crate::session::use_session;

pub fn stage_class(
  stage: TaskStage
) -> &'static str {
  match stage {
    | TaskStage::Todo => "dot todo",
    | TaskStage::InProgress => {
      "dot progress"
    }
    | TaskStage::Completed => "dot done"
  }
}

pub fn priority_class(
  priority: TaskPriority
) -> &'static str {
  match priority {
    | TaskPriority::High => {
      "badge priority-high"
    }
    | TaskPriority::Medium => {
      "badge priority-medium"
    }
    | TaskPriority::Normal => {
      "badge priority-normal"
    }
    | TaskPriority::Low => {
      "badge priority-low"
    }
  }
}

/// Day part of an RFC 3339 timestamp.
pub fn short_date(raw: &str) -> &str {
  raw.get(..10).unwrap_or(raw)
}

/// Counter bumped whenever a row reports
/// a settled change. Reducing from the
/// current value keeps back-to-back
/// bumps distinct.
#[derive(
  Debug, Clone, Copy, PartialEq, Default,
)]
pub struct RefreshTick(pub u64);

impl Reducible for RefreshTick {
  type Action = ();

  fn reduce(
    self: Rc<Self>,
    (): Self::Action
  ) -> Rc<Self> {
    Rc::new(Self(self.0.wrapping_add(1)))
  }
}

#[function_component(TaskListPage)]
pub fn task_list_page() -> Html {
  let session = use_session();
  let tasks = use_state(Vec::<TaskDto>::new);
  let load_error =
    use_state(|| None::<String>);
  let refresh_tick =
    use_reducer(RefreshTick::default);
  let creating = use_state(|| false);

  {
    let tasks = tasks.clone();
    let load_error = load_error.clone();
    use_effect_with(
      refresh_tick.0,
      move |tick| {
        let tick = *tick;
        wasm_bindgen_futures::spawn_local(
          async move {
            match invoke_tauri::<Vec<TaskDto>, _>(
              "tasks_list",
              &TasksListArgs::default()
            )
            .await
            {
              | Ok(ack) => {
                tracing::debug!(tick, count = ack.data.len(), "tasks loaded");
                tasks.set(ack.data);
                load_error.set(None);
              }
              | Err(err) => {
                tracing::error!(error = %err, "tasks_list failed");
                load_error
                  .set(Some(err.user_message()));
              }
            }
          }
        );
        || ()
      }
    );
  }

  let on_changed = {
    let refresh_tick =
      refresh_tick.clone();
    Callback::from(move |()| {
      refresh_tick.dispatch(())
    })
  };

  let on_new_task = {
    let creating = creating.clone();
    Callback::from(
      move |_: MouseEvent| {
        creating.set(true)
      }
    )
  };
  let on_create_close = {
    let creating = creating.clone();
    Callback::from(move |()| {
      creating.set(false)
    })
  };

  html! {
      <div class="panel list">
          <div class="header">
              <span>{ "Tasks" }</span>
              {
                  if session.is_admin() {
                      html! { <button class="btn ok" type="button" onclick={on_new_task}>{ "New Task" }</button> }
                  } else {
                      html! {}
                  }
              }
          </div>
          {
              if let Some(error) = &*load_error {
                  html! { <div class="field-error">{ error }</div> }
              } else {
                  html! {}
              }
          }
          {
              if tasks.is_empty() && load_error.is_none() {
                  html! { <div class="empty">{ "No tasks yet." }</div> }
              } else {
                  html! {}
              }
          }
          {
              for tasks.iter().map(|task| {
                  let id = task.uuid;
                  html! {
                      <div class="row" key={id.to_string()}>
                          <div class={stage_class(task.stage)}></div>
                          <div>
                              <Link<Route> to={Route::TaskDetail { id }} classes="row-title">
                                  { &task.title }
                              </Link<Route>>
                              <div class="row-meta">
                                  <span class={priority_class(task.priority)}>{ task.priority.label() }</span>
                                  <span class="badge">{ task.stage.label() }</span>
                                  <span class="badge">{ short_date(&task.date) }</span>
                                  {
                                      if task.sub_tasks.is_empty() {
                                          html! {}
                                      } else {
                                          html! { <span class="badge">{ format!("{} sub-tasks", task.sub_tasks.len()) }</span> }
                                      }
                                  }
                              </div>
                          </div>
                          <ActionMenu task={task.clone()} on_changed={on_changed.clone()} />
                      </div>
                  }
              })
          }
          <TaskFormDialog
              open={*creating}
              on_close={on_create_close}
              on_saved={on_changed.clone()}
          />
      </div>
  }
}
