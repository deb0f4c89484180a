use gloo::timers::future::TimeoutFuture;
use taskdeck_gui_shared::{
  ApiError,
  TaskDto,
  task_route
};
use uuid::Uuid;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  UseReducerHandle,
  function_component,
  html,
  use_context,
  use_reducer,
  use_state
};
use yew_router::hooks::use_navigator;

use super::{
  AddSubTaskDialog,
  ConfirmDialog,
  TaskFormDialog
};
use crate::api::{
  log_ui_event,
  run_mutation
};
use crate::app::Route;
use crate::menu::{
  ActionKind,
  MenuCommand,
  MenuEffect,
  MenuState,
  MutationSink,
  TaskMutation,
  confirm_effect,
  drive_mutation,
  effect_for,
  visible_actions
};
use crate::session::use_session;
use crate::toast::{
  ToastContext,
  ToastLevel,
  notify
};

#[derive(Clone)]
struct MenuSink {
  menu:       UseReducerHandle<MenuState>,
  toasts:     Option<ToastContext>,
  on_changed: Callback<()>,
  task_id:    Uuid
}

impl MutationSink for MenuSink {
  fn notify(
    &self,
    level: ToastLevel,
    text: String
  ) {
    notify(self.toasts.as_ref(), level, text);
  }

  fn failed(
    &self,
    mutation: TaskMutation,
    err: &ApiError
  ) {
    tracing::error!(
      command = mutation.command(),
      uuid = %self.task_id,
      error = ?err,
      "menu mutation failed"
    );
    log_ui_event(
      "menu.mutation.failed",
      format!(
        "{} {}: {err}",
        mutation.command(),
        self.task_id
      )
    );
  }

  fn dispatch(&self, command: MenuCommand) {
    self.menu.dispatch(command);
  }

  fn changed(&self) {
    self.on_changed.emit(());
  }
}

#[derive(Properties, PartialEq)]
pub struct ActionMenuProps {
  pub task:       TaskDto,
  /// Fired once a mutation has settled
  /// so the list owner can refetch.
  pub on_changed: Callback<()>
}

#[function_component(ActionMenu)]
pub fn action_menu(
  props: &ActionMenuProps
) -> Html {
  let session = use_session();
  let toasts =
    use_context::<ToastContext>();
  let navigator = use_navigator();
  let menu = use_reducer(MenuState::default);
  let popup_open = use_state(|| false);

  let action_set = session.action_set();
  let task_id = props.task.uuid;

  let start_mutation = {
    let sink = MenuSink {
      menu: menu.clone(),
      toasts: toasts.clone(),
      on_changed: props.on_changed.clone(),
      task_id
    };
    Callback::from(
      move |mutation: TaskMutation| {
        let sink = sink.clone();
        tracing::debug!(command = mutation.command(), uuid = %task_id, "menu mutation started");
        wasm_bindgen_futures::spawn_local(
          async move {
            drive_mutation(
              mutation,
              run_mutation(mutation),
              TimeoutFuture::new,
              &sink
            )
            .await;
          }
        );
      }
    )
  };

  let on_select = {
    let menu = menu.clone();
    let popup_open = popup_open.clone();
    let start_mutation =
      start_mutation.clone();
    Callback::from(
      move |kind: ActionKind| {
        popup_open.set(false);
        if !action_set.allows(kind) {
          tracing::warn!(?kind, "action not permitted for session");
          return;
        }
        match effect_for(kind, task_id) {
          | MenuEffect::Navigate(id) => {
            log_ui_event(
              "menu.open",
              task_route(id)
            );
            if let Some(navigator) =
              &navigator
            {
              navigator.push(
                &Route::TaskDetail { id }
              );
            }
          }
          | MenuEffect::Dispatch(
            command
          ) => menu.dispatch(command),
          | MenuEffect::Mutate(
            mutation
          ) => {
            start_mutation.emit(mutation)
          }
        }
      }
    )
  };

  let on_confirm_delete = {
    let menu = menu.clone();
    let start_mutation =
      start_mutation.clone();
    Callback::from(move |()| {
      let Some(mutation) =
        confirm_effect(&menu, task_id)
      else {
        return;
      };
      menu.dispatch(
        MenuCommand::ConfirmDelete
      );
      start_mutation.emit(mutation);
    })
  };

  let dispatcher = |command: MenuCommand| {
    let menu = menu.clone();
    Callback::from(move |()| {
      menu.dispatch(command)
    })
  };

  let on_toggle = {
    let popup_open = popup_open.clone();
    Callback::from(
      move |e: MouseEvent| {
        e.stop_propagation();
        popup_open.set(!*popup_open);
      }
    )
  };
  let on_dismiss = {
    let popup_open = popup_open.clone();
    Callback::from(
      move |_: MouseEvent| {
        popup_open.set(false)
      }
    )
  };

  let item_button =
    |kind: ActionKind,
     label: &'static str,
     glyph: &'static str,
     class: &'static str| {
      let on_select = on_select.clone();
      html! {
          <button
              class={class}
              type="button"
              onclick={Callback::from(move |_: MouseEvent| on_select.emit(kind))}
          >
              <span class="action-icon" aria-hidden="true">{ glyph }</span>
              <span>{ label }</span>
          </button>
      }
    };

  html! {
      <>
          <div class="action-menu">
              <button class="action-menu-trigger" type="button" aria-label="Task actions" onclick={on_toggle}>
                  { "⋯" }
              </button>
              {
                  if *popup_open {
                      html! {
                          <>
                              <div class="action-menu-backdrop" onclick={on_dismiss}></div>
                              <div class="action-menu-items">
                                  <div class="action-menu-group">
                                      {
                                          for visible_actions(action_set).into_iter().map(|entry| {
                                              item_button(entry.kind, entry.label, entry.icon.glyph(), "action-menu-item")
                                          })
                                      }
                                  </div>
                                  {
                                      if action_set.has_delete() {
                                          html! {
                                              <div class="action-menu-group">
                                                  { item_button(ActionKind::Delete, ActionKind::Delete.label(), ActionKind::Delete.icon().glyph(), "action-menu-item danger") }
                                              </div>
                                          }
                                      } else {
                                          html! {}
                                      }
                                  }
                              </div>
                          </>
                      }
                  } else {
                      html! {}
                  }
              }
          </div>

          <TaskFormDialog
              open={menu.edit_open}
              task={Some(props.task.clone())}
              on_close={dispatcher(MenuCommand::CloseEdit)}
              on_saved={props.on_changed.clone()}
          />
          <AddSubTaskDialog
              open={menu.add_subtask_open}
              task_id={task_id}
              on_close={dispatcher(MenuCommand::CloseAddSubTask)}
              on_saved={props.on_changed.clone()}
          />
          <ConfirmDialog
              open={menu.confirm_open}
              busy={menu.is_deleting()}
              on_cancel={dispatcher(MenuCommand::CancelDelete)}
              on_confirm={on_confirm_delete}
          />
      </>
  }
}
