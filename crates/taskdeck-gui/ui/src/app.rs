use taskdeck_gui_shared::UserDto;
use uuid::Uuid;
use yew::{
  ContextProvider,
  Html,
  function_component,
  html,
  use_effect_with,
  use_reducer,
  use_state
};
use yew_router::prelude::{
  HashRouter,
  Routable,
  Switch
};

use crate::api::invoke_tauri;
use crate::components::{
  TaskDetailPage,
  TaskListPage,
  Toaster
};
use crate::session::Session;
use crate::toast::{
  ToastContext,
  ToastLevel,
  ToastQueue,
  notify
};

#[derive(
  Debug, Clone, PartialEq, Routable,
)]
pub enum Route {
  #[at("/")]
  Tasks,
  #[at("/task/:id")]
  TaskDetail { id: Uuid },
  #[not_found]
  #[at("/404")]
  NotFound
}

fn switch(route: Route) -> Html {
  match route {
    | Route::Tasks => {
      html! { <TaskListPage /> }
    }
    | Route::TaskDetail { id } => {
      html! { <TaskDetailPage id={id} /> }
    }
    | Route::NotFound => {
      html! {
          <div class="panel">
              <div class="header">{ "Not found" }</div>
          </div>
      }
    }
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let session = use_state(Session::loading);
  let toasts = use_reducer(ToastQueue::default);

  {
    let session = session.clone();
    let toasts = toasts.clone();
    use_effect_with((), move |_| {
      wasm_bindgen_futures::spawn_local(
        async move {
          match invoke_tauri::<UserDto, _>(
            "session_user",
            &()
          )
          .await
          {
            | Ok(ack) => {
              tracing::info!(user = %ack.data.id, is_admin = ack.data.is_admin, "session loaded");
              session.set(Session {
                user:    Some(ack.data),
                loading: false
              });
            }
            | Err(err) => {
              tracing::error!(error = %err, "session_user failed");
              session.set(Session {
                user:    None,
                loading: false
              });
              notify(
                Some(&toasts),
                ToastLevel::Error,
                err.user_message()
              );
            }
          }
        }
      );
      || ()
    });
  }

  let user_badge = match &session.user {
    | Some(user) => {
      let role = if user.is_admin {
        "admin"
      } else {
        "member"
      };
      html! { <span class="badge">{ format!("{} · {role}", user.name) }</span> }
    }
    | None if session.loading => {
      html! { <span class="badge">{ "signing in…" }</span> }
    }
    | None => {
      html! { <span class="badge">{ "signed out" }</span> }
    }
  };

  html! {
      <ContextProvider<Session> context={(*session).clone()}>
          <ContextProvider<ToastContext> context={toasts.clone()}>
              <HashRouter>
                  <div class="shell">
                      <div class="topbar">
                          <span class="brand">{ "Taskdeck" }</span>
                          { user_badge }
                      </div>
                      <Switch<Route> render={switch} />
                  </div>
              </HashRouter>
              <Toaster />
          </ContextProvider<ToastContext>>
      </ContextProvider<Session>>
  }
}

#[cfg(test)]
mod tests {
  use taskdeck_gui_shared::task_route;
  use uuid::Uuid;
  use yew_router::Routable;

  use super::Route;

  #[test]
  fn detail_route_matches_shared_pattern() {
    let id = Uuid::new_v4();
    assert_eq!(
      Route::TaskDetail { id }.to_path(),
      task_route(id)
    );
  }

  #[test]
  fn detail_route_parses_task_id() {
    let id = Uuid::new_v4();
    assert_eq!(
      Route::recognize(&task_route(id)),
      Some(Route::TaskDetail { id })
    );
  }
}
