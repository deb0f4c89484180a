use gloo::timers::callback::Timeout;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html,
  use_context,
  use_effect_with
};

use crate::toast::{
  TOAST_TTL_MS,
  Toast,
  ToastAction,
  ToastContext
};

#[function_component(Toaster)]
pub fn toaster() -> Html {
  let Some(toasts) =
    use_context::<ToastContext>()
  else {
    return html! {};
  };

  html! {
      <div class="toaster">
          {
              for toasts.items.iter().cloned().map(|toast| html! {
                  <ToastItem key={toast.id} toast={toast.clone()} />
              })
          }
      </div>
  }
}

#[derive(Properties, PartialEq)]
struct ToastItemProps {
  toast: Toast
}

#[function_component(ToastItem)]
fn toast_item(
  props: &ToastItemProps
) -> Html {
  let toasts =
    use_context::<ToastContext>();
  let id = props.toast.id;

  {
    let toasts = toasts.clone();
    use_effect_with(id, move |id| {
      let id = *id;
      let timeout =
        Timeout::new(TOAST_TTL_MS, move || {
          if let Some(toasts) = toasts {
            toasts.dispatch(
              ToastAction::Dismiss(id)
            );
          }
        });
      move || drop(timeout)
    });
  }

  let on_click = Callback::from(
    move |_: MouseEvent| {
      if let Some(toasts) = &toasts {
        toasts
          .dispatch(ToastAction::Dismiss(id));
      }
    }
  );

  html! {
      <div class={props.toast.level.class()} role="status" onclick={on_click}>
          { &props.toast.text }
      </div>
  }
}
