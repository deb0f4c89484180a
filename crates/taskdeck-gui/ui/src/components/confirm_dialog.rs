use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct ConfirmDialogProps {
  pub open:       bool,
  #[prop_or_default]
  pub busy:       bool,
  #[prop_or_else(|| "Delete Task".to_string())]
  pub title:      String,
  #[prop_or_else(|| "Are you sure you want to delete the selected record?".to_string())]
  pub message:    String,
  pub on_cancel:  Callback<()>,
  pub on_confirm: Callback<()>
}

#[function_component(ConfirmDialog)]
pub fn confirm_dialog(
  props: &ConfirmDialogProps
) -> Html {
  if !props.open {
    return html! {};
  }

  let on_cancel = {
    let on_cancel =
      props.on_cancel.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_cancel.emit(())
      }
    )
  };
  let on_confirm = {
    let on_confirm =
      props.on_confirm.clone();
    Callback::from(
      move |_: MouseEvent| {
        on_confirm.emit(())
      }
    )
  };

  html! {
      <div class="modal-backdrop" onclick={on_cancel.clone()}>
          <div class="modal modal-sm confirm-dialog" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
              <div class="header">{ &props.title }</div>
              <div class="content">
                  <div>{ &props.message }</div>
              </div>
              <div class="footer">
                  <button
                      class="btn"
                      type="button"
                      onclick={on_cancel}
                  >
                      { "Cancel" }
                  </button>
                  <button
                      class="btn danger"
                      type="button"
                      disabled={props.busy}
                      onclick={on_confirm}
                  >
                      { if props.busy { "Deleting…" } else { "Delete" } }
                  </button>
              </div>
          </div>
      </div>
  }
}
