use std::rc::Rc;

use yew::{
  Reducible,
  UseReducerHandle
};

const MAX_VISIBLE_TOASTS: usize = 5;
pub const TOAST_TTL_MS: u32 = 4_000;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ToastLevel {
  Success,
  Error
}

impl ToastLevel {
  pub fn class(self) -> &'static str {
    match self {
      | ToastLevel::Success => {
        "toast ok"
      }
      | ToastLevel::Error => {
        "toast danger"
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
  pub id:    u64,
  pub level: ToastLevel,
  pub text:  String
}

#[derive(
  Debug, Clone, PartialEq, Default,
)]
pub struct ToastQueue {
  next_id:   u64,
  pub items: Vec<Toast>
}

pub enum ToastAction {
  Push(ToastLevel, String),
  Dismiss(u64)
}

impl ToastQueue {
  pub fn apply(
    mut self,
    action: ToastAction
  ) -> Self {
    match action {
      | ToastAction::Push(level, text) => {
        self.next_id += 1;
        self.items.push(Toast {
          id: self.next_id,
          level,
          text
        });
        if self.items.len()
          > MAX_VISIBLE_TOASTS
        {
          let overflow = self.items.len()
            - MAX_VISIBLE_TOASTS;
          self.items.drain(..overflow);
        }
      }
      | ToastAction::Dismiss(id) => {
        self
          .items
          .retain(|toast| toast.id != id);
      }
    }
    self
  }
}

impl Reducible for ToastQueue {
  type Action = ToastAction;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    Rc::new((*self).clone().apply(action))
  }
}

pub type ToastContext =
  UseReducerHandle<ToastQueue>;

pub fn notify(
  toasts: Option<&ToastContext>,
  level: ToastLevel,
  text: impl Into<String>
) {
  let text = text.into();
  match toasts {
    | Some(toasts) => {
      toasts.dispatch(ToastAction::Push(
        level, text
      ))
    }
    | None => {
      tracing::warn!(text = %text, "no toast context; dropping notification")
    }
  }
}

#[cfg(test)]
mod tests {
  use super::{
    MAX_VISIBLE_TOASTS,
    ToastAction,
    ToastLevel,
    ToastQueue
  };

  #[test]
  fn push_and_dismiss() {
    let queue = ToastQueue::default()
      .apply(ToastAction::Push(
        ToastLevel::Success,
        "Task duplicated".to_string()
      ))
      .apply(ToastAction::Push(
        ToastLevel::Error,
        "Not authorized".to_string()
      ));
    assert_eq!(queue.items.len(), 2);
    assert_eq!(
      queue.items[0].text,
      "Task duplicated"
    );

    let first = queue.items[0].id;
    let queue = queue
      .apply(ToastAction::Dismiss(first));
    assert_eq!(queue.items.len(), 1);
    assert_eq!(
      queue.items[0].level,
      ToastLevel::Error
    );
  }

  #[test]
  fn oldest_toasts_drop_past_the_cap() {
    let mut queue = ToastQueue::default();
    for idx in 0..(MAX_VISIBLE_TOASTS + 2)
    {
      queue = queue.apply(
        ToastAction::Push(
          ToastLevel::Success,
          format!("toast {idx}")
        )
      );
    }
    assert_eq!(
      queue.items.len(),
      MAX_VISIBLE_TOASTS
    );
    assert_eq!(
      queue.items[0].text,
      "toast 2"
    );
  }
}
