use taskdeck_gui_shared::UserDto;
use yew::hook;
use yew::use_context;

use crate::menu::ActionSet;

/// Signed-in user as published to the
/// component tree.
#[derive(
  Debug, Clone, PartialEq, Default,
)]
pub struct Session {
  pub user:    Option<UserDto>,
  pub loading: bool
}

impl Session {
  pub fn loading() -> Self {
    Self {
      user:    None,
      loading: true
    }
  }

  pub fn is_admin(&self) -> bool {
    self
      .user
      .as_ref()
      .is_some_and(|user| user.is_admin)
  }

  pub fn action_set(&self) -> ActionSet {
    ActionSet::for_user(self.user.as_ref())
  }
}

#[hook]
pub fn use_session() -> Session {
  use_context::<Session>()
    .unwrap_or_default()
}
