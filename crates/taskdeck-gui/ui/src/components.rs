mod action_menu;
mod add_subtask_dialog;
mod confirm_dialog;
mod task_detail;
mod task_form_dialog;
mod task_list;
mod toaster;

pub use action_menu::ActionMenu;
pub use add_subtask_dialog::AddSubTaskDialog;
pub use confirm_dialog::ConfirmDialog;
pub use task_detail::TaskDetailPage;
pub use task_form_dialog::TaskFormDialog;
pub use task_list::TaskListPage;
pub use toaster::Toaster;
