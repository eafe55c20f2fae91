//! UI Components
//!
//! Reusable Leptos components.

mod categories_page;
mod category_form;
mod category_row;
mod category_tree_view;
mod delete_control;
mod log_panel;
mod login_form;
mod toast;

pub use categories_page::CategoriesPage;
pub use category_form::CategoryForm;
pub use category_row::CategoryRow;
pub use category_tree_view::CategoryTreeView;
pub use delete_control::DeleteControl;
pub use log_panel::LogPanel;
pub use login_form::LoginForm;
pub use toast::ToastHost;
