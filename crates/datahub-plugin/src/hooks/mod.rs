//! Hook dispatch: the generic disciplines and one named helper per hook
//! method, each using the discipline its interface fixes.

pub mod dispatcher;

mod config;
mod controllers;
mod forms;
mod orm;
mod search;
mod views;
mod web;

pub use controllers::ControllerEvent;
pub use dispatcher::HookDispatcher;
pub use forms::{DatasetTemplate, GroupAction, GroupTemplate, PackageAction};
pub use orm::{MapperEvent, SessionStage};
pub use views::SelectedPreview;
