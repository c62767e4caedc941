/// User interface module
///
/// Each view owns its own state machine and message type. `update`
/// returns an `Action` so the application decides how to run tasks and
/// where to navigate.

pub mod detail;
pub mod image_slot;
pub mod list;

use iced::Task;

use crate::route::Route;

/// What a view asks the application to do after an update
pub enum Action<M> {
    None,
    Run(Task<M>),
    Navigate(Route),
}
