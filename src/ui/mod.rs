pub mod app;
mod calendar_pane;
pub mod command;
mod content_window;
pub mod context;

pub use app::App;
pub use calendar_pane::CalendarPane;
pub use content_window::{ContentScrollBehaviour, ContentWindow};
pub use context::{AttendanceDay, Context, Mode, Router, ScrollLock, Theme, View};
