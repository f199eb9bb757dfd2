pub mod calendar;
pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod ui;
pub mod widget;
