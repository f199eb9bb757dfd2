use chrono::prelude::*;

use crate::calendar::{DateKey, Locale};
use crate::config::Config;
use crate::error::{Error, ErrorKind, Result};
use crate::host::{DateClickOutcome, DateInput, Host, Refresh, Route};
use crate::widget::{CalendarWidget, MountedCalendar, ViewportLock};

use unsegen::base::style::*;
use unsegen::widget::builtin::PromptLine;

pub const DASHBOARD_VIEW: &str = "dashboard";

#[derive(Clone, Debug, PartialEq)]
pub enum Mode {
    Normal,
    Command,
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub day_style: StyleModifier,
    pub day_text_style: TextFormatModifier,
    pub other_month_style: StyleModifier,
    pub focus_day_style: StyleModifier,
    pub today_day_style: StyleModifier,
    pub today_day_text_style: TextFormatModifier,
    pub today_day_char: Option<char>,
    pub month_start_style: StyleModifier,
    pub month_end_style: StyleModifier,
    pub month_header_style: StyleModifier,
    pub month_header_text_style: TextFormatModifier,
    pub weekday_style: StyleModifier,
    pub hint_style: StyleModifier,
    pub error_style: StyleModifier,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            day_style: StyleModifier::default(),
            day_text_style: TextFormatModifier::default(),
            other_month_style: StyleModifier::default().fg_color(Color::LightBlack),
            focus_day_style: StyleModifier::default().bg_color(Color::Blue),
            today_day_style: StyleModifier::default().invert(true),
            today_day_text_style: TextFormatModifier::default().italic(true),
            today_day_char: Some('*'),
            month_start_style: StyleModifier::default().fg_color(Color::Green),
            month_end_style: StyleModifier::default().fg_color(Color::Red),
            month_header_style: StyleModifier::default().fg_color(Color::Yellow),
            month_header_text_style: TextFormatModifier::default(),
            weekday_style: StyleModifier::default().fg_color(Color::Yellow),
            hint_style: StyleModifier::default().fg_color(Color::LightBlack),
            error_style: StyleModifier::default().fg_color(Color::LightRed),
        }
    }
}

/// Freezes scrolling of the content pane while the calendar is expanded.
#[derive(Debug, Default)]
pub struct ScrollLock {
    locked: bool,
}

impl ScrollLock {
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl ViewportLock for ScrollLock {
    fn lock(&mut self) {
        self.locked = true;
    }

    fn release(&mut self) {
        self.locked = false;
    }
}

/// Attendance-detail view. Its records live in the backend, this only
/// tracks which day is shown.
#[derive(Debug, Default)]
pub struct AttendanceDay {
    pub date_input: DateInput,
    pub loaded: Option<DateKey>,
    pub reloads: usize,
}

impl AttendanceDay {
    pub fn open(date: Option<DateKey>) -> Self {
        let mut view = AttendanceDay {
            date_input: DateInput::new(date),
            ..Default::default()
        };
        if let Some(date) = date {
            view.refresh(&date);
        }
        view
    }
}

impl Refresh for AttendanceDay {
    fn refresh(&mut self, date: &DateKey) {
        log::info!("Loading attendance for {}", date);
        self.loaded = Some(*date);
        self.reloads += 1;
    }
}

#[derive(Debug)]
pub enum View {
    Dashboard,
    AttendanceDay(AttendanceDay),
    Other(String),
}

/// Active content view. The host side of the calendar's day clicks.
#[derive(Debug)]
pub struct Router {
    attendance_view: String,
    view: View,
}

impl Router {
    pub fn new(attendance_view: &str) -> Self {
        Router {
            attendance_view: attendance_view.to_owned(),
            view: View::Dashboard,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }
}

impl Host for Router {
    fn active_view(&self) -> &str {
        match &self.view {
            View::Dashboard => DASHBOARD_VIEW,
            View::AttendanceDay(_) => &self.attendance_view,
            View::Other(name) => name,
        }
    }

    fn attendance_view(&self) -> &str {
        &self.attendance_view
    }

    fn navigate(&mut self, route: Route) {
        self.view = if route.view == self.attendance_view {
            View::AttendanceDay(AttendanceDay::open(route.date))
        } else if route.view == DASHBOARD_VIEW {
            View::Dashboard
        } else {
            log::warn!("Navigating to unknown view '{}'", route.view);
            View::Other(route.view)
        };
    }

    fn date_input_mut(&mut self) -> Option<&mut DateInput> {
        match &mut self.view {
            View::AttendanceDay(day) => Some(&mut day.date_input),
            _ => None,
        }
    }

    fn refresh_hook(&mut self) -> Option<&mut dyn Refresh> {
        match &mut self.view {
            View::AttendanceDay(day) => Some(day as &mut dyn Refresh),
            _ => None,
        }
    }
}

pub struct Context {
    pub mode: Mode,
    pub theme: Theme,
    pub router: Router,
    pub calendar: Option<MountedCalendar<ScrollLock>>,
    pub command_line: PromptLine,
    pub content_scroll: usize,
    pub last_error_message: Option<String>,
    pub quit: bool,
    locale: &'static Locale,
    now: DateTime<Local>,
}

impl Context {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Context {
            mode: Mode::Normal,
            theme: Theme::default(),
            router: Router::new(&config.attendance_view),
            calendar: None,
            command_line: PromptLine::with_prompt(":".to_owned()),
            content_scroll: 0,
            last_error_message: None,
            quit: false,
            locale: config.locale()?,
            now: Local::now(),
        })
    }

    /// Attaches the calendar to the screen described by `config`. A missing
    /// sidebar leaves the app running without a calendar.
    pub fn mount_calendar(&mut self, config: &Config, widget: CalendarWidget) {
        match widget
            .with_locale(self.locale)
            .mount(&config.layout, ScrollLock::default())
        {
            Ok(calendar) => self.calendar = Some(calendar),
            Err(e) => log::warn!("Calendar not shown: {}", e),
        }
    }

    pub fn calendar_mut(&mut self) -> Result<&mut MountedCalendar<ScrollLock>> {
        self.calendar
            .as_mut()
            .ok_or_else(|| Error::from(ErrorKind::NotMounted))
    }

    pub fn click_focused_day(&mut self) -> Option<DateClickOutcome> {
        let outcome = self.calendar.as_mut()?.click_focused(&mut self.router);
        if let Some(DateClickOutcome::Navigated(_)) = outcome {
            self.content_scroll = 0;
        }
        outcome
    }

    pub fn viewport_locked(&self) -> bool {
        self.calendar
            .as_ref()
            .map_or(false, |calendar| calendar.viewport().is_locked())
    }

    pub fn input_sink(&self) -> &PromptLine {
        &self.command_line
    }

    pub fn input_sink_mut(&mut self) -> &mut PromptLine {
        &mut self.command_line
    }

    pub fn locale(&self) -> &'static Locale {
        self.locale
    }

    pub fn now(&self) -> &DateTime<Local> {
        &self.now
    }

    pub fn update(&mut self) {
        self.now = Local::now();
        if let Some(calendar) = self.calendar.as_mut() {
            calendar.refresh_today();
        }
    }
}
