//! The page a calendar is embedded in.
//!
//! Clicking a day hands its `YYYY-MM-DD` key to [`Host::on_date_click`]. The
//! provided implementation opens the attendance-day view for that date, or,
//! when that view is already active, updates its date field in place and
//! asks it to refresh. Hosts with their own idea of a day click override it.

use std::fmt;
use std::str::FromStr;

use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::char,
    combinator::{all_consuming, opt},
    multi::separated_list0,
    sequence::{preceded, separated_pair},
    IResult,
};

use crate::calendar::DateKey;
use crate::error::{Error, ErrorKind, Result};

pub const ATTENDANCE_DAY_VIEW: &str = "attendance_day";

/// A view name plus its optional `date` query parameter,
/// e.g. `attendance_day?date=2024-02-29`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub view: String,
    pub date: Option<DateKey>,
}

impl Route {
    pub fn new(view: &str) -> Self {
        Route {
            view: view.to_owned(),
            date: None,
        }
    }

    pub fn with_date(mut self, date: DateKey) -> Self {
        self.date = Some(date);
        self
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.date {
            Some(date) => write!(f, "{}?date={}", self.view, date),
            None => write!(f, "{}", self.view),
        }
    }
}

fn is_view_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '/')
}

fn is_query_char(c: char) -> bool {
    !matches!(c, '&' | '=' | '?' | ' ')
}

fn query(input: &str) -> IResult<&str, Vec<(&str, &str)>> {
    separated_list0(
        char('&'),
        separated_pair(
            take_while1(is_query_char),
            char('='),
            take_while1(is_query_char),
        ),
    )(input)
}

fn route(input: &str) -> IResult<&str, (&str, Option<Vec<(&str, &str)>>)> {
    let (input, view) = take_while1(is_view_char)(input)?;
    let (input, params) = opt(preceded(tag("?"), query))(input)?;
    Ok((input, (view, params)))
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (_, (view, params)) = all_consuming(route)(s.trim()).map_err(|_| {
            Error::new(ErrorKind::RouteParse, &format!("cannot parse route '{}'", s))
        })?;

        let date = params
            .unwrap_or_default()
            .into_iter()
            .find(|(key, _)| *key == "date")
            .map(|(_, value)| value.parse::<DateKey>())
            .transpose()?;

        Ok(Route {
            view: view.to_owned(),
            date,
        })
    }
}

/// The visible date field of the attendance-day view.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DateInput {
    value: Option<DateKey>,
}

impl DateInput {
    pub fn new(value: Option<DateKey>) -> Self {
        DateInput { value }
    }

    pub fn set(&mut self, date: DateKey) {
        self.value = Some(date);
    }

    pub fn value(&self) -> Option<DateKey> {
        self.value
    }
}

/// Reload hook a view registers to pick up a changed date.
pub trait Refresh {
    fn refresh(&mut self, date: &DateKey);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateClickOutcome {
    Navigated(Route),
    UpdatedInPlace { refreshed: bool },
    Ignored,
}

pub trait Host {
    fn active_view(&self) -> &str;

    fn attendance_view(&self) -> &str {
        ATTENDANCE_DAY_VIEW
    }

    fn navigate(&mut self, route: Route);

    fn date_input_mut(&mut self) -> Option<&mut DateInput>;

    fn refresh_hook(&mut self) -> Option<&mut dyn Refresh> {
        None
    }

    fn on_date_click(&mut self, date: &DateKey) -> DateClickOutcome {
        default_date_click(self, date)
    }
}

pub fn default_date_click<H: Host + ?Sized>(host: &mut H, date: &DateKey) -> DateClickOutcome {
    if host.active_view() != host.attendance_view() {
        let route = Route::new(host.attendance_view()).with_date(*date);
        log::info!("Opening {}", route);
        host.navigate(route.clone());
        return DateClickOutcome::Navigated(route);
    }

    let updated = match host.date_input_mut() {
        Some(input) => {
            input.set(*date);
            true
        }
        None => false,
    };

    if !updated {
        log::debug!("No date input on '{}', ignoring {}", host.active_view(), date);
        return DateClickOutcome::Ignored;
    }

    let refreshed = match host.refresh_hook() {
        Some(hook) => {
            hook.refresh(date);
            true
        }
        None => false,
    };

    DateClickOutcome::UpdatedInPlace { refreshed }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Default)]
    pub struct Reloads(pub Vec<DateKey>);

    impl Refresh for Reloads {
        fn refresh(&mut self, date: &DateKey) {
            self.0.push(*date);
        }
    }

    #[derive(Default)]
    pub struct TestHost {
        pub view: String,
        pub visited: Vec<Route>,
        pub input: Option<DateInput>,
        pub reloads: Option<Reloads>,
    }

    impl TestHost {
        pub fn on(view: &str) -> Self {
            TestHost {
                view: view.to_owned(),
                ..Default::default()
            }
        }
    }

    impl Host for TestHost {
        fn active_view(&self) -> &str {
            &self.view
        }

        fn navigate(&mut self, route: Route) {
            self.view = route.view.clone();
            self.visited.push(route);
        }

        fn date_input_mut(&mut self) -> Option<&mut DateInput> {
            self.input.as_mut()
        }

        fn refresh_hook(&mut self) -> Option<&mut dyn Refresh> {
            self.reloads.as_mut().map(|r| r as &mut dyn Refresh)
        }
    }

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn route_with_date_round_trips() {
        let route: Route = "attendance_day?date=2024-02-29".parse().unwrap();
        assert_eq!(route.view, "attendance_day");
        assert_eq!(route.date, Some(key("2024-02-29")));
        assert_eq!(route.to_string(), "attendance_day?date=2024-02-29");
    }

    #[test]
    fn route_ignores_unknown_parameters() {
        let route: Route = "attendance_day?tab=logs&date=2025-01-31".parse().unwrap();
        assert_eq!(route.date, Some(key("2025-01-31")));

        let route: Route = "dashboard".parse().unwrap();
        assert_eq!(route, Route::new("dashboard"));
    }

    #[test]
    fn route_rejects_garbage() {
        assert!("".parse::<Route>().is_err());
        assert!("attendance_day?date".parse::<Route>().is_err());
        assert!("attendance_day?date=yesterday".parse::<Route>().is_err());
    }

    #[test]
    fn click_elsewhere_navigates_to_attendance_day() {
        let mut host = TestHost::on("dashboard");
        let outcome = host.on_date_click(&key("2024-02-29"));

        let expected = Route::new(ATTENDANCE_DAY_VIEW).with_date(key("2024-02-29"));
        assert_eq!(outcome, DateClickOutcome::Navigated(expected.clone()));
        assert_eq!(host.visited, vec![expected]);
    }

    #[test]
    fn click_on_attendance_day_updates_input_and_refreshes() {
        let mut host = TestHost::on(ATTENDANCE_DAY_VIEW);
        host.input = Some(DateInput::default());
        host.reloads = Some(Reloads::default());

        let outcome = host.on_date_click(&key("2025-01-02"));

        assert_eq!(outcome, DateClickOutcome::UpdatedInPlace { refreshed: true });
        assert!(host.visited.is_empty());
        assert_eq!(host.input.unwrap().value(), Some(key("2025-01-02")));
        assert_eq!(host.reloads.unwrap().0, vec![key("2025-01-02")]);
    }

    #[test]
    fn click_without_refresh_hook_only_updates_input() {
        let mut host = TestHost::on(ATTENDANCE_DAY_VIEW);
        host.input = Some(DateInput::default());

        let outcome = host.on_date_click(&key("2025-01-02"));

        assert_eq!(outcome, DateClickOutcome::UpdatedInPlace { refreshed: false });
        assert_eq!(host.input.unwrap().value(), Some(key("2025-01-02")));
    }

    #[test]
    fn click_without_date_input_is_ignored() {
        let mut host = TestHost::on(ATTENDANCE_DAY_VIEW);
        host.reloads = Some(Reloads::default());

        assert_eq!(host.on_date_click(&key("2025-01-02")), DateClickOutcome::Ignored);
        assert!(host.reloads.unwrap().0.is_empty());
    }
}
