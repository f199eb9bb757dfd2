use chrono::{Local, NaiveDate};
use derive_more::Display;
use std::error;
use std::fmt;

use crate::calendar::{default_locale, DayCell, Locale, MonthGrid, MonthIndex};
use crate::host::{DateClickOutcome, Host};

/// Source of "today". Read on every render.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Elements a host page may provide for the calendar.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ElementId {
    #[display(fmt = "calendar")]
    Calendar,
    #[display(fmt = "calendarTitle")]
    CalendarTitle,
    #[display(fmt = "calendarWidget")]
    CalendarWidget,
    #[display(fmt = "calendarOverlay")]
    CalendarOverlay,
}

pub trait Page {
    fn has_element(&self, id: ElementId) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotMounted {
    pub missing: ElementId,
}

impl fmt::Display for NotMounted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page has no '{}' element", self.missing)
    }
}

impl error::Error for NotMounted {}

/// Suspends scrolling of whatever surrounds the calendar while it is
/// expanded. Acquired and released exactly once per expansion.
pub trait ViewportLock {
    fn lock(&mut self);
    fn release(&mut self);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopViewportLock;

impl ViewportLock for NoopViewportLock {
    fn lock(&mut self) {}
    fn release(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    Collapsed,
    Expanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub month: MonthIndex,
    pub expansion: Expansion,
}

impl ViewState {
    pub fn month0(&self) -> u32 {
        self.month.month0()
    }

    pub fn year(&self) -> i32 {
        self.month.year()
    }

    pub fn expanded(&self) -> bool {
        self.expansion == Expansion::Expanded
    }
}

/// The "how to close" hint shown below an expanded calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseHint {
    pub text: &'static str,
}

/// Sidebar calendar before it is attached to a page.
pub struct CalendarWidget<C: Clock = LocalClock> {
    state: ViewState,
    clock: C,
    locale: &'static Locale,
}

impl<C: Clock> CalendarWidget<C> {
    pub fn new(clock: C) -> Self {
        let month = MonthIndex::of(&clock.today()).unwrap_or_default();
        CalendarWidget {
            state: ViewState {
                month,
                expansion: Expansion::Collapsed,
            },
            clock,
            locale: default_locale(),
        }
    }

    pub fn with_locale(mut self, locale: &'static Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_month(mut self, month: MonthIndex) -> Self {
        self.state.month = month;
        self
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn render(&self) -> MonthGrid {
        MonthGrid::new(self.state.month, self.clock.today())
    }

    /// Attaches to `page`. The calendar container is required; without the
    /// title, frame and overlay elements the calendar mounts but never expands.
    pub fn mount<L: ViewportLock>(
        self,
        page: &dyn Page,
        lock: L,
    ) -> Result<MountedCalendar<L, C>, NotMounted> {
        if !page.has_element(ElementId::Calendar) {
            return Err(NotMounted {
                missing: ElementId::Calendar,
            });
        }

        let expandable = [
            ElementId::CalendarTitle,
            ElementId::CalendarWidget,
            ElementId::CalendarOverlay,
        ]
        .iter()
        .all(|&id| page.has_element(id));

        if !expandable {
            log::info!("Calendar mounted without overlay elements, expansion disabled");
        }

        let today = self.clock.today();
        let mut mounted = MountedCalendar {
            state: self.state,
            grid: MonthGrid::new(self.state.month, today),
            rendered_on: today,
            clock: self.clock,
            locale: self.locale,
            focus: 0,
            expandable,
            overlay_active: false,
            hint: None,
            lock,
        };
        mounted.reset_focus();

        log::info!("Calendar mounted on {}", mounted.state.month);
        Ok(mounted)
    }
}

impl Default for CalendarWidget<LocalClock> {
    fn default() -> Self {
        CalendarWidget::new(LocalClock)
    }
}

/// A calendar attached to a page. Holds the grid of the latest render.
pub struct MountedCalendar<L: ViewportLock, C: Clock = LocalClock> {
    state: ViewState,
    clock: C,
    locale: &'static Locale,
    grid: MonthGrid,
    rendered_on: NaiveDate,
    focus: usize,
    expandable: bool,
    overlay_active: bool,
    hint: Option<CloseHint>,
    lock: L,
}

impl<L: ViewportLock, C: Clock> MountedCalendar<L, C> {
    /// Replaces the grid wholesale from the current state and today's date.
    pub fn render(&mut self) {
        let today = self.clock.today();
        self.grid = MonthGrid::new(self.state.month, today);
        self.rendered_on = today;
        log::debug!("Rendered {} (today {})", self.state.month, today);
    }

    /// Re-renders when the date has changed since the last render.
    pub fn refresh_today(&mut self) -> bool {
        if self.clock.today() != self.rendered_on {
            self.render();
            true
        } else {
            false
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub fn locale(&self) -> &'static Locale {
        self.locale
    }

    pub fn header(&self) -> String {
        self.locale.month_year(self.grid.month())
    }

    pub fn is_expanded(&self) -> bool {
        self.state.expanded()
    }

    pub fn expandable(&self) -> bool {
        self.expandable
    }

    pub fn overlay_active(&self) -> bool {
        self.overlay_active
    }

    pub fn hint(&self) -> Option<&CloseHint> {
        self.hint.as_ref()
    }

    pub fn viewport(&self) -> &L {
        &self.lock
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_cell(&self) -> Option<&DayCell> {
        self.grid.cell(self.focus)
    }

    fn reset_focus(&mut self) {
        self.focus = self.grid.today_index().unwrap_or_else(|| self.grid.leading());
    }

    fn show(&mut self, month: MonthIndex) {
        self.state.month = month;
        self.render();
        self.reset_focus();
    }

    pub fn prev(&mut self) {
        let month = self.state.month.prev();
        log::debug!("Previous month: {}", month);
        self.show(month);
    }

    pub fn next(&mut self) {
        let month = self.state.month.next();
        log::debug!("Next month: {}", month);
        self.show(month);
    }

    pub fn goto(&mut self, month: MonthIndex) {
        log::debug!("Go to month: {}", month);
        self.show(month);
    }

    pub fn today(&mut self) {
        let month = MonthIndex::of(&self.clock.today()).unwrap_or(self.state.month);
        self.goto(month);
    }

    /// Moves the focused cell by `delta` cells, staying inside the grid.
    pub fn move_focus(&mut self, delta: isize) -> bool {
        let target = self.focus as isize + delta;
        if target < 0 || target >= MonthGrid::CELLS as isize {
            return false;
        }
        self.focus = target as usize;
        true
    }

    /// Dispatches a click on cell `index`. Padding cells from the adjacent
    /// months are inert and never reach the host.
    pub fn click_cell<H: Host + ?Sized>(
        &mut self,
        index: usize,
        host: &mut H,
    ) -> Option<DateClickOutcome> {
        let key = self.grid.cell(index).and_then(DayCell::date_key)?;
        self.focus = index;
        log::info!("Date clicked: {}", key);
        Some(host.on_date_click(&key))
    }

    pub fn click_focused<H: Host + ?Sized>(&mut self, host: &mut H) -> Option<DateClickOutcome> {
        self.click_cell(self.focus, host)
    }

    pub fn expand(&mut self) -> bool {
        if !self.expandable || self.state.expanded() {
            return false;
        }

        self.state.expansion = Expansion::Expanded;
        self.overlay_active = true;
        if self.hint.is_none() {
            self.hint = Some(CloseHint {
                text: self.locale.close_hint,
            });
        }
        self.lock.lock();
        log::info!("Calendar expanded");
        true
    }

    pub fn collapse(&mut self) -> bool {
        if !self.expandable || !self.state.expanded() {
            return false;
        }

        self.state.expansion = Expansion::Collapsed;
        self.overlay_active = false;
        self.hint = None;
        self.lock.release();
        log::info!("Calendar collapsed");
        true
    }

    pub fn toggle(&mut self) -> bool {
        if self.state.expanded() {
            self.collapse()
        } else {
            self.expand()
        }
    }

    pub fn click_title(&mut self) -> bool {
        self.toggle()
    }

    pub fn click_overlay(&mut self) -> bool {
        if self.overlay_active {
            self.collapse()
        } else {
            false
        }
    }

    pub fn escape(&mut self) -> bool {
        self.collapse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{locale, DateKey};
    use crate::host::tests::TestHost;
    use crate::host::{DateInput, Route, ATTENDANCE_DAY_VIEW};

    struct TestPage(Vec<ElementId>);

    impl TestPage {
        fn full() -> Self {
            TestPage(vec![
                ElementId::Calendar,
                ElementId::CalendarTitle,
                ElementId::CalendarWidget,
                ElementId::CalendarOverlay,
            ])
        }
    }

    impl Page for TestPage {
        fn has_element(&self, id: ElementId) -> bool {
            self.0.contains(&id)
        }
    }

    #[derive(Default)]
    struct CountingLock {
        locks: usize,
        releases: usize,
    }

    impl CountingLock {
        fn held(&self) -> bool {
            self.locks > self.releases
        }
    }

    impl ViewportLock for CountingLock {
        fn lock(&mut self) {
            self.locks += 1;
        }

        fn release(&mut self) {
            self.releases += 1;
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn mounted_on(today: NaiveDate) -> MountedCalendar<CountingLock, FixedClock> {
        CalendarWidget::new(FixedClock(today))
            .mount(&TestPage::full(), CountingLock::default())
            .unwrap()
    }

    #[test]
    fn starts_on_current_month_collapsed() {
        let widget = CalendarWidget::new(FixedClock(date(2026, 10, 16)));
        let state = widget.state();
        assert_eq!(state.month0(), 9);
        assert_eq!(state.year(), 2026);
        assert!(!state.expanded());
        assert_eq!(widget.render().cells().len(), MonthGrid::CELLS);
    }

    #[test]
    fn mount_requires_container() {
        let page = TestPage(vec![ElementId::CalendarTitle, ElementId::CalendarOverlay]);
        let err = CalendarWidget::new(FixedClock(date(2026, 10, 16)))
            .mount(&page, NoopViewportLock)
            .err()
            .unwrap();
        assert_eq!(err.missing, ElementId::Calendar);
        assert_eq!(err.to_string(), "page has no 'calendar' element");
    }

    #[test]
    fn mount_without_overlay_disables_expansion() {
        let page = TestPage(vec![ElementId::Calendar]);
        let mut cal = CalendarWidget::new(FixedClock(date(2026, 10, 16)))
            .mount(&page, CountingLock::default())
            .unwrap();
        assert!(!cal.expandable());
        assert!(!cal.toggle());
        assert!(!cal.is_expanded());
        assert_eq!(cal.viewport().locks, 0);
    }

    #[test]
    fn navigation_wraps_years_and_rerenders() {
        let mut cal = mounted_on(date(2026, 12, 5));
        cal.next();
        assert_eq!((cal.state().month0(), cal.state().year()), (0, 2027));
        assert_eq!(cal.grid().month(), cal.state().month);
        assert!(cal.grid().today_index().is_none());

        cal.prev();
        cal.prev();
        assert_eq!((cal.state().month0(), cal.state().year()), (10, 2026));

        cal.today();
        assert_eq!(cal.grid().today_index(), Some(cal.focus()));
    }

    #[test]
    fn twelve_next_then_twelve_prev_is_identity() {
        let mut cal = mounted_on(date(2024, 3, 1));
        let start = cal.state().month;
        for _ in 0..12 {
            cal.next();
        }
        assert_eq!(cal.state().month, MonthIndex::new(2025, 2).unwrap());
        for _ in 0..12 {
            cal.prev();
        }
        assert_eq!(cal.state().month, start);
    }

    #[test]
    fn header_follows_locale() {
        let cal = CalendarWidget::new(FixedClock(date(2026, 10, 16)))
            .with_locale(locale("pl").unwrap())
            .mount(&TestPage::full(), NoopViewportLock)
            .unwrap();
        assert_eq!(cal.header(), "październik 2026");
    }

    #[test]
    fn expand_then_escape_restores_everything() {
        let mut cal = mounted_on(date(2026, 10, 16));
        assert!(cal.click_title());
        assert!(cal.is_expanded());
        assert!(cal.overlay_active());
        assert!(cal.hint().is_some());
        assert!(cal.viewport().held());

        assert!(cal.escape());
        assert!(!cal.is_expanded());
        assert!(!cal.overlay_active());
        assert!(cal.hint().is_none());
        assert!(!cal.viewport().held());
        assert_eq!((cal.viewport().locks, cal.viewport().releases), (1, 1));
    }

    #[test]
    fn escape_is_a_noop_when_collapsed() {
        let mut cal = mounted_on(date(2026, 10, 16));
        assert!(!cal.escape());
        assert!(!cal.click_overlay());
        assert_eq!(cal.viewport().releases, 0);
    }

    #[test]
    fn overlay_click_collapses_and_title_toggles() {
        let mut cal = mounted_on(date(2026, 10, 16));
        cal.toggle();
        assert!(cal.click_overlay());
        assert!(!cal.is_expanded());

        cal.click_title();
        cal.click_title();
        assert!(!cal.is_expanded());
        assert_eq!((cal.viewport().locks, cal.viewport().releases), (2, 2));
    }

    #[test]
    fn repeated_expand_keeps_single_hint_and_lock() {
        let mut cal = mounted_on(date(2026, 10, 16));
        assert!(cal.expand());
        assert!(!cal.expand());
        assert_eq!(cal.viewport().locks, 1);
        assert_eq!(cal.hint().unwrap().text, default_locale().close_hint);
    }

    #[test]
    fn navigation_keeps_expansion() {
        let mut cal = mounted_on(date(2026, 10, 16));
        cal.expand();
        cal.next();
        assert!(cal.is_expanded());
        assert!(cal.hint().is_some());
    }

    #[test]
    fn padding_click_never_reaches_host() {
        let mut cal = mounted_on(date(2025, 1, 15));
        let mut host = TestHost::on("dashboard");
        // January 2025 starts on Wednesday, cells 0 and 1 are December
        assert!(cal.click_cell(0, &mut host).is_none());
        assert!(cal.click_cell(41, &mut host).is_none());
        assert!(cal.click_cell(100, &mut host).is_none());
        assert!(host.visited.is_empty());
    }

    #[test]
    fn day_click_navigates_with_date() {
        let mut cal = mounted_on(date(2025, 1, 15));
        let mut host = TestHost::on("dashboard");
        let outcome = cal.click_cell(2, &mut host);

        let expected = Route::new(ATTENDANCE_DAY_VIEW).with_date("2025-01-01".parse().unwrap());
        assert_eq!(outcome, Some(DateClickOutcome::Navigated(expected.clone())));
        assert_eq!(host.visited, vec![expected]);
        assert_eq!(cal.focus(), 2);
    }

    #[test]
    fn focused_click_updates_attendance_day_in_place() {
        let mut cal = mounted_on(date(2025, 1, 15));
        let mut host = TestHost::on(ATTENDANCE_DAY_VIEW);
        host.input = Some(DateInput::default());

        // focus starts on today
        assert_eq!(cal.focused_cell().unwrap().date, date(2025, 1, 15));
        assert!(cal.move_focus(1));
        let outcome = cal.click_focused(&mut host);

        assert_eq!(outcome, Some(DateClickOutcome::UpdatedInPlace { refreshed: false }));
        let expected: DateKey = "2025-01-16".parse().unwrap();
        assert_eq!(host.input.unwrap().value(), Some(expected));
    }

    #[test]
    fn focus_stays_inside_grid() {
        let mut cal = mounted_on(date(2025, 1, 15));
        cal.goto(MonthIndex::new(2025, 0).unwrap());
        assert!(!cal.move_focus(-100));
        assert!(cal.move_focus(-(cal.focus() as isize)));
        assert_eq!(cal.focus(), 0);
        assert!(!cal.move_focus(-1));
        assert!(cal.move_focus(41));
        assert!(!cal.move_focus(7));
    }

    #[test]
    fn focus_defaults_to_month_start_away_from_today() {
        let mut cal = mounted_on(date(2025, 1, 15));
        cal.next();
        // February 2025 starts on Saturday
        assert_eq!(cal.focus(), 5);
        assert!(cal.focused_cell().unwrap().is_month_start);
    }
}
