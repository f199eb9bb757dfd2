use std::fmt::{self, Display};

use unsegen::base::*;
use unsegen::widget::*;

use super::{ScrollLock, Theme};
use crate::calendar::{Annotation, DayCell, Locale, MonthGrid};
use crate::widget::MountedCalendar;

struct CellView<'a> {
    cell: &'a DayCell,
    width: usize,
    theme: &'a Theme,
}

impl CellView<'_> {
    fn style(&self) -> StyleModifier {
        let theme = self.theme;
        if !self.cell.in_current_month {
            theme.other_month_style
        } else if self.cell.is_today {
            theme.today_day_style.format(theme.today_day_text_style)
        } else if self.cell.is_month_start {
            theme.month_start_style
        } else if self.cell.is_month_end {
            theme.month_end_style
        } else {
            theme.day_style.format(theme.day_text_style)
        }
    }
}

/// Where the START/END mark of `week` goes: its column offset, the text and
/// which mark it is. The text may run into neighbouring cells, which never
/// carry a mark of their own since a month's first and last day are always
/// in different weeks. START ends at the right edge of its cell, END begins
/// under its day number.
fn annotation_span(
    week: &[DayCell],
    width: usize,
    locale: &Locale,
) -> Option<(usize, String, Annotation)> {
    let total = week.len() * width;
    week.iter().enumerate().find_map(|(col, cell)| {
        let annotation = cell.annotation()?;
        let text: String = locale.annotation(annotation).chars().take(total).collect();
        let len = text.chars().count();
        let offset = match annotation {
            Annotation::Start => ((col + 1) * width).saturating_sub(len),
            Annotation::End => col * width + 1,
        };
        Some((offset.min(total - len), text, annotation))
    })
}

impl Display for CellView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.cell.is_today {
            self.theme.today_day_char.unwrap_or(' ')
        } else {
            ' '
        };
        write!(
            f,
            "{}{:>width$}",
            marker,
            self.cell.label(),
            width = self.width - 1
        )
    }
}

/// The sidebar calendar: title, month header with navigation arrows,
/// weekday row and six weeks of days with a line for START/END marks.
pub struct CalendarPane<'a> {
    calendar: &'a MountedCalendar<ScrollLock>,
    theme: &'a Theme,
}

impl<'a> CalendarPane<'a> {
    const CELL_WIDTH: usize = 4;
    const EXPANDED_CELL_WIDTH: usize = 10;
    const HEADER_ROWS: usize = 3;
    const ROWS_PER_WEEK: usize = 2;

    pub fn new(calendar: &'a MountedCalendar<ScrollLock>, theme: &'a Theme) -> Self {
        CalendarPane { calendar, theme }
    }

    fn cell_width(&self) -> usize {
        if self.calendar.is_expanded() {
            Self::EXPANDED_CELL_WIDTH
        } else {
            Self::CELL_WIDTH
        }
    }

    fn title(&self) -> String {
        let title = self.calendar.locale().title;
        if self.calendar.expandable() && !self.calendar.is_expanded() {
            format!("{} [t]", title)
        } else {
            title.to_owned()
        }
    }

    fn height(&self) -> usize {
        let hint_rows = if self.calendar.hint().is_some() { 2 } else { 0 };
        Self::HEADER_ROWS + MonthGrid::ROWS * Self::ROWS_PER_WEEK + hint_rows
    }
}

impl Widget for CalendarPane<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::exact(MonthGrid::COLUMNS * self.cell_width()),
            height: RowDemand::exact(self.height()),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let theme = self.theme;
        let locale = self.calendar.locale();
        let width = self.cell_width();
        let total_width = MonthGrid::COLUMNS * width;

        let mut cursor = Cursor::new(&mut window).style_modifier(
            theme
                .month_header_style
                .format(theme.month_header_text_style),
        );

        cursor.write(&self.title());
        cursor.fill_and_wrap_line();

        let header = self.calendar.header();
        let inner = total_width.saturating_sub(4);
        cursor.write(&format!("< {:^inner$} >", header, inner = inner));
        cursor.fill_and_wrap_line();

        cursor.set_style_modifier(theme.weekday_style);
        for day in locale.weekdays.iter() {
            cursor.write(&format!("{:>width$}", day, width = width));
        }
        cursor.fill_and_wrap_line();

        let base_style = theme.day_style.format(theme.day_text_style);
        for (week_idx, week) in self.calendar.grid().weeks().enumerate() {
            let views: Vec<CellView> = week
                .iter()
                .map(|cell| CellView { cell, width, theme })
                .collect();

            for (col, view) in views.iter().enumerate() {
                let index = week_idx * MonthGrid::COLUMNS + col;
                cursor.set_style_modifier(view.style());
                if index == self.calendar.focus() {
                    cursor.apply_style_modifier(theme.focus_day_style);
                }
                cursor.write(&view.to_string());
            }
            cursor.set_style_modifier(base_style);
            cursor.fill_and_wrap_line();

            cursor.set_style_modifier(base_style);
            if let Some((offset, text, annotation)) = annotation_span(week, width, locale) {
                cursor.write(&" ".repeat(offset));
                cursor.set_style_modifier(match annotation {
                    Annotation::Start => theme.month_start_style,
                    Annotation::End => theme.month_end_style,
                });
                cursor.write(&text);
                cursor.set_style_modifier(base_style);
            }
            cursor.fill_and_wrap_line();
        }

        if let Some(hint) = self.calendar.hint() {
            cursor.fill_and_wrap_line();
            cursor.set_style_modifier(theme.hint_style);
            cursor.write(&format!("{:^width$}", hint.text, width = total_width));
        }
    }
}
