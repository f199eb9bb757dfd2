use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;

use super::{DateKey, MonthIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    Start,
    End,
}

/// One cell of the month grid. Produced fresh on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub is_today: bool,
    pub is_month_start: bool,
    pub is_month_end: bool,
}

impl DayCell {
    fn padding(date: NaiveDate) -> Self {
        DayCell {
            date,
            in_current_month: false,
            is_today: false,
            is_month_start: false,
            is_month_end: false,
        }
    }

    pub fn label(&self) -> u32 {
        self.date.day()
    }

    /// Only current-month cells are clickable and carry a key.
    pub fn date_key(&self) -> Option<DateKey> {
        if self.in_current_month {
            Some(DateKey::from(self.date))
        } else {
            None
        }
    }

    pub fn annotation(&self) -> Option<Annotation> {
        if self.is_month_start {
            Some(Annotation::Start)
        } else if self.is_month_end {
            Some(Annotation::End)
        } else {
            None
        }
    }
}

impl fmt::Display for DayCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.is_today {
            '*'
        } else if !self.in_current_month {
            '.'
        } else {
            ' '
        };
        write!(f, "{}{:>2}", marker, self.label())
    }
}

/// Six weeks of day cells starting on the Monday on or before the 1st.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month: MonthIndex,
    cells: Vec<DayCell>,
}

impl MonthGrid {
    pub const COLUMNS: usize = 7;
    pub const ROWS: usize = 6;
    pub const CELLS: usize = Self::COLUMNS * Self::ROWS;

    pub fn new(month: MonthIndex, today: NaiveDate) -> Self {
        let first_day = month.first_weekday() as usize;
        let days_in_month = month.num_days();
        let prev_last = month.first_day() - Duration::days(1);
        let days_in_prev_month = prev_last.day() as usize;
        let next_first = month.first_day() + Duration::days(days_in_month as i64);

        let mut current_date: u32 = 1;
        let mut next_month_date: u32 = 1;

        let cells = (1..=Self::CELLS)
            .map(|cell_number| {
                if cell_number < first_day {
                    let label = days_in_prev_month - (first_day - cell_number) + 1;
                    DayCell::padding(
                        prev_last - Duration::days((days_in_prev_month - label) as i64),
                    )
                } else if current_date <= days_in_month {
                    let date = month.first_day() + Duration::days(current_date as i64 - 1);
                    let cell = DayCell {
                        date,
                        in_current_month: true,
                        is_today: date == today,
                        is_month_start: current_date == 1,
                        is_month_end: current_date == days_in_month,
                    };
                    current_date += 1;
                    cell
                } else {
                    let cell =
                        DayCell::padding(next_first + Duration::days(next_month_date as i64 - 1));
                    next_month_date += 1;
                    cell
                }
            })
            .collect();

        MonthGrid { month, cells }
    }

    pub fn month(&self) -> MonthIndex {
        self.month
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&DayCell> {
        self.cells.get(index)
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(Self::COLUMNS)
    }

    /// Number of previous-month cells in the first week.
    pub fn leading(&self) -> usize {
        self.cells
            .iter()
            .take_while(|cell| !cell.in_current_month)
            .count()
    }

    pub fn today_index(&self) -> Option<usize> {
        self.cells.iter().position(|cell| cell.is_today)
    }
}

impl fmt::Display for MonthGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for week in self.weeks() {
            let line = week
                .iter()
                .map(|cell| cell.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
