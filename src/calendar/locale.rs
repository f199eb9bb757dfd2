use phf::phf_map;

use super::{Annotation, MonthIndex};

pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug)]
pub struct Locale {
    pub code: &'static str,
    pub months: [&'static str; 12],
    pub weekdays: [&'static str; 7],
    pub month_start: &'static str,
    pub month_end: &'static str,
    pub close_hint: &'static str,
    pub title: &'static str,
    pub dashboard: &'static str,
    pub pick_day: &'static str,
    pub attendance: &'static str,
    pub date_label: &'static str,
    pub no_day_loaded: &'static str,
    pub showing_day: &'static str,
    /// One line per key binding, in the order of the key column.
    pub key_help: [&'static str; 9],
    pub key_hint: &'static str,
}

static LOCALES: phf::Map<&'static str, Locale> = phf_map! {
    "en" => Locale {
        code: "en",
        months: [
            "January", "February", "March", "April", "May", "June",
            "July", "August", "September", "October", "November", "December",
        ],
        weekdays: ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"],
        month_start: "START",
        month_end: "END",
        close_hint: "Press ESC or x to close the calendar",
        title: "Calendar",
        dashboard: "Dashboard",
        pick_day: "Pick a day in the calendar to see its attendance.",
        attendance: "Attendance",
        date_label: "Date",
        no_day_loaded: "No day loaded yet.",
        showing_day: "Showing records of",
        key_help: [
            "move between days",
            "open the focused day",
            "previous / next month",
            "back to today",
            "expand or collapse the calendar",
            "close the expanded calendar",
            "scroll this pane",
            "command line",
            "quit",
        ],
        key_hint: "[ ] month  . today  t expand  Enter open  : command  q quit",
    },
    "pl" => Locale {
        code: "pl",
        months: [
            "styczeń", "luty", "marzec", "kwiecień", "maj", "czerwiec",
            "lipiec", "sierpień", "wrzesień", "październik", "listopad", "grudzień",
        ],
        weekdays: ["Pn", "Wt", "Śr", "Cz", "Pt", "So", "Nd"],
        month_start: "POCZĄTEK",
        month_end: "KONIEC",
        close_hint: "Naciśnij ESC lub x, aby zamknąć kalendarz",
        title: "Kalendarz",
        dashboard: "Panel główny",
        pick_day: "Wybierz dzień w kalendarzu, aby zobaczyć obecności.",
        attendance: "Obecności",
        date_label: "Data",
        no_day_loaded: "Nie wczytano jeszcze żadnego dnia.",
        showing_day: "Rekordy z dnia",
        key_help: [
            "poruszanie po dniach",
            "otwórz wybrany dzień",
            "poprzedni / następny miesiąc",
            "powrót do dzisiaj",
            "rozwiń lub zwiń kalendarz",
            "zamknij rozwinięty kalendarz",
            "przewijanie panelu",
            "wiersz poleceń",
            "wyjście",
        ],
        key_hint: "[ ] miesiąc  . dziś  t rozwiń  Enter otwórz  : polecenie  q wyjście",
    },
};

/// Looks up a locale by its language code, e.g. `"pl"`.
pub fn locale(code: &str) -> Option<&'static Locale> {
    LOCALES.get(code)
}

pub fn default_locale() -> &'static Locale {
    &LOCALES[DEFAULT_LOCALE]
}

impl Locale {
    pub fn month_name(&self, month: MonthIndex) -> &'static str {
        self.months[month.month0() as usize]
    }

    /// Header text, e.g. `październik 2026`.
    pub fn month_year(&self, month: MonthIndex) -> String {
        format!("{} {}", self.month_name(month), month.year())
    }

    pub fn annotation(&self, annotation: Annotation) -> &'static str {
        match annotation {
            Annotation::Start => self.month_start,
            Annotation::End => self.month_end,
        }
    }
}
