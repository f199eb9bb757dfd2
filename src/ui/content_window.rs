use std::fmt::{Display, Write};
use unsegen::base::*;
use unsegen::input::Scrollable;
use unsegen::widget::*;

use crate::ui::{Context, View};

enum Line {
    Title(String),
    Text(String),
    Hint(String),
}

impl Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Title(text) | Line::Text(text) => write!(f, "{}", text),
            Line::Hint(text) => write!(f, "  {}", text),
        }
    }
}

const KEYS: [&str; 9] = ["h j k l", "Enter", "[ ]", ".", "t", "x, Esc", "J K", ":", "q"];

fn lines(context: &Context) -> Vec<Line> {
    let locale = context.locale();
    let mut lines = Vec::new();
    match context.router.view() {
        View::Dashboard => {
            lines.push(Line::Title(locale.dashboard.to_owned()));
            lines.push(Line::Text(context.now().format("%Y-%m-%d").to_string()));
            lines.push(Line::Text(locale.pick_day.to_owned()));
            lines.push(Line::Text(String::new()));
            lines.extend(
                KEYS.iter()
                    .zip(locale.key_help.iter())
                    .map(|(keys, what)| Line::Hint(format!("{:<8} {}", keys, what))),
            );
        }
        View::AttendanceDay(day) => {
            lines.push(Line::Title(locale.attendance.to_owned()));
            let date = day
                .date_input
                .value()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "----------".to_owned());
            lines.push(Line::Text(format!("{}: [{}]", locale.date_label, date)));
            match day.loaded {
                Some(loaded) => lines.push(Line::Text(format!(
                    "{} {} ({})",
                    locale.showing_day, loaded, day.reloads
                ))),
                None => lines.push(Line::Text(locale.no_day_loaded.to_owned())),
            }
        }
        View::Other(name) => {
            lines.push(Line::Title(name.clone()));
        }
    }
    lines
}

pub struct ContentWindow<'a> {
    context: &'a Context,
}

impl<'a> ContentWindow<'a> {
    pub fn new(context: &'a Context) -> Self {
        ContentWindow { context }
    }
}

impl Widget for ContentWindow<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(10),
            height: RowDemand::at_least(10),
        }
    }

    fn draw(&self, mut window: unsegen::base::Window, _hints: RenderingHints) {
        let theme = &self.context.theme;
        let mut cursor = Cursor::new(&mut window);

        for line in lines(self.context).into_iter().skip(self.context.content_scroll) {
            let saved_style = cursor.get_style_modifier();
            match line {
                Line::Title(_) => cursor.apply_style_modifier(theme.month_header_style),
                Line::Hint(_) => cursor.apply_style_modifier(theme.hint_style),
                Line::Text(_) => {}
            }

            if let Err(err) = write!(&mut cursor, "{}", line) {
                log::warn!("Error while writing line: {}", err);
            }
            cursor.fill_and_wrap_line();
            cursor.set_style_modifier(saved_style);
        }
    }
}

/// Scrolls the content pane unless the expanded calendar holds the lock.
pub struct ContentScrollBehaviour<'a>(pub &'a mut Context);

impl Scrollable for ContentScrollBehaviour<'_> {
    fn scroll_backwards(&mut self) -> unsegen::input::OperationResult {
        if !self.0.viewport_locked() && self.0.content_scroll > 0 {
            self.0.content_scroll -= 1;
            Ok(())
        } else {
            Err(())
        }
    }

    fn scroll_forwards(&mut self) -> unsegen::input::OperationResult {
        let num_lines = lines(self.0).len();
        if !self.0.viewport_locked() && self.0.content_scroll + 1 < num_lines {
            self.0.content_scroll += 1;
            Ok(())
        } else {
            Err(())
        }
    }
}
