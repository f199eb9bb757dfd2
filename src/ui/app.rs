use crate::config::Config;
use crate::events::{Dispatcher, Event};
use crate::widget::CalendarWidget;

use super::{CalendarPane, ContentScrollBehaviour, ContentWindow, Context, Mode};

use unsegen::base::{GraphemeCluster, Terminal};
use unsegen::input::{
    EditBehavior, Input, Key, Navigatable, NavigateBehavior, OperationResult, ScrollBehavior,
};
use unsegen::widget::*;

use super::command::CommandParser;

pub struct App<'a> {
    config: &'a Config,
    context: Context,
}

impl<'a> App<'a> {
    pub fn new(config: &'a Config) -> crate::error::Result<App<'a>> {
        let context = Context::new(config)?;
        Ok(App { config, context })
    }

    fn bottom_bar<'w>(&'w self) -> impl Widget + 'w {
        let spacer = " ".with_demand(|_| Demand2D {
            width: ColDemand::exact(1),
            height: RowDemand::exact(1),
        });

        let mut layout = HLayout::new()
            .separator(GraphemeCluster::try_from(' ').unwrap())
            .widget(spacer);

        layout = match (&self.context.mode, &self.context.last_error_message) {
            (Mode::Command, _) => layout.widget(self.context.input_sink().as_widget()),
            (Mode::Normal, Some(msg)) => layout.widget(msg.as_str()),
            (Mode::Normal, None) => layout.widget(self.context.locale().key_hint),
        };

        layout
    }

    fn as_widget<'w>(&'w self) -> impl Widget + 'w
    where
        'a: 'w,
    {
        let theme = &self.context.theme;
        let mut main = HLayout::new().separator(GraphemeCluster::try_from('│').unwrap());

        match &self.context.calendar {
            Some(calendar) if calendar.is_expanded() => {
                main = main.widget(CalendarPane::new(calendar, theme));
            }
            Some(calendar) => {
                main = main
                    .widget(CalendarPane::new(calendar, theme))
                    .widget(ContentWindow::new(&self.context));
            }
            None => main = main.widget(ContentWindow::new(&self.context)),
        }

        VLayout::new().widget(main).widget(self.bottom_bar())
    }

    fn draw(&self, term: &mut Terminal) {
        let root = term.create_root_window();
        self.as_widget().draw(root, RenderingHints::new());
        term.present();
    }

    fn handle_normal_input(&mut self, input: Input) {
        let context = &mut self.context;
        context.last_error_message = None;

        let leftover = input
            .chain((Key::Char('q'), || context.quit = true))
            .chain((Key::Char(':'), || context.mode = Mode::Command))
            .chain((Key::Esc, || {
                if let Some(c) = context.calendar.as_mut() {
                    c.escape();
                }
            }))
            .chain((Key::Char('\n'), || {
                context.click_focused_day();
            }))
            .chain((Key::Char('['), || {
                if let Some(c) = context.calendar.as_mut() {
                    c.prev();
                }
            }))
            .chain((Key::Char(']'), || {
                if let Some(c) = context.calendar.as_mut() {
                    c.next();
                }
            }))
            .chain((Key::Char('.'), || {
                if let Some(c) = context.calendar.as_mut() {
                    c.today();
                }
            }))
            .chain((Key::Char('t'), || {
                if let Some(c) = context.calendar.as_mut() {
                    c.click_title();
                }
            }))
            .chain((Key::Char('x'), || {
                if let Some(c) = context.calendar.as_mut() {
                    c.click_overlay();
                }
            }))
            .chain(
                NavigateBehavior::new(&mut CursorBehaviour(&mut *context))
                    .down_on(Key::Char('j'))
                    .up_on(Key::Char('k'))
                    .left_on(Key::Char('h'))
                    .right_on(Key::Char('l')),
            )
            .chain(
                ScrollBehavior::new(&mut ContentScrollBehaviour(&mut *context))
                    .forwards_on(Key::Char('J'))
                    .backwards_on(Key::Char('K')),
            )
            .finish();

        if let Some(input) = leftover {
            log::debug!("Unhandled input: {:?}", input.event);
        }
    }

    fn handle_command_input(&mut self, input: Input) {
        if input.matches(Key::Esc) {
            self.context.mode = Mode::Normal;
            return;
        }

        input
            .chain(
                EditBehavior::new(self.context.input_sink_mut())
                    .delete_forwards_on(Key::Delete)
                    .delete_backwards_on(Key::Backspace)
                    .left_on(Key::Left)
                    .right_on(Key::Right),
            )
            .chain(
                ScrollBehavior::new(self.context.input_sink_mut())
                    .backwards_on(Key::Up)
                    .forwards_on(Key::Down),
            )
            .chain(CommandParser::new(&mut self.context))
            .finish();
    }

    /// Draws once so the screen exists, then attaches `widget` to it and
    /// runs until the user quits.
    pub fn run(
        &mut self,
        dispatcher: Dispatcher,
        mut term: Terminal,
        widget: CalendarWidget,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.draw(&mut term);
        self.context.mount_calendar(self.config, widget);

        while !self.context.quit {
            self.draw(&mut term);

            match dispatcher.next()? {
                Event::Update => self.context.update(),
                Event::Signal(signal) => log::debug!("Received signal {:?}", signal),
                Event::Input(input) => match self.context.mode {
                    Mode::Normal => self.handle_normal_input(input),
                    Mode::Command => self.handle_command_input(input),
                },
            }
        }

        Ok(())
    }
}

/// Moves the focused day cell, a row is one week.
struct CursorBehaviour<'a>(&'a mut Context);

impl CursorBehaviour<'_> {
    fn shift(&mut self, delta: isize) -> OperationResult {
        match self.0.calendar.as_mut() {
            Some(calendar) => {
                if calendar.move_focus(delta) {
                    Ok(())
                } else {
                    Err(())
                }
            }
            None => Err(()),
        }
    }
}

impl Navigatable for CursorBehaviour<'_> {
    fn move_down(&mut self) -> OperationResult {
        self.shift(7)
    }

    fn move_left(&mut self) -> OperationResult {
        self.shift(-1)
    }

    fn move_right(&mut self) -> OperationResult {
        self.shift(1)
    }

    fn move_up(&mut self) -> OperationResult {
        self.shift(-7)
    }
}
