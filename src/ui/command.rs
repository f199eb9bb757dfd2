use unsegen::input::*;

use nom::{
    character::complete::{alpha1, digit1, space1},
    combinator::{all_consuming, opt, rest},
    sequence::{preceded, tuple},
    IResult,
};

use super::context::{Context, Mode};
use crate::calendar::MonthIndex;
use crate::error::{Error, ErrorKind, Result};
use crate::host::{Host, Route};

pub struct CommandParser<'a> {
    context: &'a mut Context,
}

type Parsed<'s> = (Option<&'s str>, &'s str, Option<&'s str>);

/// `[count]name[ argument]`
fn parse_command(input: &str) -> IResult<&str, Parsed<'_>> {
    all_consuming(tuple((
        opt(digit1),
        alpha1,
        opt(preceded(space1, rest)),
    )))(input)
}

impl<'a> CommandParser<'a> {
    pub fn new(context: &'a mut Context) -> Self {
        CommandParser { context }
    }

    pub fn run_command(&mut self, cmd: &str) -> Result<()> {
        let (_, (repeat, name, arg)) = parse_command(cmd.trim())?;

        let (_, act) = COMMANDS
            .iter()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| {
                Error::new(ErrorKind::CommandParse, &format!("unknown command '{}'", name))
            })?;

        let repeats = match repeat {
            Some(digits) => digits.parse::<u32>().map_err(|_| {
                Error::new(ErrorKind::CommandParse, &format!("bad count '{}'", digits))
            })?,
            None => 1,
        };

        match (act, arg.map(str::trim).filter(|a| !a.is_empty())) {
            (Action::Repeatable(a), None) => a(self.context, repeats),
            (Action::NoArg(a), None) if repeat.is_none() => a(self.context),
            (Action::Arg(a), Some(arg)) if repeat.is_none() => a(self.context, arg),
            (Action::Arg(_), None) => Err(Error::new(
                ErrorKind::CommandParse,
                &format!("'{}' needs an argument", name),
            )),
            _ => Err(Error::new(
                ErrorKind::CommandParse,
                &format!("'{}' takes no count or argument", name),
            )),
        }
    }

    fn report_error(&mut self, error: Error) {
        log::warn!("Command failed: {}", error);
        self.context.last_error_message = Some(error.to_string());
    }
}

impl Behavior for CommandParser<'_> {
    fn input(mut self, input: Input) -> Option<Input> {
        if let Event::Key(key) = input.event {
            match key {
                Key::Char('\n') => {
                    let cmd = self.context.input_sink_mut().finish_line().to_owned();
                    self.context.mode = Mode::Normal;
                    self.context.last_error_message = None;
                    if let Err(e) = self.run_command(&cmd) {
                        self.report_error(e);
                    }
                    None
                }
                _ => Some(input),
            }
        } else {
            Some(input)
        }
    }
}

pub type ActionResult = Result<()>;

pub enum Action {
    Arg(fn(&mut Context, &str) -> ActionResult),
    NoArg(fn(&mut Context) -> ActionResult),
    Repeatable(fn(&mut Context, u32) -> ActionResult),
}

const COMMANDS: &[(&str, Action)] = &[
    (
        "next",
        Action::Repeatable(|c, n| {
            let calendar = c.calendar_mut()?;
            let month = calendar.state().month + n;
            calendar.goto(month);
            Ok(())
        }),
    ),
    (
        "prev",
        Action::Repeatable(|c, n| {
            let calendar = c.calendar_mut()?;
            let month = calendar.state().month - n;
            calendar.goto(month);
            Ok(())
        }),
    ),
    (
        "today",
        Action::NoArg(|c| {
            c.calendar_mut()?.today();
            Ok(())
        }),
    ),
    (
        "goto",
        Action::Arg(|c, arg| {
            let month: MonthIndex = arg.parse()?;
            c.calendar_mut()?.goto(month);
            Ok(())
        }),
    ),
    (
        "open",
        Action::Arg(|c, arg| {
            let route: Route = arg.parse()?;
            c.router.navigate(route);
            c.content_scroll = 0;
            Ok(())
        }),
    ),
    (
        "expand",
        Action::NoArg(|c| {
            c.calendar_mut()?.expand();
            Ok(())
        }),
    ),
    (
        "collapse",
        Action::NoArg(|c| {
            c.calendar_mut()?.collapse();
            Ok(())
        }),
    ),
    (
        "toggle",
        Action::NoArg(|c| {
            c.calendar_mut()?.toggle();
            Ok(())
        }),
    ),
    (
        "q",
        Action::NoArg(|c| {
            c.quit = true;
            Ok(())
        }),
    ),
    (
        "quit",
        Action::NoArg(|c| {
            c.quit = true;
            Ok(())
        }),
    ),
];
