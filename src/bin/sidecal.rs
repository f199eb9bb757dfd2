extern crate sidecal as lib;

use flexi_logger::{FileSpec, Logger};
use lib::calendar::MonthIndex;
use lib::events::Dispatcher;
use lib::ui::App;
use lib::widget::CalendarWidget;
use nix::sys::{signal, termios};
use std::io::stdout;
use std::path::PathBuf;
use structopt::StructOpt;
use unsegen::base::Terminal;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "sidecal",
    about = "Sidebar month calendar of the attendance admin."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only print the month grid non-interactively"
    )]
    pub show: bool,

    #[structopt(long = "month", help = "initially shown month (YYYY-MM)")]
    pub month: Option<MonthIndex>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn print_month(widget: &CalendarWidget, locale: &lib::calendar::Locale) {
    let grid = widget.render();
    println!("{}", locale.month_year(grid.month()));
    let heads: Vec<String> = locale.weekdays.iter().map(|d| format!("{:>3}", d)).collect();
    println!("{}", heads.join(" "));
    println!("{}", grid);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    let locale = config.locale()?;

    let mut widget = CalendarWidget::default().with_locale(locale);
    if let Some(month) = args.month {
        widget = widget.with_month(month);
    }

    if args.show {
        print_month(&widget, locale);
        return Ok(());
    }

    const STDOUT: std::os::unix::io::RawFd = 0;
    let orig_attr = std::sync::Mutex::new(termios::tcgetattr(STDOUT)?);

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        if let Ok(attr) = orig_attr.lock() {
            let _ = termios::tcsetattr(STDOUT, termios::SetArg::TCSANOW, &attr);
        }

        println!("sidecal ran into a fatal error!");
        println!("Please report it together with a log file and the backtrace below.");

        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let mut signals_to_wait = signal::SigSet::empty();
    signals_to_wait.add(signal::SIGWINCH);

    let dispatcher = Dispatcher::from_config(&config, signals_to_wait);
    // Setup unsegen terminal
    let stdout = stdout();
    let term = Terminal::new(stdout.lock())?;

    let mut app = App::new(&config)?;

    app.run(dispatcher, term, widget)
}
