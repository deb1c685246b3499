use std::error::Error;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use crossterm::event::{self, Event};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use rangepick::{DatePicker, Mode, PickerOptions, RangePolicy, Selection, TextCodec};

mod app;
mod storage;
mod ui;

use app::App;

#[derive(Parser)]
#[command(name = "rangepick")]
#[command(about = "Pick a date or a date range in the terminal and print it on exit")]
struct Cli {
    /// Pick one day or a range
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// How clicks build a range: free-click or per-calendar
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Earliest selectable day (YYYY-MM-DD)
    #[arg(long)]
    min: Option<NaiveDate>,

    /// Latest selectable day (YYYY-MM-DD)
    #[arg(long)]
    max: Option<NaiveDate>,

    /// Display pattern, e.g. "dd/MM/yyyy" or "d MMM yyyy"
    #[arg(long)]
    pattern: Option<String>,

    /// Commit as soon as a selection is complete
    #[arg(long)]
    auto_commit: bool,

    /// Initial value, written in the display pattern
    #[arg(long)]
    value: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Single,
    Range,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    FreeClick,
    PerCalendar,
}

impl Cli {
    fn apply(&self, options: &mut PickerOptions) {
        if let Some(mode) = self.mode {
            options.mode = match mode {
                ModeArg::Single => Mode::Single,
                ModeArg::Range => Mode::Range,
            };
        }
        if let Some(policy) = self.policy {
            options.range_policy = match policy {
                PolicyArg::FreeClick => RangePolicy::FreeClick,
                PolicyArg::PerCalendar => RangePolicy::PerCalendar,
            };
        }
        if self.min.is_some() {
            options.min_date = self.min;
        }
        if self.max.is_some() {
            options.max_date = self.max;
        }
        if let Some(pattern) = &self.pattern {
            options.pattern = pattern.clone();
        }
        if self.auto_commit {
            options.auto_commit = true;
        }
    }
}

fn initial_selection(
    codec: &TextCodec,
    options: &PickerOptions,
    value: Option<&str>,
) -> Result<Selection, Box<dyn Error>> {
    let Some(text) = value else {
        return Ok(Selection::empty(options.mode));
    };
    Ok(codec.parse(text, options.mode, &options.bounds())?)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = storage::read_config();
    let mut options = config.picker;
    cli.apply(&mut options);

    let codec = TextCodec::new(options.pattern.clone(), options.locale.clone());
    let committed = initial_selection(&codec, &options, cli.value.as_deref())?;
    let picker = DatePicker::new(options, committed).with_codec(codec);

    let mut stdout = std::io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(picker, config.theme.unwrap_or_default());

    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(120))? {
            let event = event::read()?;
            if let Event::Key(key) = event {
                app.handle_key_event(key);
            }
        }
    }

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(message) = app.take_exit_message() {
        println!("{message}");
    }

    Ok(())
}
