use arboard::Clipboard;
use chrono::{Datelike, Duration as DayDuration, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};

use rangepick::dates::{add_months, month_end, month_start, same_month};
use rangepick::{CalendarSide, DatePicker, Notification, PageDirection};

use crate::storage::{self, ThemePreference};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Closed,
    Calendar,
    TextInput,
}

pub struct App {
    pub should_quit: bool,
    pub screen: Screen,
    pub picker: DatePicker,
    pub focus_side: CalendarSide,
    pub focus_day: NaiveDate,
    pub preset_state: ListState,
    pub input: String,
    pub status: Option<String>,
    pub theme: ThemePreference,
    pub show_help: bool,
    toast: Option<Toast>,
}

impl App {
    pub fn new(picker: DatePicker, theme: ThemePreference) -> Self {
        let focus_day = picker
            .committed()
            .start()
            .unwrap_or_else(|| picker.cursors().left);
        let mut preset_state = ListState::default();
        if !picker.presets().is_empty() {
            preset_state.select(Some(0));
        }

        App {
            should_quit: false,
            screen: Screen::Closed,
            picker,
            focus_side: CalendarSide::Left,
            focus_day,
            preset_state,
            input: String::new(),
            status: None,
            theme,
            show_help: false,
            toast: None,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.show_help {
            match key.code {
                KeyCode::Char('h') | KeyCode::Esc => self.show_help = false,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match self.screen {
            Screen::Closed => self.handle_closed_input(key),
            Screen::Calendar => self.handle_calendar_input(key),
            Screen::TextInput => self.handle_text_input(key),
        }
        self.process_notifications();
    }

    fn handle_closed_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('o') => self.open_picker(),
            KeyCode::Char('c') => self.copy_selection_to_clipboard(),
            KeyCode::Char('m') => self.toggle_theme(),
            KeyCode::Char('h') => self.show_help = true,
            _ => {}
        }
    }

    fn handle_calendar_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Left => self.move_focus(-1),
            KeyCode::Right => self.move_focus(1),
            KeyCode::Up => self.move_focus(-7),
            KeyCode::Down => self.move_focus(7),
            KeyCode::Tab | KeyCode::BackTab => self.switch_calendar(),
            KeyCode::Enter | KeyCode::Char(' ') => self.click_focused_day(),
            KeyCode::Char('[') => self.page_focused(PageDirection::Backward),
            KeyCode::Char(']') => self.page_focused(PageDirection::Forward),
            KeyCode::Char('<') => self.jump_focused_year(-1),
            KeyCode::Char('>') => self.jump_focused_year(1),
            KeyCode::Char('p') => self.select_next_preset(),
            KeyCode::Char('P') => self.apply_selected_preset(),
            KeyCode::Char('/') => {
                self.input = self.picker.pending_text();
                self.screen = Screen::TextInput;
                self.status = None;
            }
            KeyCode::Char('a') => self.picker.apply(),
            KeyCode::Esc => self.picker.cancel(),
            KeyCode::Char('h') => self.show_help = true,
            _ => {}
        }
    }

    fn handle_text_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => match self.picker.enter_text(&self.input) {
                Ok(()) => {
                    self.input.clear();
                    self.screen = Screen::Calendar;
                    self.status = None;
                    self.refocus();
                }
                Err(err) => self.status = Some(err.to_string()),
            },
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    self.input.push(ch);
                }
            }
            KeyCode::Esc => {
                self.input.clear();
                self.screen = Screen::Calendar;
                self.status = None;
            }
            _ => {}
        }
    }

    fn open_picker(&mut self) {
        self.picker.open();
        self.screen = Screen::Calendar;
        self.focus_side = CalendarSide::Left;
        self.status = None;
        self.refocus();
    }

    fn process_notifications(&mut self) {
        for notification in self.picker.take_notifications() {
            match notification {
                Notification::PendingChanged(_) => {}
                Notification::Committed(_) => {
                    let text = self.picker.display_text();
                    let message = if text.is_empty() {
                        "Selection cleared.".to_string()
                    } else {
                        format!("Selected {text}")
                    };
                    self.set_toast(message, false);
                }
                Notification::Cancelled => self.set_toast("Selection discarded.", false),
            }
        }
        if self.screen != Screen::Closed && !self.picker.is_open() {
            self.screen = Screen::Closed;
        }
    }

    /// Puts the focus on the pending start, or the first day shown.
    fn refocus(&mut self) {
        let side = self.focus_side;
        let Some(month) = self.picker.cursor(side) else {
            self.focus_side = CalendarSide::Left;
            self.focus_day = self.picker.cursors().left;
            return;
        };
        self.focus_day = match self.picker.pending().start() {
            Some(start) if same_month(start, month) => start,
            _ => match self.picker.pending().end() {
                Some(end) if same_month(end, month) => end,
                _ => month,
            },
        };
    }

    fn focused_month(&self) -> NaiveDate {
        self.picker
            .cursor(self.focus_side)
            .unwrap_or_else(|| self.picker.cursors().left)
    }

    fn move_focus(&mut self, days: i64) {
        let target = self.focus_day + DayDuration::days(days);
        let month = self.focused_month();
        if !same_month(target, month) {
            let direction = if target < month {
                PageDirection::Backward
            } else {
                PageDirection::Forward
            };
            if let Err(err) = self.picker.page(self.focus_side, direction) {
                self.status = Some(err.to_string());
                return;
            }
        }
        self.focus_day = target;
        self.status = None;
        self.picker.hover(target);
        self.keep_focus_visible();
    }

    /// Linked paging can move the other calendar under the focused day.
    fn keep_focus_visible(&mut self) {
        let month = self.focused_month();
        if !same_month(self.focus_day, month) {
            self.focus_day = clamp_to_month(self.focus_day, month);
        }
    }

    fn switch_calendar(&mut self) {
        if self.picker.calendar_count() < 2 {
            return;
        }
        self.focus_side = self.focus_side.other();
        self.refocus();
    }

    fn click_focused_day(&mut self) {
        match self.picker.click(self.focus_day, self.focus_side) {
            Ok(()) => self.status = None,
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn page_focused(&mut self, direction: PageDirection) {
        match self.picker.page(self.focus_side, direction) {
            Ok(month) => {
                self.focus_day = clamp_to_month(self.focus_day, month);
                self.status = None;
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn jump_focused_year(&mut self, delta: i32) {
        let month = self.focused_month();
        let target = add_months(month, delta * 12);
        match self.picker.jump_year(self.focus_side, target.year()) {
            Ok(month) => {
                self.focus_day = clamp_to_month(self.focus_day, month);
                self.status = None;
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn select_next_preset(&mut self) {
        let count = self.picker.presets().len();
        if count == 0 {
            return;
        }
        let selected = self.preset_state.selected().unwrap_or(0);
        let new_index = if selected + 1 >= count { 0 } else { selected + 1 };
        self.preset_state.select(Some(new_index));
    }

    fn apply_selected_preset(&mut self) {
        let Some(index) = self.preset_state.selected() else {
            return;
        };
        match self.picker.apply_preset(index) {
            Ok(()) => {
                self.status = None;
                self.refocus();
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.next();
        if let Err(err) = storage::write_theme(self.theme) {
            self.status = Some(format!("Failed to save theme: {err}"));
        }
    }

    fn copy_selection_to_clipboard(&mut self) {
        let text = self.picker.display_text();
        if text.is_empty() {
            self.set_toast("Nothing selected.", true);
            return;
        }

        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(_) => self.set_toast("Copied selection.", false),
            Err(err) => {
                let message = format!("Clipboard error: {err}");
                self.status = Some(message.clone());
                self.set_toast(message, true);
            }
        }
    }

    pub fn visible_status(&self) -> Option<String> {
        self.status.clone()
    }

    pub fn take_exit_message(&mut self) -> Option<String> {
        let text = self.picker.display_text();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn active_toast(&mut self) -> Option<ToastView> {
        let toast = self.toast.as_ref()?;
        if toast.created_at.elapsed() > Duration::from_secs(2) {
            self.toast = None;
            return None;
        }
        Some(ToastView {
            message: toast.message.clone(),
            is_error: toast.is_error,
        })
    }

    fn set_toast(&mut self, message: impl Into<String>, is_error: bool) {
        self.toast = Some(Toast {
            message: message.into(),
            created_at: Instant::now(),
            is_error,
        });
    }
}

fn clamp_to_month(day: NaiveDate, month: NaiveDate) -> NaiveDate {
    let first = month_start(month);
    let last = month_end(first);
    let wanted = first.with_day(day.day()).unwrap_or(last);
    wanted.min(last)
}

struct Toast {
    message: String,
    created_at: Instant,
    is_error: bool,
}

pub struct ToastView {
    pub message: String,
    pub is_error: bool,
}
