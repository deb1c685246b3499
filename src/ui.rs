use chrono::{Datelike, NaiveDate};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use rangepick::dates::same_month;
use rangepick::{month_grid, CalendarSide, DayRole, Mode, PageDirection};

use crate::app::{App, Screen};
use crate::storage::ThemePreference;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let theme = theme_from(app.theme);
    draw_background(frame, size, &theme);

    match app.screen {
        Screen::Closed => draw_summary(frame, app, size, &theme),
        Screen::Calendar | Screen::TextInput => draw_picker(frame, app, size, &theme),
    }

    if !app.show_help {
        if let Some(toast) = app.active_toast() {
            draw_toast(frame, size, &toast.message, toast.is_error, &theme);
        }
    }

    if app.show_help {
        draw_help(frame, size, &theme);
    }
}

fn draw_summary(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let content = area.inner(Margin {
        vertical: 1,
        horizontal: 2,
    });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(2)])
        .split(content);

    frame.render_widget(header_block(app, theme), chunks[0]);

    let text = app.picker.display_text();
    let value = if text.is_empty() {
        Span::styled("Nothing selected", theme.muted_style())
    } else {
        Span::styled(text, Style::default().add_modifier(Modifier::BOLD))
    };
    let lines = vec![
        Line::from(vec![
            Span::styled("Selection: ", theme.muted_style()),
            value,
        ]),
        Line::from(""),
        Line::from("Press Enter to open the picker."),
    ];
    let body = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(panel_block(mode_title(app.picker.mode()), theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(body, chunks[1]);

    let footer = Line::from(vec![
        Span::styled("Enter open", theme.muted_style()),
        Span::raw(" · "),
        Span::styled("c copy", theme.muted_style()),
        Span::raw(" · "),
        Span::styled("m theme", theme.muted_style()),
        Span::raw(" · "),
        Span::styled("h help", theme.muted_style()),
        Span::raw(" · "),
        Span::styled("q quit", theme.muted_style()),
        status_span(app),
    ]);
    frame.render_widget(footer_block(footer, theme), chunks[2]);
}

fn draw_picker(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let content = area.inner(Margin {
        vertical: 1,
        horizontal: 2,
    });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(4),
            Constraint::Length(2),
        ])
        .split(content);

    frame.render_widget(header_block(app, theme), chunks[0]);

    let has_presets = !app.picker.presets().is_empty();
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(if has_presets {
            [Constraint::Length(22), Constraint::Min(0)]
        } else {
            [Constraint::Length(0), Constraint::Min(0)]
        })
        .split(chunks[1]);

    if has_presets {
        draw_presets(frame, app, body[0], theme);
    }

    let count = app.picker.calendar_count() as u32;
    let calendars = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, count); count as usize])
        .split(body[1]);

    for (index, rect) in calendars.iter().enumerate() {
        if let Some(side) = CalendarSide::from_index(index) {
            draw_calendar(frame, app, side, *rect, theme);
        }
    }

    draw_value_panel(frame, app, chunks[2], theme);

    let footer = Line::from(vec![
        Span::styled("Arrows move", theme.muted_style()),
        Span::raw(" · "),
        Span::styled("Enter pick", theme.muted_style()),
        Span::raw(" · "),
        Span::styled("[ ] month", theme.muted_style()),
        Span::raw(" · "),
        Span::styled("/ type", theme.muted_style()),
        Span::raw(" · "),
        Span::styled("a apply", theme.muted_style()),
        Span::raw(" · "),
        Span::styled("Esc cancel", theme.muted_style()),
        Span::raw(" · "),
        Span::styled("h help", theme.muted_style()),
        status_span(app),
    ]);
    frame.render_widget(footer_block(footer, theme), chunks[3]);
}

fn draw_presets(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let matched = app.picker.matched_preset_index();
    let items: Vec<ListItem> = app
        .picker
        .presets()
        .iter()
        .enumerate()
        .map(|(index, preset)| {
            let style = if app.picker.is_preset_disabled(index) {
                theme.disabled_style()
            } else if matched == Some(index) {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                theme.panel_style()
            };
            let marker = if matched == Some(index) { "● " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(preset.label().to_string(), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(panel_block("Presets", theme))
        .highlight_style(Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD))
        .highlight_symbol("▏ ");

    frame.render_stateful_widget(list, area, &mut app.preset_state);
}

fn draw_calendar(frame: &mut Frame, app: &App, side: CalendarSide, area: Rect, theme: &Theme) {
    let Some(month) = app.picker.cursor(side) else {
        return;
    };
    let locale = app.picker.locale();
    let focused = app.focus_side == side;

    let arrow = |direction: PageDirection, symbol: &'static str| {
        if app.picker.can_page(side, direction) {
            Span::styled(symbol, theme.title_style())
        } else {
            Span::styled(symbol, theme.disabled_style())
        }
    };
    let title = Line::from(vec![
        arrow(PageDirection::Backward, " ◀ "),
        Span::styled(
            format!("{} {}", locale.month_name(month.month()), month.year()),
            theme.title_style(),
        ),
        arrow(PageDirection::Forward, " ▶ "),
    ]);

    let cell_width = 4;
    let mut lines = Vec::new();
    let header: Vec<Span> = locale
        .weekday_header(app.picker.week_start())
        .iter()
        .map(|name| {
            let short: String = name.chars().take(2).collect();
            Span::styled(format!("{:>width$}", short, width = cell_width), theme.muted_style())
        })
        .collect();
    lines.push(Line::from(header));

    let grid = month_grid(month, app.picker.week_start());
    for week in grid.chunks(7) {
        let spans = week
            .iter()
            .map(|day| day_span(app, *day, month, focused, theme, cell_width))
            .collect::<Vec<_>>();
        lines.push(Line::from(spans));
    }

    let border_style = if focused {
        Style::default().fg(theme.accent)
    } else {
        theme.border_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .style(theme.panel_style())
        .title(title);

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(block);
    frame.render_widget(paragraph, area);
}

fn day_span(
    app: &App,
    day: NaiveDate,
    month: NaiveDate,
    focused: bool,
    theme: &Theme,
    cell_width: usize,
) -> Span<'static> {
    let label = format!("{:>width$}", day.day(), width = cell_width);
    if !same_month(day, month) {
        return Span::styled(format!("{:width$}", "", width = cell_width), theme.muted_style());
    }

    let mut style = match app.picker.day_role(day) {
        DayRole::Start | DayRole::End => Style::default()
            .bg(theme.accent)
            .fg(theme.accent_contrast())
            .add_modifier(Modifier::BOLD),
        DayRole::InRange => Style::default().fg(theme.highlight),
        DayRole::None => theme.panel_style(),
    };
    if app.picker.is_day_disabled(day) {
        style = theme.disabled_style();
    }
    if focused && day == app.focus_day {
        style = style.add_modifier(Modifier::REVERSED | Modifier::UNDERLINED);
    }
    Span::styled(label, style)
}

fn draw_value_panel(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let pending = app.picker.pending_text();
    let mut lines = vec![Line::from(vec![
        Span::styled("Pending: ", Style::default().add_modifier(Modifier::BOLD)),
        if pending.is_empty() {
            Span::styled("—", theme.muted_style())
        } else {
            Span::raw(pending)
        },
    ])];

    if app.screen == Screen::TextInput {
        lines.push(Line::from(vec![
            Span::styled("Type:    ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(app.input.clone(), Style::default().fg(theme.accent)),
            Span::styled(format!("  ({})", input_hint(app)), theme.muted_style()),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(panel_block("Value", theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn input_hint(app: &App) -> String {
    let pattern = app.picker.codec().pattern();
    match app.picker.mode() {
        Mode::Single => pattern.to_string(),
        Mode::Range => format!("{pattern}{}{pattern}", rangepick::RANGE_DELIMITER),
    }
}

fn header_block(app: &App, theme: &Theme) -> Paragraph<'static> {
    let committed = app.picker.display_text();
    let header = Line::from(vec![
        Span::styled("rangepick", theme.title_style()),
        Span::raw("  "),
        Span::styled("Mode", theme.muted_style()),
        Span::raw(": "),
        Span::styled(
            mode_title(app.picker.mode()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Committed", theme.muted_style()),
        Span::raw(": "),
        Span::raw(if committed.is_empty() {
            "—".to_string()
        } else {
            committed
        }),
    ]);
    Paragraph::new(header).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.border_style())
            .style(theme.panel_style()),
    )
}

fn footer_block<'a>(line: Line<'a>, theme: &Theme) -> Paragraph<'a> {
    Paragraph::new(line).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(theme.border_style())
            .style(theme.panel_style()),
    )
}

fn status_span(app: &App) -> Span<'static> {
    match app.visible_status() {
        Some(status) if !status.is_empty() => Span::raw(format!("   |   {}", status)),
        _ => Span::raw(""),
    }
}

fn mode_title(mode: Mode) -> &'static str {
    match mode {
        Mode::Single => "Single date",
        Mode::Range => "Date range",
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let vertical = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);
    vertical[1]
}

fn draw_toast(frame: &mut Frame, area: Rect, message: &str, is_error: bool, theme: &Theme) {
    let width = (message.len() as u16 + 6).clamp(20, area.width.saturating_sub(2).max(20));
    let height = 3;
    let x = area.x + area.width.saturating_sub(width + 1);
    let y = area.y + area.height.saturating_sub(height + 4);
    let rect = Rect::new(x, y, width.min(area.width), height.min(area.height));

    frame.render_widget(Clear, rect);
    let style = if is_error {
        Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.success).add_modifier(Modifier::BOLD)
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(message.to_string(), style)))
        .alignment(Alignment::Center)
        .block(panel_block("Picker", theme));
    frame.render_widget(paragraph, rect);
}

fn draw_help(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = centered_rect(70, 70, area);
    frame.render_widget(Clear, block);

    let header_style = Style::default().add_modifier(Modifier::BOLD).fg(theme.accent);
    let key_style = Style::default().fg(theme.highlight);

    let sections: [(&str, &[(&str, &str)]); 3] = [
        (
            "Calendar",
            &[
                ("Arrows", "Move the focused day"),
                ("Enter / Space", "Pick the focused day"),
                ("Tab", "Switch calendar"),
                ("[ / ]", "Previous / next month"),
                ("< / >", "Previous / next year"),
            ],
        ),
        (
            "Selection",
            &[
                ("p", "Highlight next preset"),
                ("P", "Apply highlighted preset"),
                ("/", "Type a value"),
                ("a", "Apply"),
                ("Esc", "Cancel"),
            ],
        ),
        (
            "General",
            &[
                ("c", "Copy selection"),
                ("m", "Toggle theme"),
                ("h / Esc", "Close help"),
                ("q", "Quit"),
            ],
        ),
    ];

    let mut rows = Vec::new();
    for (index, (title, keys)) in sections.iter().enumerate() {
        if index > 0 {
            rows.push(Row::new(vec![Cell::from(""), Cell::from("")]));
        }
        rows.push(Row::new(vec![
            Cell::from(Span::styled(*title, header_style)),
            Cell::from(""),
        ]));
        for (key, action) in keys.iter() {
            rows.push(Row::new(vec![
                Cell::from(Span::styled(*key, key_style)),
                Cell::from(*action),
            ]));
        }
    }

    let table = Table::new(rows, [Constraint::Length(20), Constraint::Min(10)])
        .block(panel_block("Help", theme))
        .column_spacing(2);

    frame.render_widget(table, block);
}

fn draw_background(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = Block::default().style(Style::default().bg(theme.bg).fg(theme.text));
    frame.render_widget(block, area);
}

fn panel_block(title: &str, theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style())
        .style(theme.panel_style())
        .title(Line::from(Span::styled(
            format!(" {} ", title),
            theme.title_style(),
        )))
}

#[derive(Clone, Copy)]
struct Theme {
    bg: Color,
    panel: Color,
    border: Color,
    text: Color,
    muted: Color,
    disabled: Color,
    accent: Color,
    highlight: Color,
    success: Color,
    error: Color,
    accent_dark: Color,
}

impl Theme {
    fn panel_style(&self) -> Style {
        Style::default().bg(self.panel).fg(self.text)
    }

    fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    fn title_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    fn disabled_style(&self) -> Style {
        Style::default()
            .fg(self.disabled)
            .add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    }

    fn accent_contrast(&self) -> Color {
        self.accent_dark
    }
}

fn theme_from(pref: ThemePreference) -> Theme {
    match pref {
        ThemePreference::Terminal => Theme {
            bg: Color::Reset,
            panel: Color::Reset,
            border: Color::DarkGray,
            text: Color::Reset,
            muted: Color::DarkGray,
            disabled: Color::DarkGray,
            accent: Color::Blue,
            highlight: Color::Yellow,
            success: Color::Green,
            error: Color::Red,
            accent_dark: Color::Black,
        },
        ThemePreference::Dark => Theme {
            bg: Color::Rgb(12, 18, 36),
            panel: Color::Rgb(18, 28, 52),
            border: Color::Rgb(44, 72, 112),
            text: Color::Rgb(220, 230, 255),
            muted: Color::Rgb(150, 170, 200),
            disabled: Color::Rgb(80, 92, 118),
            accent: Color::Rgb(90, 180, 255),
            highlight: Color::Rgb(255, 210, 120),
            success: Color::Rgb(120, 220, 140),
            error: Color::Rgb(255, 120, 120),
            accent_dark: Color::Rgb(12, 18, 36),
        },
        ThemePreference::Light => Theme {
            bg: Color::Rgb(242, 244, 248),
            panel: Color::Rgb(255, 255, 255),
            border: Color::Rgb(210, 220, 235),
            text: Color::Rgb(26, 32, 44),
            muted: Color::Rgb(90, 110, 140),
            disabled: Color::Rgb(190, 198, 210),
            accent: Color::Rgb(70, 130, 235),
            highlight: Color::Rgb(255, 165, 80),
            success: Color::Rgb(36, 150, 90),
            error: Color::Rgb(220, 60, 80),
            accent_dark: Color::Rgb(255, 255, 255),
        },
    }
}
