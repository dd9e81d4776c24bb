use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table};
use ratatui::Frame;

use crate::core::export::CSV_HEADER;
use crate::core::generator::Mode;
use crate::core::pattern::FixedPattern;

use super::app::{App, Field};

const TITLE: &str = " telecrafter — phone number generator ";

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_form(frame, app, chunks[0]);
    draw_results(frame, app, chunks[1]);
    draw_help_bar(frame, chunks[2]);

    if let Some(ref err) = app.error {
        draw_toast(frame, &format!(" ✗ {} ", err), Color::Red);
    } else if let Some(ref msg) = app.notice {
        draw_toast(frame, &format!(" ✓ {} ", msg), Color::Green);
    }
}

fn draw_form(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(TITLE)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(block, area);

    let inner = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    };
    let f = &app.form;
    let fw = inner.width;
    let mut y = inner.y;

    // --- Prefix ---
    draw_selector(frame, inner.x, y, fw, "Prefix (first 4 digits)", &f.prefix.to_string(), f.field == Field::Prefix);
    y += 2;

    // --- Mode ---
    draw_selector(frame, inner.x, y, fw, "Generation mode", f.mode.label(), f.field == Field::Mode);
    y += 2;

    // --- Pattern ---
    if f.mode.uses_pattern() {
        let which = if f.mode == Mode::FixMiddle {
            "Middle digits"
        } else {
            "Last digits"
        };
        let pattern = f.pattern();
        let hint = FixedPattern::sanitize(pattern).remaining_hint();
        let label = format!("{} (0-5){}", which, hint);
        let active = f.field == Field::Pattern;
        let shown = if pattern.is_empty() && !active { "—" } else { pattern };
        draw_text_field(frame, inner.x, y, fw, &label, shown, active);
        if active {
            frame.set_cursor_position((inner.x + label.chars().count() as u16 + 4 + pattern.len() as u16, y));
        }
    }
    y += 2;

    // --- Count ---
    let label = "Number of combinations (max 1,000,000)";
    let active = f.field == Field::Count;
    draw_text_field(frame, inner.x, y, fw, label, &f.count, active);
    if active {
        frame.set_cursor_position((inner.x + label.len() as u16 + 4 + f.count.len() as u16, y));
    }
}

fn label_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_selector(frame: &mut Frame, x: u16, y: u16, w: u16, label: &str, value: &str, active: bool) {
    let marker = if active { "▸" } else { " " };
    let value_style = if active {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let arrows = if active { "  ◂ " } else { "  " };
    let arrows_r = if active { " ▸" } else { "" };
    let widget = Paragraph::new(Line::from(vec![
        Span::styled(format!("{} {}", marker, label), label_style(active)),
        Span::styled(arrows, Style::default().fg(Color::DarkGray)),
        Span::styled(value.to_string(), value_style),
        Span::styled(arrows_r, Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(widget, Rect { x, y, width: w, height: 1 });
}

fn draw_text_field(frame: &mut Frame, x: u16, y: u16, w: u16, label: &str, value: &str, active: bool) {
    let marker = if active { "▸" } else { " " };
    let value_style = if active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };
    let widget = Paragraph::new(Line::from(vec![
        Span::styled(format!("{} {}", marker, label), label_style(active)),
        Span::styled(format!("  {}", value), value_style),
    ]));
    frame.render_widget(widget, Rect { x, y, width: w, height: 1 });
}

fn draw_results(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if app.generating {
        let msg = Paragraph::new("Generating...")
            .block(block.title(" Generated Numbers "))
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(msg, area);
        return;
    }

    if app.results.is_empty() {
        let msg = Paragraph::new("No numbers yet. Press Enter to generate.")
            .block(block.title(" Generated Numbers "))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(msg, area);
        return;
    }

    // Only the visible window is turned into rows; result sets can be large.
    let visible = area.height.saturating_sub(3).max(1) as usize;
    let start = app.selected.saturating_sub(visible - 1);
    let rows: Vec<Row> = app.results.as_slice()[start..]
        .iter()
        .take(visible)
        .enumerate()
        .map(|(i, number)| {
            let style = if start + i == app.selected {
                Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Row::new(vec![format!("{:>8}  {}", start + i + 1, number)]).style(style)
        })
        .collect();

    let header = Row::new(vec![format!("{:>8}  {}", "#", CSV_HEADER.to_uppercase())])
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, [Constraint::Min(24)])
        .header(header)
        .block(block.title(format!(" Generated Numbers ({}) ", app.results.len())));
    frame.render_widget(table, area);
}

fn draw_toast(frame: &mut Frame, msg: &str, bg: Color) {
    let area = frame.area();
    let toast_width = (msg.chars().count() as u16).min(area.width.saturating_sub(4));
    let toast_area = Rect {
        x: area.x + (area.width.saturating_sub(toast_width)) / 2,
        y: area.y + area.height.saturating_sub(5),
        width: toast_width,
        height: 1,
    };
    frame.render_widget(Clear, toast_area);
    let widget = Paragraph::new(Span::styled(
        msg.to_string(),
        Style::default().fg(Color::White).bg(bg),
    ));
    frame.render_widget(widget, toast_area);
}

fn draw_help_bar(frame: &mut Frame, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let help = Line::from(vec![
        key(" Tab"),
        Span::raw(":field  "),
        key("◂ ▸"),
        Span::raw(":select  "),
        key("Enter"),
        Span::raw(":generate  "),
        key("t"),
        Span::raw(":txt  "),
        key("c"),
        Span::raw(":csv  "),
        key("↑↓"),
        Span::raw(":scroll  "),
        key("q"),
        Span::raw(":quit"),
    ]);

    let bar = Paragraph::new(help).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(bar, area);
}
