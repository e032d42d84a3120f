use chrono::Datelike;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};
use trashday_core::{holiday::week_start, schedule::day_name, service::TrashDayReport};

use crate::app::{App, Screen, headline};

const ADDRESS_HINT: &str = "Type a street address such as \"414 E 12th St\" and press Enter.";

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    // Title / header
    let header = Paragraph::new(format!(
        "trashday – holiday-adjusted trash pick-up for {}",
        app.municipality_name
    ))
    .block(Block::default().borders(Borders::ALL).title("trashday"));
    frame.render_widget(header, *header_area);

    // Main screen
    match app.screen {
        Screen::AddressEntry => draw_address_entry(frame, app, *content_area),
        Screen::Report => draw_report(frame, app, *content_area),
    }

    // Status bar
    let nav_hint = match app.screen {
        Screen::AddressEntry => {
            "Type an address · Enter look up · Tab use my location · Esc/Ctrl-C quit"
        }
        Screen::Report => "Esc/←/b new address · l use my location · q/Ctrl-C quit",
    };

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_address_entry(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // input
            Constraint::Min(0),    // hints
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [input_area, hint_area] = chunks else {
        return;
    };

    let input = Paragraph::new(app.address_input.as_str())
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Street address in {} (Enter)",
            app.municipality_name
        )))
        .wrap(Wrap { trim: true });
    frame.render_widget(input, *input_area);

    let location_hint = app.coordinates.map_or_else(
        || "No location configured. Start with --latitude and --longitude to use it.".to_owned(),
        |coordinates| format!("Press Tab to look up your location at {coordinates}."),
    );
    let lines = vec![Line::from(ADDRESS_HINT), Line::from(location_hint)];
    let hints = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("How it works"))
        .wrap(Wrap { trim: true });
    frame.render_widget(hints, *hint_area);
}

fn draw_report(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(report) = &app.report else {
        let paragraph = Paragraph::new("No lookup yet.")
            .block(Block::default().borders(Borders::ALL).title("Pick-up day"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    };

    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // headline
            Constraint::Length(4), // week strip
            Constraint::Min(0),    // details
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [headline_area, week_area, details_area] = chunks else {
        return;
    };

    let headline_widget = Paragraph::new(headline(report))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title("Pick-up day"))
        .wrap(Wrap { trim: true });
    frame.render_widget(headline_widget, *headline_area);

    draw_week(frame, report, *week_area);

    let mut lines = vec![
        detail_line("Address", report.address.clone()),
        detail_line("Parcel", report.parcel.to_string()),
        detail_line("Regular day", day_name(report.schedule.base_day).to_owned()),
        detail_line("Pick-up day", effective_label(report)),
    ];
    if let Some(holiday) = &report.weekly_holiday {
        let date = holiday.date.format("%A, %B %-d");
        let text = format!("{} on {date}", holiday.holiday_name());
        lines.push(detail_line("Holiday", text));
    }
    if let Some(coordinates) = report.coordinates {
        lines.push(detail_line("Location", coordinates.to_string()));
        lines.push(detail_line("Map", coordinates.map_embed_url()));
    }

    let details = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(Wrap { trim: false });
    frame.render_widget(details, *details_area);
}

fn draw_week(frame: &mut Frame<'_>, report: &TrashDayReport, area: Rect) {
    let Some(sunday) = week_start(report.today) else {
        return;
    };

    let cells = sunday.iter_days().take(7).map(|date| {
        let day = date.weekday();
        let label = date.format("%a %-d").to_string();
        let is_holiday = report
            .weekly_holiday
            .as_ref()
            .is_some_and(|holiday| holiday.date == date);
        let is_pickup = !report.schedule.next_week && report.schedule.effective_day == day;

        let style = if is_pickup {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else if is_holiday {
            Style::default().fg(Color::Red)
        } else if report.schedule.is_shifted && report.schedule.base_day == day {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default()
        };
        Cell::from(label).style(style)
    });

    let table = Table::new([Row::new(cells)], [Constraint::Ratio(1, 7); 7])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("This week (green: pick-up, red: holiday)"),
        )
        .column_spacing(1);

    frame.render_widget(table, area);
}

fn detail_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label:<12}"),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
    ])
}

fn effective_label(report: &TrashDayReport) -> String {
    let day = day_name(report.schedule.effective_day);
    if report.schedule.next_week {
        format!("{day} (next week)")
    } else if report.schedule.is_shifted {
        format!("{day} (moved by holiday)")
    } else {
        day.to_owned()
    }
}
