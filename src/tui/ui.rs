//! UI rendering using ratatui
//!
//! Layout:
//! ┌──────────────────────────────────────────────┐
//! │ ŞİFRE         #3 Orta · Doğa           04:12 │
//! ├──────────────────────────────────────────────┤
//! │  K   _   D   _     U   _   _   Y   _   R     │
//! │  14  6   5   12    25  28  25  28  18  21    │
//! │                                              │
//! │ Hata: 1/3   İpucu: 1/3                       │
//! │ Doğru!                                       │
//! └──────────────────────────────────────────────┘

use crate::app::{App, Mode};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use sifre::format_as_clock;

/// Width of one letter cell, including its right padding
const CELL_WIDTH: usize = 4;

/// Extra space between words
const WORD_GAP: usize = 2;

/// Render the whole screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(6),    // Board
            Constraint::Length(4), // Status / summary
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_header(frame, layout[0], app);
    render_board(frame, layout[1], app);

    if app.round().is_game_over() {
        render_end_summary(frame, layout[2], app);
    } else {
        render_status(frame, layout[2], app);
    }

    render_footer(frame, layout[3], app);
}

/// Render the header: logo, round info, timer
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(10), // Logo
            Constraint::Min(20),    // Round info
            Constraint::Length(10), // Timer
        ])
        .split(inner);

    let logo = Paragraph::new("ŞİFRE")
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Left);
    frame.render_widget(logo, header_layout[0]);

    let round = app.round();
    let mut info = format!("{} · ", round.difficulty().label());
    if let Mode::Progressive = app.mode() {
        let number = match app.last_result() {
            Some(last) if round.is_game_over() => last.sentence_number,
            _ => app.progress().current_sentence_number(),
        };
        info = format!("#{} {}", number, info);
    }
    info.push_str(app.category_name().unwrap_or("Serbest"));
    let info = Paragraph::new(info)
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center);
    frame.render_widget(info, header_layout[1]);

    let (timer_display, timer_color) = match app.time_remaining() {
        Some(seconds) => (format_as_clock(seconds), timer_color(seconds)),
        None => ("--:--".to_string(), Color::DarkGray),
    };
    let timer = Paragraph::new(timer_display)
        .style(Style::default().fg(timer_color).bold())
        .alignment(Alignment::Right);
    frame.render_widget(timer, header_layout[2]);
}

fn timer_color(seconds: u32) -> Color {
    if seconds <= 10 {
        Color::Red
    } else if seconds <= 30 {
        Color::Yellow
    } else {
        Color::Green
    }
}

/// Render the letter boxes with their numbers underneath
fn render_board(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::NONE);
    let inner = block.inner(area);
    let board = Paragraph::new(board_lines(app, inner.width as usize)).block(block);
    frame.render_widget(board, inner);
}

/// Two lines (letters, numbers) plus a spacer per row of words
fn board_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let round = app.round();
    let layout = round.layout();
    let finished = round.is_game_over();

    let mut lines = Vec::new();
    let mut letters: Vec<Span<'static>> = Vec::new();
    let mut numbers: Vec<Span<'static>> = Vec::new();
    let mut used = 0;

    for word in layout.words() {
        let word_width = word.len * CELL_WIDTH + WORD_GAP;
        if used > 0 && used + word_width > width {
            lines.push(Line::from(std::mem::take(&mut letters)));
            lines.push(Line::from(std::mem::take(&mut numbers)));
            lines.push(Line::default());
            used = 0;
        }

        for position in word.positions() {
            let answer = layout.letter_at(position).unwrap_or(' ');
            let number = round
                .mapping()
                .number_for(answer)
                .map(|n| n.to_string())
                .unwrap_or_default();

            let (shown, mut style) = match round.revealed_letter(position) {
                Some(c) if round.initial_revealed().contains(&position) => {
                    (c, Style::default().fg(Color::White).bold())
                }
                Some(c) => (c, Style::default().fg(Color::Green).bold()),
                None if finished => (answer, Style::default().fg(Color::Red)),
                None => ('_', Style::default().fg(Color::Gray)),
            };
            if !finished && position == app.cursor() {
                style = style.fg(Color::Yellow).reversed();
            }

            letters.push(Span::styled(format!("{:^3} ", shown), style));
            numbers.push(Span::styled(
                format!("{:^3} ", number),
                Style::default().fg(Color::DarkGray),
            ));
        }

        letters.push(Span::raw(" ".repeat(WORD_GAP)));
        numbers.push(Span::raw(" ".repeat(WORD_GAP)));
        used += word_width;
    }

    if !letters.is_empty() {
        lines.push(Line::from(letters));
        lines.push(Line::from(numbers));
    }

    lines
}

/// Render mistakes, hints and feedback for an active round
fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let round = app.round();
    let mistakes_color = if round.mistakes() > 0 {
        Color::Red
    } else {
        Color::White
    };

    let counters = Line::from(vec![
        Span::styled(
            format!("Hata: {}/{}", round.mistakes(), round.max_mistakes()),
            Style::default().fg(mistakes_color),
        ),
        Span::raw("   "),
        Span::styled(
            format!("İpucu: {}/{}", round.hints_used(), round.max_hints()),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw("   "),
        Span::styled(
            format!("%{:.0}", round.progress() * 100.0),
            Style::default().fg(Color::Cyan),
        ),
    ]);

    let (feedback_text, feedback_color) = format_feedback(&app.feedback);
    let feedback = Line::from(Span::styled(
        feedback_text,
        Style::default().fg(feedback_color),
    ));

    let status = Paragraph::new(vec![counters, Line::default(), feedback]);
    frame.render_widget(status, area);
}

/// Render the end-of-round summary
fn render_end_summary(frame: &mut Frame, area: Rect, app: &App) {
    let round = app.round();

    let title = if round.is_won() {
        Line::from(Span::styled(
            "KAZANDIN!",
            Style::default().fg(Color::Green).bold(),
        ))
    } else {
        Line::from(Span::styled(
            "KAYBETTİN",
            Style::default().fg(Color::Red).bold(),
        ))
    };

    let sentence = Line::from(Span::styled(
        round.sentence().text.clone(),
        Style::default().fg(Color::Yellow),
    ));

    let mut stats = format!(
        "Hata: {}/{}   İpucu: {}",
        round.mistakes(),
        round.max_mistakes(),
        round.hints_used()
    );
    if let Some(last) = app.last_result() {
        stats.push_str(&format!(
            "   Süre: {}",
            format_as_clock(last.time_spent_seconds.min(u64::from(u32::MAX)) as u32)
        ));
    }
    if let Mode::Progressive = app.mode() {
        stats.push_str(&format!(
            "   Son 5 başarı: %{:.0}   Sıradaki: {}",
            app.progress().success_rate() * 100.0,
            app.progress().current_difficulty().label()
        ));
    }
    let stats = Line::from(Span::styled(stats, Style::default().fg(Color::Cyan)));

    let summary = Paragraph::new(vec![title, sentence, stats]).alignment(Alignment::Center);
    frame.render_widget(summary, area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help = if app.round().is_game_over() {
        "Enter Sonraki cümle  Esc Çıkış"
    } else {
        "Harf Tahmin  ←→ Seç  ? İpucu  Esc Çıkış"
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

/// Format feedback with appropriate color
fn format_feedback(feedback: &str) -> (String, Color) {
    if feedback.is_empty() {
        return (String::new(), Color::White);
    }

    let color = if feedback.starts_with("Doğru") {
        Color::Green
    } else if feedback.starts_with("Yanlış") || feedback.starts_with("Süre doldu") {
        Color::Red
    } else if feedback.starts_with("İpucu:") {
        Color::Yellow
    } else {
        Color::White
    };

    (feedback.to_string(), color)
}
