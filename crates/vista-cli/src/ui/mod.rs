//! TUI rendering: header, the active dashboard and the status bar.

pub mod incidents;
pub mod inventory;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use vista_core::dashboard::Panel;

use crate::app::{App, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  match &app.screen {
    Screen::Inventory(screen) => inventory::draw(f, rows[1], screen),
    Screen::Incidents(screen) => incidents::draw(f, rows[1], screen),
  }
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let title = match app.screen {
    Screen::Inventory(_) => " vista  Controle de Estoque",
    Screen::Incidents(_) => " vista  Violência contra Povos Indígenas",
  };
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(title, Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);
  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  f.render_widget(Paragraph::new(line).style(Style::default().bg(Color::DarkGray)), area);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match &app.screen {
    Screen::Inventory(_) => ("ESTOQUE", "↑↓ control  ←→ change  space table  q quit"),
    Screen::Incidents(_) => (
      "INCIDENTES",
      "tab view  ←→ filter  ↑↓ option  space toggle  a/n all/none  r resample  [ ] table  q quit",
    ),
  };

  let status = if app.status_msg.is_empty() { hints } else { app.status_msg.as_str() };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode_label} "),
      Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray)),
  ]);
  f.render_widget(Paragraph::new(line).style(Style::default().bg(Color::Black)), area);
}

// ─── Shared helpers ───────────────────────────────────────────────────────────

fn titled(title: &str) -> Block<'static> {
  Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray))
}

/// Render `panel` with `ready`, or a notice in place of the missing content.
fn draw_panel<T>(
  f: &mut Frame,
  area: Rect,
  title: &str,
  panel: &Panel<T>,
  ready: impl FnOnce(&mut Frame, Rect, &T),
) {
  match panel {
    Panel::Ready { data } => ready(f, area, data),
    Panel::InsufficientData => {
      draw_notice(f, area, title, "Dados insuficientes para os filtros atuais.", Color::Yellow)
    }
    Panel::Degraded { reason } => {
      draw_notice(f, area, title, &format!("Indisponível: {reason}"), Color::Red)
    }
  }
}

fn draw_notice(f: &mut Frame, area: Rect, title: &str, message: &str, color: Color) {
  let block = titled(title);
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(Span::styled(message.to_owned(), Style::default().fg(color)))
      .wrap(Wrap { trim: true }),
    inner,
  );
}

/// Truncate `label` to `width` characters, marking the cut with `…`.
fn clip(label: &str, width: usize) -> String {
  if label.chars().count() <= width {
    return label.to_owned();
  }
  let mut clipped: String = label.chars().take(width.saturating_sub(1)).collect();
  clipped.push('…');
  clipped
}
