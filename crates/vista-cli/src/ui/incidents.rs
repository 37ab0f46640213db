//! Incident screen: filter sidebar, metric cards and the tabbed views.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Bar, BarChart, BarGroup, List, ListItem, ListState, Paragraph, Row, Table, Tabs, Wrap},
};
use strum::IntoEnumIterator as _;
use vista_core::{
  aggregate::Histogram,
  dashboard::{IncidentMetrics, IncidentSnapshot},
  incident::RawTable,
  sample::NarrativeSample,
  words::WordWeight,
};

use super::{clip, draw_panel, titled};
use crate::app::{FilterList, IncidentScreen, Tab};

pub fn draw(f: &mut Frame, area: Rect, screen: &IncidentScreen<'_>) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Length(34), Constraint::Min(0)])
    .split(area);

  draw_filters(f, cols[0], screen);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(3), // metrics
      Constraint::Length(3), // tabs
      Constraint::Min(0),    // active tab
    ])
    .split(cols[1]);

  let snapshot = screen.dashboard.snapshot();
  draw_metrics(f, rows[0], &snapshot.metrics);
  draw_tabs(f, rows[1], screen.tab);

  match screen.tab {
    Tab::Overview => draw_overview(f, rows[2], snapshot),
    Tab::Narrative => draw_panel(f, rows[2], "Narrativa", &snapshot.sample, draw_narrative),
    Tab::WordCloud => {
      draw_panel(f, rows[2], "Nuvem de palavras", &snapshot.word_cloud, |f, area, words| {
        draw_word_cloud(f, area, words)
      })
    }
    Tab::Charts => draw_charts(f, rows[2], snapshot),
    Tab::RawTables => {
      let raw = &snapshot.raw;
      let title = format!("Tabela: {}", raw.table);
      draw_panel(f, rows[2], &title, &raw.content, |f, area, table| {
        draw_raw_table(f, area, table, screen.raw_scroll)
      });
    }
  }
}

// ─── Sidebar ──────────────────────────────────────────────────────────────────

fn draw_filters(f: &mut Frame, area: Rect, screen: &IncidentScreen<'_>) {
  let lists: Vec<FilterList> = FilterList::iter().collect();
  let constraints = lists.iter().map(|_| Constraint::Ratio(1, lists.len() as u32));
  let areas = Layout::default()
    .direction(Direction::Vertical)
    .constraints(constraints)
    .split(area);

  for (list, area) in lists.into_iter().zip(areas.iter()) {
    let focused = list == screen.focus;
    let labels = screen.option_labels(list);
    let selected = (0..labels.len()).filter(|i| screen.is_checked(list, *i)).count();

    let items: Vec<ListItem> = labels
      .iter()
      .enumerate()
      .map(|(i, label)| {
        let mark = if screen.is_checked(list, i) { "[x] " } else { "[ ] " };
        ListItem::new(Line::from(vec![Span::raw(mark), Span::raw(label.clone())]))
      })
      .collect();

    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let block = titled(&format!("{list} ({selected}/{})", labels.len()))
      .border_style(Style::default().fg(border));

    let highlight = if focused {
      Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
      Style::default()
    };
    let mut state = ListState::default();
    if !labels.is_empty() {
      state.select(Some(screen.cursor(list)));
    }
    let list = List::new(items).block(block).highlight_style(highlight);
    f.render_stateful_widget(list, *area, &mut state);
  }
}

// ─── Metrics and tabs ─────────────────────────────────────────────────────────

fn draw_metrics(f: &mut Frame, area: Rect, metrics: &IncidentMetrics) {
  let cards = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Ratio(1, 3); 3])
    .split(area);

  let victims = metrics.victims.map_or_else(|| "—".to_owned(), |n| n.to_string());
  let values = [
    ("Incidentes", metrics.incidents.to_string()),
    ("Vítimas", victims),
    ("Municípios", metrics.municipalities.to_string()),
  ];
  for ((label, value), area) in values.into_iter().zip(cards.iter()) {
    let line = Line::from(Span::styled(
      value,
      Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ));
    f.render_widget(Paragraph::new(line).centered().block(titled(label)), *area);
  }
}

fn draw_tabs(f: &mut Frame, area: Rect, active: Tab) {
  let titles: Vec<String> = Tab::iter().map(|t| t.to_string()).collect();
  let selected = Tab::iter().position(|t| t == active).unwrap_or(0);
  f.render_widget(
    Tabs::new(titles)
      .select(selected)
      .block(titled("Visualizações"))
      .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    area,
  );
}

// ─── Overview ─────────────────────────────────────────────────────────────────

fn draw_overview(f: &mut Frame, area: Rect, snapshot: &IncidentSnapshot) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
    .split(area);

  let per_year: Vec<(String, usize)> =
    snapshot.per_year.iter().map(|(year, n)| (year.to_string(), *n)).collect();
  if per_year.is_empty() {
    super::draw_notice(f, cols[0], "Incidentes por ano", "Nenhum incidente.", Color::Yellow);
  } else {
    draw_columns(f, cols[0], "Incidentes por ano", &per_year);
  }
  draw_shares(f, cols[1], "Incidentes por UF", &snapshot.per_state);
}

/// Vertical bars, one per `(label, count)`.
fn draw_columns(f: &mut Frame, area: Rect, title: &str, items: &[(String, usize)]) {
  let count = items.len().max(1) as u16;
  let bar_width = (area.width.saturating_sub(2) / count).saturating_sub(1).clamp(1, 8);
  let bars: Vec<Bar> = items
    .iter()
    .map(|(label, n)| {
      Bar::default()
        .label(Line::from(clip(label, bar_width as usize)))
        .value(*n as u64)
    })
    .collect();
  f.render_widget(
    BarChart::default()
      .block(titled(title))
      .data(BarGroup::default().bars(&bars))
      .bar_width(bar_width)
      .bar_gap(1)
      .bar_style(Style::default().fg(Color::Cyan)),
    area,
  );
}

/// A pie chart as a list of share bars, largest share first.
fn draw_shares(f: &mut Frame, area: Rect, title: &str, items: &[(String, usize)]) {
  let total: usize = items.iter().map(|(_, n)| n).sum();
  if total == 0 {
    super::draw_notice(f, area, title, "Nenhum incidente com UF.", Color::Yellow);
    return;
  }

  let mut sorted: Vec<&(String, usize)> = items.iter().collect();
  sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

  let bar_room = area.width.saturating_sub(16) as usize;
  let lines: Vec<Line> = sorted
    .into_iter()
    .map(|(label, n)| {
      let share = *n as f64 / total as f64;
      let filled = (share * bar_room as f64).round() as usize;
      Line::from(vec![
        Span::raw(format!("{:<4}", clip(label, 4))),
        Span::styled("█".repeat(filled.max(1)), Style::default().fg(Color::Magenta)),
        Span::raw(format!(" {:>5.1}%", share * 100.0)),
      ])
    })
    .collect();
  f.render_widget(Paragraph::new(lines).block(titled(title)), area);
}

// ─── Narrative and word cloud ─────────────────────────────────────────────────

fn draw_narrative(f: &mut Frame, area: Rect, sample: &NarrativeSample) {
  let text = vec![
    Line::from(Span::styled(
      format!("Incidente #{}", sample.incident_id),
      Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )),
    Line::raw(""),
    Line::raw(sample.text.clone()),
  ];
  f.render_widget(
    Paragraph::new(text).wrap(Wrap { trim: true }).block(titled("Narrativa (r: nova amostra)")),
    area,
  );
}

fn word_style(weight: f64) -> Style {
  match weight {
    w if w >= 0.66 => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    w if w >= 0.33 => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    w if w >= 0.15 => Style::default().fg(Color::White),
    _ => Style::default().fg(Color::DarkGray),
  }
}

fn draw_word_cloud(f: &mut Frame, area: Rect, words: &[WordWeight]) {
  let spans: Vec<Span> = words
    .iter()
    .flat_map(|w| {
      let word = if w.weight >= 0.66 { w.word.to_uppercase() } else { w.word.clone() };
      [Span::styled(word, word_style(w.weight)), Span::raw("  ")]
    })
    .collect();
  f.render_widget(
    Paragraph::new(Line::from(spans)).wrap(Wrap { trim: true }).block(titled("Nuvem de palavras")),
    area,
  );
}

// ─── Charts ───────────────────────────────────────────────────────────────────

fn draw_charts(f: &mut Frame, area: Rect, snapshot: &IncidentSnapshot) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(area);
  let top = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(rows[0]);
  let bottom = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(rows[1]);

  let municipalities = "Municípios com mais incidentes";
  if snapshot.top_municipalities.is_empty() {
    super::draw_notice(f, top[0], municipalities, "Nenhum município.", Color::Yellow);
  } else {
    draw_ranking(f, top[0], municipalities, &snapshot.top_municipalities);
  }

  let peoples = "Povos com mais vítimas";
  draw_panel(f, top[1], peoples, &snapshot.top_peoples, |f, area, items| {
    draw_ranking(f, area, peoples, items)
  });

  let types = "Tipos de violência";
  draw_panel(f, bottom[0], types, &snapshot.top_violence_types, |f, area, items| {
    draw_ranking(f, area, types, items)
  });

  draw_panel(f, bottom[1], "Idade das vítimas", &snapshot.age_histogram, draw_histogram);
}

/// Horizontal bars, largest first, the way ranked top-N lists read best.
fn draw_ranking(f: &mut Frame, area: Rect, title: &str, items: &[(String, usize)]) {
  let label_width = (area.width / 3).max(4) as usize;
  let bars: Vec<Bar> = items
    .iter()
    .rev()
    .map(|(label, n)| {
      Bar::default()
        .label(Line::from(clip(label, label_width)))
        .value(*n as u64)
    })
    .collect();
  f.render_widget(
    BarChart::default()
      .block(titled(title))
      .direction(Direction::Horizontal)
      .data(BarGroup::default().bars(&bars))
      .bar_width(1)
      .bar_gap(0)
      .bar_style(Style::default().fg(Color::Magenta)),
    area,
  );
}

fn draw_histogram(f: &mut Frame, area: Rect, histogram: &Histogram) {
  let items: Vec<(String, usize)> = histogram
    .bins
    .iter()
    .map(|bin| (format!("{:.0}", bin.lower), bin.count))
    .collect();
  let title = format!("Idade das vítimas ({} com idade)", histogram.total());
  draw_columns(f, area, &title, &items);
}

// ─── Raw tables ───────────────────────────────────────────────────────────────

fn draw_raw_table(f: &mut Frame, area: Rect, table: &RawTable, scroll: usize) {
  let visible = area.height.saturating_sub(3) as usize;
  let start = scroll.min(table.rows.len().saturating_sub(1));

  let header = Row::new(table.columns.clone()).style(Style::default().add_modifier(Modifier::BOLD));
  let rows = table.rows.iter().skip(start).take(visible).map(|r| Row::new(r.clone()));
  let width = table.columns.len().max(1) as u32;
  let widths: Vec<Constraint> = table.columns.iter().map(|_| Constraint::Ratio(1, width)).collect();

  let end = (start + visible).min(table.rows.len());
  let title = format!(
    "Tabela: {}  linhas {}-{} de {}  ([ ] troca, PgUp/PgDn rola)",
    table.name,
    if table.rows.is_empty() { 0 } else { start + 1 },
    end,
    table.rows.len(),
  );
  f.render_widget(Table::new(rows, widths).header(header).block(titled(&title)), area);
}
