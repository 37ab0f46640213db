//! Inventory screen: sidebar controls, optional stock table, stock bar chart.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Bar, BarChart, BarGroup, Gauge, List, ListItem, Paragraph, Row, Table},
};
use strum::IntoEnumIterator as _;
use vista_core::dashboard::{StockChart, TableSection};

use super::{clip, titled};
use crate::app::{InventoryControl, InventoryScreen};

pub fn draw(f: &mut Frame, area: Rect, screen: &InventoryScreen<'_>) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Length(34), Constraint::Min(0)])
    .split(area);

  draw_controls(f, cols[0], screen);

  let snapshot = screen.dashboard.snapshot();
  match &snapshot.table {
    Some(table) => {
      let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(cols[1]);
      draw_table(f, rows[0], table);
      draw_chart(f, rows[1], snapshot.chart.as_ref());
    }
    None => draw_chart(f, cols[1], snapshot.chart.as_ref()),
  }
}

// ─── Sidebar ──────────────────────────────────────────────────────────────────

fn draw_controls(f: &mut Frame, area: Rect, screen: &InventoryScreen<'_>) {
  let block = titled("Filtros");
  let inner = block.inner(area);
  f.render_widget(block, area);

  let dash = &*screen.dashboard;
  let items: Vec<ListItem> = InventoryControl::iter()
    .map(|control| {
      let value = match control {
        InventoryControl::ShowTable => {
          if dash.show_table() { "[x]".to_owned() } else { "[ ]".to_owned() }
        }
        InventoryControl::TableCategory => format!("‹ {} ›", dash.table_category().label()),
        InventoryControl::RowLimit => match &dash.snapshot().table {
          Some(table) => format!("{} / {}", table.row_limit, table.max_rows),
          None => "—".to_owned(),
        },
        InventoryControl::ChartCategory => {
          format!("‹ {} ›", dash.chart_category().unwrap_or("—"))
        }
      };

      let style = if control == screen.focus {
        Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };
      ListItem::new(vec![
        Line::from(Span::styled(control.to_string(), style)),
        Line::from(Span::styled(format!("  {value}"), Style::default().fg(Color::Gray))),
      ])
    })
    .collect();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(0), Constraint::Length(1)])
    .split(inner);
  f.render_widget(List::new(items), rows[0]);

  // Slider-like gauge for the row limit.
  if let Some(table) = &dash.snapshot().table
    && table.max_rows > 0
  {
    let ratio = table.row_limit as f64 / table.max_rows as f64;
    f.render_widget(
      Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{} linhas", table.row_limit)),
      rows[1],
    );
  }
}

// ─── Table ────────────────────────────────────────────────────────────────────

fn draw_table(f: &mut Frame, area: Rect, table: &TableSection) {
  let header = Row::new(["Produto", "Categoria", "Quantidade", "Valor"])
    .style(Style::default().add_modifier(Modifier::BOLD));
  let rows = table.rows.iter().map(|row| {
    Row::new(vec![
      row.product.clone(),
      row.category.clone(),
      row.quantity.to_string(),
      row.value.clone(),
    ])
  });
  let widths = [
    Constraint::Percentage(35),
    Constraint::Percentage(25),
    Constraint::Percentage(15),
    Constraint::Percentage(25),
  ];
  let title = format!("Tabela de Estoque ({})", table.category.label());
  f.render_widget(Table::new(rows, widths).header(header).block(titled(&title)), area);
}

// ─── Chart ────────────────────────────────────────────────────────────────────

fn draw_chart(f: &mut Frame, area: Rect, chart: Option<&StockChart>) {
  let Some(chart) = chart else {
    let block = titled("Estoque");
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new(Span::styled("Nenhum produto no arquivo.", Style::default().fg(Color::Yellow))),
      inner,
    );
    return;
  };

  let count = chart.bars.len().max(1) as u16;
  let bar_width = (area.width.saturating_sub(2) / count).saturating_sub(1).clamp(3, 12);
  let bars: Vec<Bar> = chart
    .bars
    .iter()
    .map(|(product, quantity)| {
      Bar::default()
        .label(Line::from(clip(product, bar_width as usize)))
        .value(u64::try_from(*quantity).unwrap_or(0))
        .text_value(quantity.to_string())
    })
    .collect();

  f.render_widget(
    BarChart::default()
      .block(titled(&chart.title))
      .data(BarGroup::default().bars(&bars))
      .bar_width(bar_width)
      .bar_gap(1)
      .bar_style(Style::default().fg(Color::Green))
      .value_style(Style::default().fg(Color::Black).bg(Color::Green)),
    area,
  );
}
