use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

use sales_keeper::report::{amount_label, index_label, sales_total};
use sales_keeper::{Region, SalesRecord};

/// Rows skipped by PgUp/PgDn
const PAGE: usize = 20;

pub struct App {
    pub sales: Vec<SalesRecord>,
    pub state: TableState,
}

impl App {
    pub fn new(sales: Vec<SalesRecord>) -> Self {
        let mut state = TableState::default();
        if !sales.is_empty() {
            state.select(Some(0));
        }
        Self { sales, state }
    }

    pub fn selected_record(&self) -> Option<&SalesRecord> {
        self.state.selected().and_then(|i| self.sales.get(i))
    }

    pub fn bad_count(&self) -> usize {
        self.sales.iter().filter(|s| s.has_bad_data()).count()
    }

    /// (region, count, total) in region table order, only regions with sales
    pub fn region_summary(&self) -> Vec<(&'static str, usize, f64)> {
        Region::ALL
            .iter()
            .filter_map(|region| {
                let in_region: Vec<&SalesRecord> =
                    self.sales.iter().filter(|s| s.region == region.name()).collect();
                if in_region.is_empty() {
                    None
                } else {
                    Some((region.name(), in_region.len(), sales_total(in_region)))
                }
            })
            .collect()
    }

    pub fn next(&mut self) {
        let len = self.sales.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.sales.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.sales.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + PAGE).min(len - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.sales.is_empty() {
            return;
        }
        let i = self.state.selected().map(|i| i.saturating_sub(PAGE)).unwrap_or(0);
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home if !app.sales.is_empty() => app.state.select(Some(0)),
                KeyCode::End if !app.sales.is_empty() => {
                    app.state.select(Some(app.sales.len() - 1))
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Region totals
            Constraint::Min(0),    // Sales table
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_table(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!("Total: {:.2}", sales_total(&app.sales)),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];

    for (name, count, total) in app.region_summary() {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(
            format!("{} ({}): {:.2}", name, count, total),
            Style::default().fg(Color::Cyan),
        ));
    }

    let bad = app.bad_count();
    if bad > 0 {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(
            format!("{} bad", bad),
            Style::default().fg(Color::Red),
        ));
    }

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["", "Date", "Quarter", "Region", "Amount"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.sales.iter().enumerate().map(|(idx, sales)| {
        let color = if sales.has_bad_data() { Color::Red } else { Color::White };

        let cells = vec![
            Cell::from(index_label(idx + 1, sales)),
            Cell::from(sales.date_text()),
            Cell::from(sales.quarter().to_string()),
            Cell::from(sales.region.clone()),
            Cell::from(format!("{:>15}", amount_label(&sales.amount))),
        ];

        Row::new(cells).style(Style::default().fg(color)).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(15),
            Constraint::Length(15),
            Constraint::Length(15),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Sales "),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.sales.len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(record) = app.selected_record().filter(|r| r.has_bad_data()) {
        let what = match (record.has_bad_amount(), record.has_bad_date()) {
            (true, true) => "bad amount and date",
            (true, false) => "bad amount",
            _ => "bad date",
        };
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(what, Style::default().fg(Color::Red)));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Fast | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
