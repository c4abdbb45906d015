//! Ratatui-based terminal UI.
//!
//! Seven views mirror the dashboard sections: dataset (preview, statistics,
//! distribution, correlations), series chart, ARDL/ECM results, Granger tests,
//! the 3SLS system, the scenario simulator and the workbook export.
//!
//! Nothing here exits on a data or scenario failure; every failure becomes a
//! status-line notice.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{BarChart, Block, Borders, Cell as TableCell, Clear, Paragraph, Row, Table, Tabs, Wrap},
};
use tracing::{info, warn};

use crate::app::pipeline::{self, DataState, PreparedData};
use crate::catalog::{self, ResultsCatalog, STRUCTURAL_EQUATIONS};
use crate::domain::{DashConfig, Driver, ResultTable, ScenarioShock, Tabular, Variable};
use crate::error::AppError;
use crate::io::{export, ingest::DatasetCache};
use crate::math;
use crate::report::{self, CellStyle, CoefficientBar, MAX_INTENSITY, PValueBand};
use crate::scenario;

mod plotters_chart;

use plotters_chart::{SeriesChartData, SeriesPlottersChart};

const PREVIEW_ROWS: usize = 20;
const HISTOGRAM_BINS: usize = 15;

/// Start the TUI.
pub fn run(config: DashConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Step through `all` from `current`, wrapping at both ends.
fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: i32) -> T {
    let len = all.len() as i32;
    let idx = all.iter().position(|v| *v == current).unwrap_or(0) as i32;
    all[(idx + step).rem_euclid(len) as usize]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Data,
    Series,
    Ardl,
    Granger,
    Structural,
    Scenario,
    Export,
}

impl View {
    const ALL: [View; 7] = [
        View::Data,
        View::Series,
        View::Ardl,
        View::Granger,
        View::Structural,
        View::Scenario,
        View::Export,
    ];

    fn title(self) -> &'static str {
        match self {
            View::Data => "Data",
            View::Series => "Series",
            View::Ardl => "ARDL/ECM",
            View::Granger => "Granger",
            View::Structural => "3SLS",
            View::Scenario => "Scenarios",
            View::Export => "Export",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataView {
    Preview,
    Stats,
    Distribution,
    Correlation,
}

impl DataView {
    const ALL: [DataView; 4] = [DataView::Preview, DataView::Stats, DataView::Distribution, DataView::Correlation];

    fn title(self) -> &'static str {
        match self {
            DataView::Preview => "Preview",
            DataView::Stats => "Statistics",
            DataView::Distribution => "Distribution",
            DataView::Correlation => "Correlation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArdlView {
    General,
    ShortRun,
    LongRun,
    Bounds,
    Diagnostics,
}

impl ArdlView {
    const ALL: [ArdlView; 5] = [
        ArdlView::General,
        ArdlView::ShortRun,
        ArdlView::LongRun,
        ArdlView::Bounds,
        ArdlView::Diagnostics,
    ];

    fn title(self) -> &'static str {
        match self {
            ArdlView::General => "ARDL",
            ArdlView::ShortRun => "ECM short run",
            ArdlView::LongRun => "Long run",
            ArdlView::Bounds => "Bounds test",
            ArdlView::Diagnostics => "Diagnostics",
        }
    }

    fn table_name(self) -> &'static str {
        match self {
            ArdlView::General => catalog::ARDL_GENERAL,
            ArdlView::ShortRun => catalog::ECM_SHORT,
            ArdlView::LongRun => catalog::LONG_RUN,
            ArdlView::Bounds => catalog::BOUNDS_TEST,
            ArdlView::Diagnostics => catalog::DIAGNOSTICS,
        }
    }
}

struct App {
    config: DashConfig,
    catalog: &'static ResultsCatalog,
    cache: DatasetCache,
    data: DataState,
    view: View,
    data_view: DataView,
    variable: Variable,
    ardl_view: ArdlView,
    equation: usize,
    shock: ScenarioShock,
    driver: Driver,
    last_export: Option<PathBuf>,
    status: String,
}

impl App {
    fn new(config: DashConfig) -> Self {
        let mut cache = DatasetCache::new();
        let data = pipeline::load_data(&config, &mut cache);
        let status = data.notice();
        Self {
            shock: config.shock,
            config,
            catalog: catalog::global(),
            cache,
            data,
            view: View::Data,
            data_view: DataView::Preview,
            variable: Variable::Growth,
            ardl_view: ArdlView::General,
            equation: 0,
            driver: Driver::Open,
            last_export: None,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply one key press. Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.view = cycle(&View::ALL, self.view, 1),
            KeyCode::BackTab => self.view = cycle(&View::ALL, self.view, -1),
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::Up => self.select(-1),
            KeyCode::Down => self.select(1),
            KeyCode::Char('l') => self.reload(),
            KeyCode::Char('a') => self.toggle_auto_load(),
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('r') if self.view == View::Scenario => {
                self.shock = ScenarioShock::default();
                self.status = "Shocks reset.".to_string();
            }
            _ => {}
        }
        false
    }

    /// Left/right: the view's main selector (sub-view, variable, equation, slider value).
    fn adjust(&mut self, step: i32) {
        match self.view {
            View::Data => self.data_view = cycle(&DataView::ALL, self.data_view, step),
            View::Series => self.variable = cycle(&Variable::ALL, self.variable, step),
            View::Ardl => self.ardl_view = cycle(&ArdlView::ALL, self.ardl_view, step),
            View::Structural => self.equation = cycle(&[0, 1, 2, 3], self.equation, step),
            View::Scenario => scenario::nudge(&mut self.shock, self.driver, step),
            View::Granger | View::Export => {}
        }
    }

    /// Up/down: the secondary selector (variable of the distribution, scenario driver).
    fn select(&mut self, step: i32) {
        match self.view {
            View::Scenario => self.driver = cycle(&Driver::ALL, self.driver, step),
            View::Data if self.data_view == DataView::Distribution => {
                self.variable = cycle(&Variable::ALL, self.variable, step);
            }
            View::Series => self.variable = cycle(&Variable::ALL, self.variable, step),
            _ => {}
        }
    }

    fn reload(&mut self) {
        self.data = pipeline::load_data(&self.config, &mut self.cache);
        self.status = self.data.notice();
    }

    fn toggle_auto_load(&mut self) {
        self.config.auto_load = !self.config.auto_load;
        info!(auto_load = self.config.auto_load, "auto-load toggled");
        self.reload();
        let state = if self.config.auto_load { "on" } else { "off" };
        self.status = format!("Auto-load {state}. {}", self.status);
    }

    fn export(&mut self) {
        let sheets = pipeline::export_sheets(self.catalog, self.data.prepared());
        let count = sheets.len();
        let file_name = export::default_export_file_name(chrono::Local::now().date_naive());
        let result = export::export(&sheets)
            .and_then(|bytes| export::write_export(&self.config.export_dir, &file_name, &bytes));
        match result {
            Ok(path) => {
                self.status = format!("Exported {count} sheets to {}", path.display());
                self.last_export = Some(path);
            }
            Err(e) => {
                warn!(error = %e, "export failed");
                self.status = format!("Export failed: {e}");
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        frame.render_widget(Clear, chunks[1]);
        match self.view {
            View::Data => self.draw_data(frame, chunks[1]),
            View::Series => self.draw_series(frame, chunks[1]),
            View::Ardl => self.draw_ardl(frame, chunks[1]),
            View::Granger => self.draw_granger(frame, chunks[1]),
            View::Structural => self.draw_structural(frame, chunks[1]),
            View::Scenario => self.draw_scenario(frame, chunks[1]),
            View::Export => self.draw_export(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut Frame<'_>, area: Rect) {
        let tabs = Tabs::new(View::ALL.iter().map(|v| v.title()))
            .select(self.view.index())
            .block(Block::default().borders(Borders::ALL).title(" rdash: remittances & growth "))
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }

    fn draw_footer(&self, frame: &mut Frame<'_>, area: Rect) {
        let help = match self.view {
            View::Data => "←/→ sub-view  ↑/↓ variable",
            View::Series => "←/→ variable",
            View::Ardl => "←/→ table",
            View::Structural => "←/→ equation",
            View::Scenario => "↑/↓ driver  ←/→ shock  r reset",
            View::Granger | View::Export => "",
        };
        let line = Line::from(vec![
            Span::styled(
                format!("Tab view  {help}  l reload  a auto-load  e export  q quit"),
                Style::default().fg(Color::Gray),
            ),
            Span::raw(" | "),
            Span::styled(self.status.as_str(), Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_no_data(&self, frame: &mut Frame<'_>, area: Rect) {
        let text = Text::from(vec![
            Line::from(Span::styled(self.data.notice(), Style::default().fg(Color::Yellow))),
            Line::from(""),
            Line::from("Press l to retry, a to toggle auto-load, or restart with -f <file> / --pick."),
            Line::from("Result tables and scenarios stay available without a dataset."),
        ]);
        let p = Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(Block::default().title("No dataset").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_data(&self, frame: &mut Frame<'_>, area: Rect) {
        let Some(data) = self.data.prepared() else {
            self.draw_no_data(frame, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let s = &data.summary;
        let period = match (s.min_year, s.max_year) {
            (Some(a), Some(b)) => format!("{a}–{b}"),
            _ => "n/a".to_string(),
        };
        let kpis = Paragraph::new(format!(
            "Period {period} | {} observations | {} variables | {} missing cells | {:.1}% complete",
            s.row_count, s.column_count, s.missing_cell_count, s.completeness_pct
        ))
        .block(Block::default().title(data.source.display().to_string()).borders(Borders::ALL));
        frame.render_widget(kpis, chunks[0]);

        let tabs = Tabs::new(DataView::ALL.iter().map(|v| v.title()))
            .select(DataView::ALL.iter().position(|v| *v == self.data_view).unwrap_or(0))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, chunks[1]);

        match self.data_view {
            DataView::Preview => {
                let table = table_widget(&data.augmented, None, PREVIEW_ROWS)
                    .block(Block::default().title("First 20 rows").borders(Borders::ALL));
                frame.render_widget(table, chunks[2]);
            }
            DataView::Stats => {
                let table = table_widget(&data.describe, None, usize::MAX)
                    .block(Block::default().title("Descriptive statistics").borders(Borders::ALL));
                frame.render_widget(table, chunks[2]);
            }
            DataView::Distribution => self.draw_distribution(frame, chunks[2], data),
            DataView::Correlation => {
                let table = table_widget(&data.correlation, None, usize::MAX)
                    .block(Block::default().title("Pearson correlation").borders(Borders::ALL));
                frame.render_widget(table, chunks[2]);
            }
        }
    }

    fn draw_distribution(&self, frame: &mut Frame<'_>, area: Rect, data: &PreparedData) {
        let title = format!("Distribution of {} ({})", self.variable, self.variable.description());
        let block = Block::default().title(title).borders(Borders::ALL);
        let values = data.augmented.known_values(self.variable);
        let Some(hist) = math::histogram(&values, HISTOGRAM_BINS) else {
            frame.render_widget(Paragraph::new("No known values.").block(block), area);
            return;
        };

        let labels: Vec<String> = hist.edges.iter().take(hist.counts.len()).map(|e| format!("{e:.1}")).collect();
        let bars: Vec<(&str, u64)> = labels
            .iter()
            .zip(&hist.counts)
            .map(|(l, c)| (l.as_str(), *c as u64))
            .collect();
        let bar_width = ((area.width.saturating_sub(2)) / HISTOGRAM_BINS as u16).saturating_sub(1).max(1);
        let chart = BarChart::default()
            .block(block)
            .data(bars.as_slice())
            .bar_width(bar_width)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
        frame.render_widget(chart, area);
    }

    fn draw_series(&self, frame: &mut Frame<'_>, area: Rect) {
        let Some(data) = self.data.prepared() else {
            self.draw_no_data(frame, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let values = data.augmented.known_values(self.variable);
        let kpis = match math::series_stats(&values) {
            Some(stats) => report::format_series_kpis(self.variable.column_name(), &stats),
            None => format!("{}: no known values", self.variable),
        };
        frame.render_widget(
            Paragraph::new(kpis.trim_end().to_string()).block(Block::default().borders(Borders::ALL)),
            chunks[0],
        );

        let title = format!("{} over time ({})", self.variable, self.variable.description());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(chunks[1]);
        frame.render_widget(block, chunks[1]);

        let Some(chart) = SeriesChartData::from_series(&data.augmented.series(self.variable)) else {
            return;
        };
        let y_label = self.variable.column_name();
        let widget = SeriesPlottersChart {
            segments: &chart.segments,
            points: &chart.points,
            x_bounds: chart.x_bounds,
            y_bounds: chart.y_bounds,
            x_label: "year",
            y_label,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_ardl(&self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let tabs = Tabs::new(ArdlView::ALL.iter().map(|v| v.title()))
            .select(ArdlView::ALL.iter().position(|v| *v == self.ardl_view).unwrap_or(0))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, chunks[0]);

        let table = match self.catalog.lookup(self.ardl_view.table_name()) {
            Ok(t) => t,
            Err(e) => {
                frame.render_widget(Paragraph::new(e.to_string()), chunks[1]);
                return;
            }
        };
        render_result_table(frame, chunks[1], table);

        let verdict = match table {
            ResultTable::Bounds(b) => report::format_bounds_verdict(b),
            ResultTable::Diagnostics(d) if d.all_ok() => "All residual tests pass at 5%.".to_string(),
            ResultTable::Diagnostics(_) => "At least one residual test rejects at 5%.".to_string(),
            _ => "Signif.: *** p<0.01, ** p<0.05, * p<0.10".to_string(),
        };
        frame.render_widget(
            Paragraph::new(verdict.trim_end().to_string()).block(Block::default().borders(Borders::ALL)),
            chunks[2],
        );
    }

    fn draw_granger(&self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let table = match self.catalog.lookup(catalog::GRANGER) {
            Ok(t) => t,
            Err(e) => {
                frame.render_widget(Paragraph::new(e.to_string()), area);
                return;
            }
        };
        render_result_table(frame, chunks[0], table);

        if let ResultTable::Granger(g) = table {
            let summary = report::format_granger_summary(g);
            frame.render_widget(
                Paragraph::new(summary.trim_end().to_string())
                    .style(Style::default().fg(Color::Green))
                    .block(Block::default().borders(Borders::ALL)),
                chunks[1],
            );
        }
    }

    fn draw_structural(&self, frame: &mut Frame<'_>, area: Rect) {
        let name = STRUCTURAL_EQUATIONS[self.equation % STRUCTURAL_EQUATIONS.len()];
        let table = match self.catalog.lookup(name) {
            Ok(t) => t,
            Err(e) => {
                frame.render_widget(Paragraph::new(e.to_string()), area);
                return;
            }
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(0)])
            .split(area);
        render_result_table(frame, chunks[0], table);

        let bars = table.as_coefficients().map(|c| report::coefficient_bars(&c.rows)).unwrap_or_default();
        let width = chunks[1].width.saturating_sub(2) as usize;
        let lines: Vec<Line> = bar_lines(&bars, width)
            .into_iter()
            .map(|(text, positive)| {
                let color = if positive { Color::Green } else { Color::Red };
                Line::from(Span::styled(text, Style::default().fg(color)))
            })
            .collect();
        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Coefficients (excluding intercept)").borders(Borders::ALL));
        frame.render_widget(p, chunks[1]);
    }

    fn draw_scenario(&self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let gauge_width = (chunks[0].width as usize).saturating_sub(30).max(5);
        let mut lines = Vec::new();
        for driver in Driver::ALL {
            let (min, max) = driver.bounds();
            let value = self.shock.get(driver);
            let text = format!(
                "{:<4} {:>+6.1}{:<4} {}  [{min}, {max}]",
                driver.label(),
                value,
                driver.unit(),
                slider_gauge(value, min, max, gauge_width)
            );
            let style = if driver == self.driver {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(text, style)));
            lines.push(Line::from(""));
        }
        let sliders = Paragraph::new(Text::from(lines)).block(Block::default().title("Shocks").borders(Borders::ALL));
        frame.render_widget(sliders, chunks[0]);

        let result = self
            .catalog
            .growth_equation()
            .and_then(|eq| scenario::simulate(&self.shock, eq));
        let text = match result {
            Ok(r) => {
                let color = if r.delta >= 0.0 { Color::Green } else { Color::Red };
                let mut lines = vec![
                    Line::from(Span::styled(
                        format!("Implied change in GROWTH: {:+.4} points", r.delta),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(format!("equation {}", r.equation)),
                    Line::from(""),
                ];
                for c in &r.contributions {
                    lines.push(Line::from(format!(
                        "{:<4} β={:>10.4}  term={:>9.5}  → {:>+8.4}",
                        c.driver.label(),
                        c.coefficient,
                        c.term,
                        c.value
                    )));
                }
                Text::from(lines)
            }
            Err(e) => Text::from(Line::from(Span::styled(e.to_string(), Style::default().fg(Color::Red)))),
        };
        let p = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .block(Block::default().title("Impact on growth").borders(Borders::ALL));
        frame.render_widget(p, chunks[1]);
    }

    fn draw_export(&self, frame: &mut Frame<'_>, area: Rect) {
        let sheets = pipeline::export_sheets(self.catalog, self.data.prepared());
        let file_name = export::default_export_file_name(chrono::Local::now().date_naive());
        let mut lines = vec![
            Line::from(format!(
                "Target: {}",
                self.config.export_dir.join(&file_name).display()
            )),
            Line::from(""),
            Line::from("Sheets:"),
        ];
        for (name, table) in &sheets {
            lines.push(Line::from(format!(
                "  {:<32} {} rows",
                export::sheet_name(name),
                table.rows().len()
            )));
        }
        if self.data.prepared().is_none() {
            lines.push(Line::from(Span::styled(
                "  (no dataset loaded: Data and Summary_stats are left out)",
                Style::default().fg(Color::Yellow),
            )));
        }
        lines.push(Line::from(""));
        match &self.last_export {
            Some(path) => lines.push(Line::from(format!("Last export: {}", path.display()))),
            None => lines.push(Line::from("Press e to write the workbook.")),
        }
        let p = Paragraph::new(Text::from(lines)).block(Block::default().title("Export").borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Catalog table with its styling. A styling failure is shown in the title.
fn render_result_table(frame: &mut Frame<'_>, area: Rect, table: &ResultTable) {
    let (styles, title) = match report::style_table(table) {
        Ok(styles) => (Some(styles), table.title().to_string()),
        Err(e) => {
            warn!(error = %e, "styling failed");
            (None, format!("{} (styling failed: {e})", table.title()))
        }
    };
    let widget = table_widget(table, styles.as_deref(), usize::MAX)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn table_widget(table: &dyn Tabular, styles: Option<&[Vec<CellStyle>]>, limit: usize) -> Table<'static> {
    let headers = table.headers();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();

    let mut body = Vec::new();
    for (i, row) in table.rows().iter().take(limit).enumerate() {
        let mut cells = Vec::with_capacity(row.len());
        for (c, cell) in row.iter().enumerate() {
            let text = report::fmt_cell(cell);
            if let Some(w) = widths.get_mut(c) {
                *w = (*w).max(text.chars().count());
            }
            let style = styles
                .and_then(|s| s.get(i))
                .and_then(|r| r.get(c))
                .map_or_else(Style::default, |s| cell_style(*s));
            cells.push(TableCell::from(text).style(style));
        }
        body.push(Row::new(cells));
    }

    let header = Row::new(headers.into_iter().map(TableCell::from))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    Table::new(body, widths.iter().map(|w| Constraint::Length(*w as u16)))
        .header(header)
        .column_spacing(2)
}

fn cell_style(style: CellStyle) -> Style {
    match style {
        CellStyle::Plain => Style::default(),
        CellStyle::Coefficient { positive, intensity } => {
            let level = (120.0 + 135.0 * (intensity / MAX_INTENSITY)).round().clamp(0.0, 255.0) as u8;
            let color = if positive { Color::Rgb(0, level, 0) } else { Color::Rgb(level, 0, 0) };
            Style::default().fg(color)
        }
        CellStyle::PValue(PValueBand::Strong) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        CellStyle::PValue(PValueBand::Moderate) => Style::default().fg(Color::Green),
        CellStyle::PValue(PValueBand::Weak) => Style::default().fg(Color::Yellow),
        CellStyle::PValue(PValueBand::Insignificant) => Style::default().fg(Color::DarkGray),
        CellStyle::Diagnostic { passes: true } => Style::default().fg(Color::Green),
        CellStyle::Diagnostic { passes: false } => Style::default().fg(Color::Red),
    }
}

/// Horizontal text bars scaled to the largest magnitude; `(line, positive)`.
fn bar_lines(bars: &[CoefficientBar], width: usize) -> Vec<(String, bool)> {
    let label_width = bars.iter().map(|b| b.variable.chars().count()).max().unwrap_or(0);
    let max_abs = bars.iter().map(|b| b.value.abs()).fold(0.0_f64, f64::max);
    let room = width.saturating_sub(label_width + 14).max(1);

    bars.iter()
        .map(|b| {
            let len = if max_abs > 0.0 {
                ((b.value.abs() / max_abs) * room as f64).round() as usize
            } else {
                0
            };
            let line = format!("{:<label_width$} {:>+11.4} {}", b.variable, b.value, "█".repeat(len.max(1)));
            (line, b.value > 0.0)
        })
        .collect()
}

/// `[----●-----]` marker for a slider value within `[min, max]`.
fn slider_gauge(value: f64, min: f64, max: f64, width: usize) -> String {
    let width = width.max(3);
    let u = if max > min { ((value - min) / (max - min)).clamp(0.0, 1.0) } else { 0.0 };
    let pos = (u * (width as f64 - 1.0)).round() as usize;
    let track: String = (0..width).map(|i| if i == pos { '●' } else { '─' }).collect();
    format!("[{track}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_without_data(dir: &std::path::Path) -> App {
        App::new(DashConfig {
            default_file: dir.join("base.xlsx"),
            export_dir: dir.to_path_buf(),
            ..DashConfig::default()
        })
    }

    #[test]
    fn cycle_wraps_both_ways() {
        assert_eq!(cycle(&View::ALL, View::Export, 1), View::Data);
        assert_eq!(cycle(&View::ALL, View::Data, -1), View::Export);
        assert_eq!(cycle(&[0, 1, 2, 3], 3, 1), 0);
    }

    #[test]
    fn starts_without_dataset_and_reports_it() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_without_data(dir.path());
        assert!(matches!(app.data, DataState::Unavailable(_)));
        assert!(app.status.contains("not found"));
        assert_eq!(app.shock, ScenarioShock::default());
    }

    #[test]
    fn keys_drive_views_and_sliders() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_without_data(dir.path());

        assert!(!app.handle_key(KeyCode::Tab));
        assert_eq!(app.view, View::Series);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.variable, Variable::Rem);

        for _ in 0..4 {
            app.handle_key(KeyCode::Tab);
        }
        assert_eq!(app.view, View::Scenario);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.shock.d_open, 11.0);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.driver, Driver::Rem);
        for _ in 0..100 {
            app.handle_key(KeyCode::Left);
        }
        assert_eq!(app.shock.d_rem_pct, -50.0);
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.shock, ScenarioShock::default());

        app.handle_key(KeyCode::BackTab);
        assert_eq!(app.view, View::Structural);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.equation, 3);

        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn toggling_auto_load_off_leaves_no_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_without_data(dir.path());
        app.handle_key(KeyCode::Char('a'));
        assert!(!app.config.auto_load);
        assert!(matches!(app.data, DataState::NotLoaded { .. }));
        assert!(app.status.starts_with("Auto-load off"));
    }

    #[test]
    fn export_key_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_without_data(dir.path());
        app.handle_key(KeyCode::Char('e'));
        let path = app.last_export.clone().unwrap();
        assert!(path.exists());
        assert!(app.status.contains("10 sheets"));
    }

    #[test]
    fn gauge_and_bars() {
        assert_eq!(slider_gauge(0.0, -30.0, 30.0, 5), "[──●──]");
        assert_eq!(slider_gauge(99.0, -30.0, 30.0, 5), "[────●]");

        let bars = vec![
            CoefficientBar { variable: "a".to_string(), value: 2.0 },
            CoefficientBar { variable: "bb".to_string(), value: -1.0 },
        ];
        let lines = bar_lines(&bars, 24);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].1);
        assert!(!lines[1].1);
        assert_eq!(lines[0].0.matches('█').count(), 8);
        assert_eq!(lines[1].0.matches('█').count(), 4);
    }
}
