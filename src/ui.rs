pub mod charting;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
    Frame,
};

use crate::{
    app::{App, Focus},
    classify::Category,
    session::SessionPhase,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

fn category_color(category: Category) -> Color {
    match category {
        Category::Letter => Color::Blue,
        Category::Number => Color::Green,
        Category::FunctionKey => Color::Magenta,
        Category::Other => Color::Yellow,
    }
}

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let tally = &self.tally;
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chart_height = if self.show_chart {
            Constraint::Min(6)
        } else {
            Constraint::Min(0)
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2), // title
                Constraint::Length(1), // total
                Constraint::Length(1), // caption
                Constraint::Length(2), // rate
                chart_height,
                Constraint::Length(2), // categories
                Constraint::Length(3), // note
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new(Span::styled("Keyboard Counter", bold_style))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let total_style = if self.is_flashing() {
            Style::default()
                .patch(bold_style)
                .fg(Color::Red)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default().patch(bold_style).fg(Color::Red)
        };
        Paragraph::new(Span::styled(
            format!(" {} ", tally.counters().total()),
            total_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        Paragraph::new(Span::styled("Total Keypresses", dim_style))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        let phase = match tally.sessions().phase() {
            SessionPhase::Active => Span::styled("  typing", Style::default().fg(Color::Green)),
            SessionPhase::Idle => Span::styled("  idle", dim_style),
        };
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{:.2} keys/sec", tally.rate()), bold_style),
            phase,
        ]))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        if self.show_chart {
            render_rate_chart(self, chunks[4], buf);
        }

        render_categories(self, chunks[5], buf);

        let (note_title, note_style) = match self.focus {
            Focus::Note => (
                "Note (typing here is not counted)",
                Style::default().fg(Color::Cyan),
            ),
            Focus::Counter => ("Note", dim_style),
        };
        let cursor = if self.focus == Focus::Note { "_" } else { "" };
        Paragraph::new(format!("{}{}", self.note, cursor))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(note_title)
                    .border_style(note_style),
            )
            .render(chunks[6], buf);

        let legend = match self.focus {
            Focus::Counter => "(tab) note / (ctrl+r) reset / (ctrl+c) quit",
            Focus::Note => "(tab/enter/esc) back to counting / (ctrl+r) reset / (ctrl+c) quit",
        };
        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[7], buf);
    }
}

fn render_rate_chart(app: &App, area: Rect, buf: &mut Buffer) {
    let history = app.tally.history();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let points = history.chart_points();
    let (x_max, y_max) = charting::compute_chart_params(&points);

    let first_label = history.first().map(|s| s.time_label()).unwrap_or_default();
    let last_label = history.last().map(|s| s.time_label()).unwrap_or_default();

    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(Style::default().fg(Color::LightBlue))
        .graph_type(GraphType::Line)
        .data(&points)];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::styled(first_label, bold_style),
                    Span::styled(last_label, bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("keys/sec")
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(y_max), bold_style),
                ]),
        );

    chart.render(area, buf);
}

fn render_categories(app: &App, area: Rect, buf: &mut Buffer) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (category, column) in Category::ALL.iter().zip(columns.iter()) {
        let count = app.tally.counters().get(*category);
        let lines = vec![
            Line::from(Span::styled(
                count.to_string(),
                Style::default()
                    .fg(category_color(*category))
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(category.label()),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(*column, buf);
    }
}
