pub mod widgets;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use widgets::UserListView;

const HELP_TEXT: &str = "q: Quit | ↑↓/jk: Move | r: Reload | o: Open website";

/// Draw the whole screen: the mounted view (if any) and a one-line footer.
pub fn draw(frame: &mut Frame, view: Option<&UserListView>, status: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    if let Some(view) = view {
        view.render(frame, chunks[0]);
    }

    let footer = match status {
        Some(status) => Line::from(vec![
            Span::styled(status, Style::default().fg(Color::Yellow)),
            Span::styled(format!("  {}", HELP_TEXT), Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(Span::styled(HELP_TEXT, Style::default().fg(Color::DarkGray))),
    };
    frame.render_widget(Paragraph::new(footer), chunks[1]);
}
