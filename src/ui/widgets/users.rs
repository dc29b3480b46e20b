use crate::query::QueryResult;
use crate::users::{FieldSet, UserRecord};
use jiff::{tz::TimeZone, Timestamp};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub const LOADING_TEXT: &str = "Almost there...";

/// The user list, driven entirely by the current query snapshot.
pub struct UserListView {
    title: String,
    fields: FieldSet,
    result: QueryResult<Vec<UserRecord>>,
    settled_at: Option<Timestamp>,
    scroll_state: ListState,
}

impl UserListView {
    pub fn new(title: impl Into<String>, fields: FieldSet) -> Self {
        Self {
            title: title.into(),
            fields,
            result: QueryResult::Pending,
            settled_at: None,
            scroll_state: ListState::default(),
        }
    }

    pub fn result(&self) -> &QueryResult<Vec<UserRecord>> {
        &self.result
    }

    /// Apply a new snapshot. Returns whether the view changed.
    ///
    /// A terminal state is final: anything after it is ignored.
    pub fn apply(&mut self, result: QueryResult<Vec<UserRecord>>) -> bool {
        if self.result.is_terminal() || result.is_pending() {
            return false;
        }

        if let QueryResult::Succeeded(users) = &result {
            self.scroll_state
                .select(if users.is_empty() { None } else { Some(0) });
        }
        self.result = result;
        self.settled_at = Some(Timestamp::now());
        true
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.result, QueryResult::Failed(_))
    }

    pub fn users(&self) -> &[UserRecord] {
        match &self.result {
            QueryResult::Succeeded(users) => users,
            _ => &[],
        }
    }

    /// `(key, label)` per rendered list item, in display order.
    pub fn keyed_items(&self) -> Vec<(&str, &str)> {
        self.users()
            .iter()
            .map(|user| (user.id.as_str(), user.name.as_str()))
            .collect()
    }

    pub fn selected_user(&self) -> Option<&UserRecord> {
        self.users().get(self.scroll_state.selected()?)
    }

    pub fn scroll_up(&mut self) {
        if let Some(selected) = self.scroll_state.selected() {
            if selected > 0 {
                self.scroll_state.select(Some(selected - 1));
            }
        }
    }

    pub fn scroll_down(&mut self) {
        if let Some(selected) = self.scroll_state.selected() {
            if selected < self.users().len().saturating_sub(1) {
                self.scroll_state.select(Some(selected + 1));
            }
        }
    }

    /// Plain-text rendering, one entry per line.
    pub fn plain_lines(&self) -> Vec<String> {
        match &self.result {
            QueryResult::Pending => vec![LOADING_TEXT.to_string()],
            QueryResult::Failed(message) => vec![message.clone()],
            QueryResult::Succeeded(users) => {
                let mut lines = Vec::with_capacity(users.len() + 1);
                lines.push(self.title.clone());
                for user in users {
                    match self.details(user) {
                        Some(details) => {
                            lines.push(format!("{}\t{}\t{}", user.id, user.name, details))
                        }
                        None => lines.push(format!("{}\t{}", user.id, user.name)),
                    }
                }
                lines
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(self.block_title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));

        match &self.result {
            QueryResult::Pending => {
                let loading = Paragraph::new(Span::styled(
                    LOADING_TEXT,
                    Style::default().fg(Color::DarkGray),
                ))
                .block(block);
                frame.render_widget(loading, area);
            }
            QueryResult::Failed(message) => {
                let error = Paragraph::new(Span::styled(
                    message.as_str(),
                    Style::default().fg(Color::Red),
                ))
                .wrap(Wrap { trim: false })
                .block(block);
                frame.render_widget(error, area);
            }
            QueryResult::Succeeded(users) => {
                let inner = block.inner(area);
                frame.render_widget(block, area);

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(1), Constraint::Min(0)])
                    .split(inner);

                let header = Paragraph::new(Span::styled(
                    self.title.as_str(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ));
                frame.render_widget(header, chunks[0]);

                let items: Vec<ListItem> = users.iter().map(|user| self.list_item(user)).collect();
                let list = List::new(items).highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                );

                let mut state = self.scroll_state.clone();
                frame.render_stateful_widget(list, chunks[1], &mut state);
            }
        }
    }

    fn block_title(&self) -> String {
        let settled = self.settled_at.map(|ts| {
            ts.to_zoned(TimeZone::system())
                .strftime("%H:%M:%S")
                .to_string()
        });

        match (&self.result, settled) {
            (QueryResult::Succeeded(users), Some(time)) => {
                format!(" usertui ({} users, {}) ", users.len(), time)
            }
            (QueryResult::Failed(_), Some(time)) => format!(" usertui (failed, {}) ", time),
            _ => " usertui ".to_string(),
        }
    }

    fn list_item<'a>(&self, user: &'a UserRecord) -> ListItem<'a> {
        let name_line = Line::from(vec![
            Span::styled("• ", Style::default().fg(Color::DarkGray)),
            Span::styled(user.name.as_str(), Style::default().fg(Color::White)),
        ]);

        match self.details(user) {
            Some(details) => {
                let meta_line = Line::from(Span::styled(
                    format!("   {}", details),
                    Style::default().fg(Color::DarkGray),
                ));
                ListItem::new(vec![name_line, meta_line])
            }
            None => ListItem::new(name_line),
        }
    }

    fn details(&self, user: &UserRecord) -> Option<String> {
        if self.fields != FieldSet::Full {
            return None;
        }

        let parts: Vec<&str> = [&user.email, &user.phone, &user.website]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" | "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn ada_and_grace() -> Vec<UserRecord> {
        vec![UserRecord::new("1", "Ada"), UserRecord::new("2", "Grace")]
    }

    fn render_to_string(view: &UserListView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|frame| view.render(frame, frame.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_initial_state_is_pending() {
        let view = UserListView::new("Users", FieldSet::Basic);
        assert!(view.result().is_pending());
        assert!(view.users().is_empty());
        assert_eq!(view.plain_lines(), vec![LOADING_TEXT.to_string()]);

        let screen = render_to_string(&view);
        assert!(screen.contains(LOADING_TEXT));
        assert!(!screen.contains("Users"));
    }

    #[test]
    fn test_success_renders_keyed_items_in_order() {
        let mut view = UserListView::new("Users", FieldSet::Basic);
        assert!(view.apply(QueryResult::Succeeded(ada_and_grace())));

        assert_eq!(view.keyed_items(), vec![("1", "Ada"), ("2", "Grace")]);

        let screen = render_to_string(&view);
        let header = screen.find("Users").unwrap();
        let ada = screen.find("Ada").unwrap();
        let grace = screen.find("Grace").unwrap();
        assert!(header < ada && ada < grace);
        assert!(!screen.contains(LOADING_TEXT));
    }

    #[test]
    fn test_empty_success_renders_header_only() {
        let mut view = UserListView::new("Users", FieldSet::Basic);
        view.apply(QueryResult::Succeeded(Vec::new()));

        assert!(view.keyed_items().is_empty());
        assert!(view.selected_user().is_none());
        assert_eq!(view.plain_lines(), vec!["Users".to_string()]);

        let screen = render_to_string(&view);
        assert!(screen.contains("Users"));
        assert!(!screen.contains('•'));
    }

    #[test]
    fn test_failure_renders_message_verbatim() {
        let mut view = UserListView::new("Users", FieldSet::Basic);
        view.apply(QueryResult::Failed("Network error".to_string()));

        assert_eq!(view.plain_lines(), vec!["Network error".to_string()]);
        assert!(view.keyed_items().is_empty());

        let screen = render_to_string(&view);
        assert!(screen.contains("Network error"));
        assert!(!screen.contains("Users"));
        assert!(!screen.contains(LOADING_TEXT));
    }

    #[test]
    fn test_duplicate_ids_are_all_rendered() {
        let mut view = UserListView::new("Users", FieldSet::Basic);
        view.apply(QueryResult::Succeeded(vec![
            UserRecord::new("1", "Ada"),
            UserRecord::new("1", "Ada Lovelace"),
        ]));

        assert_eq!(view.keyed_items(), vec![("1", "Ada"), ("1", "Ada Lovelace")]);
        assert_eq!(view.plain_lines().len(), 3);
        assert_eq!(render_to_string(&view).matches('•').count(), 2);
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut view = UserListView::new("Users", FieldSet::Basic);
        view.apply(QueryResult::Failed("Network error".to_string()));

        assert!(!view.apply(QueryResult::Pending));
        assert!(!view.apply(QueryResult::Succeeded(ada_and_grace())));
        assert_eq!(view.result(), &QueryResult::Failed("Network error".to_string()));

        let mut view = UserListView::new("Users", FieldSet::Basic);
        view.apply(QueryResult::Succeeded(ada_and_grace()));
        assert!(!view.apply(QueryResult::Pending));
        assert_eq!(view.users().len(), 2);
    }

    #[test]
    fn test_pending_on_pending_is_no_change() {
        let mut view = UserListView::new("Users", FieldSet::Basic);
        assert!(!view.apply(QueryResult::Pending));
    }

    #[test]
    fn test_full_fields_show_details() {
        let mut user = UserRecord::new("1", "Leanne Graham");
        user.email = Some("Sincere@april.biz".to_string());
        user.website = Some("hildegard.org".to_string());

        let mut view = UserListView::new("Users", FieldSet::Full);
        view.apply(QueryResult::Succeeded(vec![user.clone()]));
        assert_eq!(
            view.plain_lines()[1],
            "1\tLeanne Graham\tSincere@april.biz | hildegard.org"
        );
        assert!(render_to_string(&view).contains("Sincere@april.biz | hildegard.org"));

        let mut basic = UserListView::new("Users", FieldSet::Basic);
        basic.apply(QueryResult::Succeeded(vec![user]));
        assert_eq!(basic.plain_lines()[1], "1\tLeanne Graham");
    }

    #[test]
    fn test_scroll() {
        let mut view = UserListView::new("Users", FieldSet::Basic);
        view.scroll_down();
        assert!(view.selected_user().is_none());

        view.apply(QueryResult::Succeeded(ada_and_grace()));
        assert_eq!(view.selected_user().unwrap().name, "Ada");
        view.scroll_down();
        assert_eq!(view.selected_user().unwrap().name, "Grace");
        // Should not go past the end
        view.scroll_down();
        assert_eq!(view.selected_user().unwrap().name, "Grace");
        view.scroll_up();
        view.scroll_up();
        assert_eq!(view.selected_user().unwrap().name, "Ada");
    }
}
