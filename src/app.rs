use crate::config::Config;
use crate::lifecycle::{MountId, Mounts};
use crate::query::QueryResult;
use crate::ui;
use crate::ui::widgets::UserListView;
use crate::users::{FieldSet, UserSource, UsersMessage};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const TICK_RATE: Duration = Duration::from_millis(100);

pub struct App {
    title: String,
    fields: FieldSet,
    source: Arc<dyn UserSource>,
    mounts: Mounts,
    view: Option<UserListView>,
    tx: mpsc::UnboundedSender<UsersMessage>,
    rx: mpsc::UnboundedReceiver<UsersMessage>,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(title: impl Into<String>, fields: FieldSet, source: Arc<dyn UserSource>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            title: title.into(),
            fields,
            source,
            mounts: Mounts::new(),
            view: None,
            tx,
            rx,
            status: None,
            should_quit: false,
        }
    }

    pub fn from_config(config: &Config, source: Arc<dyn UserSource>) -> Self {
        Self::new(config.title.clone(), config.fields, source)
    }

    pub fn view(&self) -> Option<&UserListView> {
        self.view.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Mount a fresh view and start its query. Replaces any mounted view.
    pub fn mount(&mut self) -> MountId {
        let mount = self.mounts.mount();
        self.view = Some(UserListView::new(self.title.clone(), self.fields));
        self.spawn_query(mount);
        mount
    }

    pub fn unmount(&mut self) {
        self.mounts.unmount();
        self.view = None;
    }

    fn spawn_query(&self, mount: MountId) {
        let mut snapshots = Arc::clone(&self.source).users();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            while let Some(result) = snapshots.next().await {
                if tx.send(UsersMessage { mount, result }).is_err() {
                    break;
                }
            }
        });
    }

    /// Route a snapshot to its view. Returns whether a redraw is needed.
    pub fn handle_message(&mut self, message: UsersMessage) -> bool {
        if !self.mounts.is_live(message.mount) {
            tracing::debug!(mount = %message.mount, "dropping result for unmounted view");
            return false;
        }

        let Some(view) = self.view.as_mut() else {
            return false;
        };

        if let QueryResult::Failed(error) = &message.result {
            tracing::warn!(%error, "users query failed");
        }
        view.apply(message.result)
    }

    /// Returns whether a redraw is needed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                false
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                false
            }
            KeyCode::Char('r') => {
                self.status = None;
                self.mount();
                true
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(view) = self.view.as_mut() {
                    view.scroll_up();
                }
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(view) = self.view.as_mut() {
                    view.scroll_down();
                }
                true
            }
            KeyCode::Char('o') => {
                self.open_selected_website();
                true
            }
            _ => false,
        }
    }

    fn open_selected_website(&mut self) {
        let Some(website) = self
            .view
            .as_ref()
            .and_then(|view| view.selected_user())
            .and_then(|user| user.website.clone())
        else {
            self.status = Some("No website for selected user".to_string());
            return;
        };

        let url = website_url(&website);
        self.status = match open::that(&url) {
            Ok(()) => Some(format!("Opened {}", url)),
            Err(e) => {
                tracing::warn!(%url, error = %e, "failed to open website");
                Some(format!("Could not open {}: {}", url, e))
            }
        };
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.mount();
        let mut dirty = true;

        while !self.should_quit {
            if dirty {
                terminal.draw(|frame| {
                    ui::draw(frame, self.view.as_ref(), self.status.as_deref())
                })?;
                dirty = false;
            }

            while let Ok(message) = self.rx.try_recv() {
                dirty |= self.handle_message(message);
            }

            if event::poll(TICK_RATE)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        dirty |= self.handle_key(key);
                    }
                    Event::Resize(_, _) => dirty = true,
                    _ => {}
                }
            }
        }

        self.unmount();
        Ok(())
    }
}

/// Run one query to completion without a terminal and return the settled view.
pub async fn run_once(
    source: Arc<dyn UserSource>,
    title: impl Into<String>,
    fields: FieldSet,
) -> UserListView {
    let mut view = UserListView::new(title, fields);
    let mut snapshots = source.users();
    while let Some(result) = snapshots.next().await {
        view.apply(result);
    }
    view
}

fn website_url(website: &str) -> String {
    if website.starts_with("http://") || website.starts_with("https://") {
        website.to_string()
    } else {
        format!("https://{}", website)
    }
}
