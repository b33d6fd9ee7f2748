use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gamezone_core::{
    CatalogController, CatalogError, CatalogRemote, Completed, ConfirmedDelete, DialogState,
    EmptyState, FailedAction, Game, GameId, LoadOutcome, Outcome, PendingCreate, Retry, Tab,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use tokio::{spawn, sync::mpsc};
use tracing::{debug, error, info};

use crate::form::{Field, GameForm};

const TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    accent_alt: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    warning: Color,
    danger: Color,
    favorite: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Magenta,
            accent_alt: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
            favorite: Color::LightRed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Info,
    Warning,
    Error,
}

enum AppEvent {
    Input(Event),
    Tick,
    Reloaded(LoadOutcome),
    Created(Result<Completed, CatalogError>),
    Deleted(GameId, Result<Completed, CatalogError>),
}

/// Terminal frontend over a [`CatalogController`].
pub struct CatalogApp<R> {
    controller: CatalogController<R>,
    state: UiState,
    form: Option<GameForm>,
    trailer: Option<Game>,
    event_tx: Option<mpsc::Sender<AppEvent>>,
    theme: Theme,
}

impl<R> CatalogApp<R>
where
    R: CatalogRemote + Clone + 'static,
{
    pub fn new(remote: R) -> Self {
        Self {
            controller: CatalogController::new(remote),
            state: UiState::default(),
            form: None,
            trailer: None,
            event_tx: None,
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());
        self.event_tx = Some(event_tx);

        self.spawn_reload();
        self.state
            .set_status("Loading catalog…".to_string(), Tone::Info);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }

            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) {
                break;
            }

            if self.state.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        self.event_tx = None;
        Ok(())
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Err(err) = self.handle_input(event) {
                    self.state.set_status(format!("Error: {err}"), Tone::Error);
                }
                true
            }
            Some(AppEvent::Tick) => true,
            Some(AppEvent::Reloaded(outcome)) => {
                if matches!(outcome, LoadOutcome::Stale) {
                    debug!("Ignoring superseded reload");
                    return true;
                }
                let outcome = self.controller.finish_reload(outcome);
                self.report(&outcome);
                self.state.clamp_cursor(self.controller.visible().len());
                true
            }
            Some(AppEvent::Created(result)) => {
                let outcome = self.controller.finish_submit(result);
                if self.controller.dialog() == DialogState::Closed {
                    self.form = None;
                }
                self.report(&outcome);
                self.state.clamp_cursor(self.controller.visible().len());
                true
            }
            Some(AppEvent::Deleted(id, result)) => {
                let outcome = self.controller.finish_delete(id, result);
                self.report(&outcome);
                self.state.clamp_cursor(self.controller.visible().len());
                true
            }
            None => false,
        }
    }

    fn report(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Success { message } => {
                info!(%message, "Command succeeded");
                self.state.set_status(message.clone(), Tone::Info);
            }
            Outcome::Recoverable { message } => {
                // The form owns the keyboard while the dialog is up.
                let dialog_open = self.controller.dialog() != DialogState::Closed;
                let hint = match self.controller.last_failed() {
                    Some(FailedAction::Create) if dialog_open => " (Enter to resubmit)",
                    Some(_) if !dialog_open => " (R to retry)",
                    _ => "",
                };
                self.state
                    .set_status(format!("{message}{hint}"), Tone::Warning);
            }
            Outcome::Fatal { message } => {
                error!(%message, "Command failed");
                self.state.set_status(message.clone(), Tone::Error);
            }
        }
    }

    fn spawn_reload(&mut self) {
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        let ticket = self.controller.store().begin_load();
        let gateway = self.controller.gateway().clone();
        spawn(async move {
            let result = gateway.remote().list().await;
            let outcome = gateway.store().complete_load(ticket, result);
            let _ = tx.send(AppEvent::Reloaded(outcome)).await;
        });
    }

    fn spawn_create(&mut self, pending: PendingCreate) {
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        let gateway = self.controller.gateway().clone();
        self.state
            .set_status(format!("Saving {}…", pending.draft().title.trim()), Tone::Info);
        spawn(async move {
            let result = gateway.create(pending.draft()).await;
            let _ = tx.send(AppEvent::Created(result)).await;
        });
    }

    fn spawn_delete(&mut self, confirmed: ConfirmedDelete) {
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        let gateway = self.controller.gateway().clone();
        self.state
            .set_status(format!("Deleting game #{}…", confirmed.id()), Tone::Info);
        spawn(async move {
            let result = gateway.delete(confirmed).await;
            let _ = tx.send(AppEvent::Deleted(confirmed.id(), result)).await;
        });
    }

    fn retry(&mut self) {
        match self.controller.take_retry() {
            Some(Retry::Reload) => {
                self.spawn_reload();
                self.state
                    .set_status("Retrying reload…".to_string(), Tone::Info);
            }
            Some(Retry::Create(pending)) => self.spawn_create(pending),
            Some(Retry::Delete(confirmed)) => self.spawn_delete(confirmed),
            None => self
                .state
                .set_status("Nothing to retry".to_string(), Tone::Info),
        }
    }

    fn current_game(&self) -> Option<Game> {
        self.controller.visible().into_iter().nth(self.state.cursor)
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        if self.controller.dialog() != DialogState::Closed {
            return self.handle_form_key(key);
        }
        if self.controller.pending_delete().is_some() {
            return self.handle_confirm_key(key);
        }
        if self.trailer.is_some() {
            return self.handle_trailer_key(key);
        }
        match self.state.mode {
            Mode::Search => self.handle_search_key(key),
            Mode::Browse => self.handle_browse_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.state.mode = Mode::Browse;
                self.controller.set_query("");
                self.state.reset_cursor();
                self.state
                    .set_status("Search cleared".to_string(), Tone::Info);
            }
            KeyCode::Enter => {
                self.state.mode = Mode::Browse;
                self.state.set_status(
                    format!("Search applied: {}", self.controller.query()),
                    Tone::Info,
                );
            }
            KeyCode::Backspace => {
                let mut query = self.controller.query().to_string();
                query.pop();
                self.controller.set_query(query);
                self.state.reset_cursor();
            }
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    let mut query = self.controller.query().to_string();
                    query.push(c);
                    self.controller.set_query(query);
                    self.state.reset_cursor();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Result<()> {
        let total = self.controller.visible().len();
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.state.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.should_quit = true
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.move_cursor(1, total),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_cursor(-1, total),
            KeyCode::Char('g') if key.modifiers.is_empty() => self.state.move_to(0, total),
            KeyCode::Char('G') => self.state.move_to(total.saturating_sub(1), total),
            KeyCode::Home => self.state.move_to(0, total),
            KeyCode::End => self.state.move_to(total.saturating_sub(1), total),
            KeyCode::PageDown => self.state.move_cursor(self.state.page() as isize, total),
            KeyCode::PageUp => self.state.move_cursor(-(self.state.page() as isize), total),
            KeyCode::Char('/') => {
                self.state.mode = Mode::Search;
                self.state
                    .set_status("Type to search titles and genres".to_string(), Tone::Info);
            }
            KeyCode::Tab => self.select_tab(self.controller.tab().next()),
            KeyCode::Char(digit @ '1'..='3') => {
                let index = digit as usize - '1' as usize;
                self.select_tab(Tab::ALL[index]);
            }
            KeyCode::Char('f') if key.modifiers.is_empty() => {
                if let Some(game) = self.current_game() {
                    let now_favorite = self.controller.toggle_favorite(game.id);
                    let message = if now_favorite {
                        format!("Added {} to favorites", game.title)
                    } else {
                        format!("Removed {} from favorites", game.title)
                    };
                    self.state.set_status(message, Tone::Info);
                    self.state.clamp_cursor(self.controller.visible().len());
                }
            }
            KeyCode::Char('t') | KeyCode::Enter => {
                if let Some(game) = self.current_game() {
                    if game.has_trailer() {
                        self.trailer = Some(game);
                    } else {
                        self.state
                            .set_status(format!("No trailer for {}", game.title), Tone::Warning);
                    }
                }
            }
            KeyCode::Char('a') if key.modifiers.is_empty() => {
                self.controller.open_dialog();
                self.form = Some(GameForm::from_draft(self.controller.draft()));
                self.state
                    .set_status("Add a new game".to_string(), Tone::Info);
            }
            KeyCode::Char('d') if key.modifiers.is_empty() => {
                if let Some(game) = self.current_game() {
                    self.controller.request_delete(game.id);
                }
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.spawn_reload();
                self.state
                    .set_status("Reloading catalog…".to_string(), Tone::Info);
            }
            KeyCode::Char('R') => self.retry(),
            _ => {}
        }
        Ok(())
    }

    fn select_tab(&mut self, tab: Tab) {
        self.controller.set_tab(tab);
        self.state.reset_cursor();
        self.state.set_status(format!("Showing {tab}"), Tone::Info);
    }

    fn handle_trailer_key(&mut self, key: KeyEvent) -> Result<()> {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('t')
        ) {
            self.trailer = None;
        }
        Ok(())
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(confirmed) = self.controller.confirm_delete() {
                    self.spawn_delete(confirmed);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.controller.cancel_delete();
                self.state
                    .set_status("Delete cancelled".to_string(), Tone::Info);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.controller.dialog() == DialogState::Submitting {
            return Ok(());
        }
        let Some(form) = self.form.as_mut() else {
            self.controller.cancel_dialog();
            return Ok(());
        };

        match key.code {
            KeyCode::Esc => {
                self.controller.cancel_dialog();
                self.form = None;
                self.state
                    .set_status("New game cancelled".to_string(), Tone::Info);
            }
            KeyCode::Enter => {
                let mut applied = Ok(());
                self.controller
                    .update_draft(|draft| applied = form.apply_to(draft));
                if let Err(message) = applied {
                    self.state.set_status(message, Tone::Warning);
                    return Ok(());
                }
                match self.controller.begin_submit() {
                    Ok(pending) => self.spawn_create(pending),
                    Err(outcome) => self.report(&outcome),
                }
            }
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Left => form.focused_mut().move_cursor(-1),
            KeyCode::Right => form.focused_mut().move_cursor(1),
            KeyCode::Home => form.focused_mut().move_home(),
            KeyCode::End => form.focused_mut().move_end(),
            KeyCode::Backspace => form.focused_mut().backspace(),
            KeyCode::Delete => form.focused_mut().delete(),
            KeyCode::Char(ch) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    form.focused_mut().insert(ch);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(size);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);

        let visible = self.controller.visible();
        self.state.clamp_cursor(visible.len());

        self.render_tabs(frame, chunks[0]);
        self.render_game_list(frame, body[0], &visible);
        self.render_game_info(frame, body[1], visible.get(self.state.cursor));
        self.render_status(frame, chunks[2]);

        if let Some(game) = &self.trailer {
            self.render_trailer(frame, game);
        }
        if let Some(id) = self.controller.pending_delete() {
            self.render_confirm_delete(frame, id);
        }
        if let Some(form) = &self.form {
            if self.controller.dialog() != DialogState::Closed {
                self.render_form(frame, form);
            }
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(idx, tab)| {
                let label = match tab {
                    Tab::Favorites => {
                        format!("{} {} ({})", idx + 1, tab, self.controller.favorites().len())
                    }
                    _ => format!("{} {}", idx + 1, tab),
                };
                Line::from(label)
            })
            .collect();
        let tabs = Tabs::new(titles)
            .block(
                Block::default().borders(Borders::ALL).title(Span::styled(
                    " GAME ZONE ",
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                )),
            )
            .select(self.controller.tab().index())
            .style(Style::default().fg(self.theme.muted))
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent_alt)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn render_game_list(&mut self, frame: &mut Frame, area: Rect, games: &[Game]) {
        self.state.list_height = area.height.saturating_sub(2) as usize;
        self.state.ensure_cursor_visible(games.len());

        let title = if self.controller.query().is_empty() {
            "Games".to_string()
        } else {
            format!("Games matching \"{}\"", self.controller.query())
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        if games.is_empty() {
            let (headline, hint) = empty_message(
                self.controller.empty_state(),
                self.controller.query(),
                self.controller.is_loading(),
            );
            let paragraph = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    headline,
                    Style::default()
                        .fg(self.theme.muted)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(hint, Style::default().fg(self.theme.muted))),
            ])
            .alignment(Alignment::Center)
            .block(block)
            .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }

        let height = self.state.list_height;
        let end = (self.state.offset + height).min(games.len());
        let window = &games[self.state.offset..end];

        let mut list_state = ListState::default();
        list_state.select(Some(self.state.cursor.saturating_sub(self.state.offset)));

        let items: Vec<ListItem> = window
            .iter()
            .enumerate()
            .map(|(idx, game)| {
                let is_selected = self.state.offset + idx == self.state.cursor;
                let marker = if is_selected {
                    Span::styled(
                        "▶ ",
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw("  ")
                };
                let heart = if self.controller.is_favorite(game.id) {
                    Span::styled("♥ ", Style::default().fg(self.theme.favorite))
                } else {
                    Span::raw("  ")
                };
                let title = Span::styled(
                    game.title.clone(),
                    Style::default()
                        .fg(self.theme.primary_fg)
                        .add_modifier(Modifier::BOLD),
                );
                let genre = Span::styled(
                    format!(" · {}", game.genre),
                    Style::default().fg(self.theme.muted),
                );
                ListItem::new(Line::from(vec![marker, heart, title, genre]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_game_info(&self, frame: &mut Frame, area: Rect, game: Option<&Game>) {
        let block = Block::default().borders(Borders::ALL).title("Game Details");
        let Some(game) = game else {
            frame.render_widget(Paragraph::new("No game selected").block(block), area);
            return;
        };

        let mut lines = vec![
            Line::from(Span::styled(
                game.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("★ ", Style::default().fg(self.theme.warning)),
                Span::styled(
                    format!("{:.1}/10", game.rating),
                    Style::default()
                        .fg(self.theme.warning)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("   {}", game.release_date),
                    Style::default().fg(self.theme.muted),
                ),
            ]),
            Line::from(format!("Genre: {}", game.genre)),
            Line::from(""),
            Line::from(game.description.clone()),
            Line::from(""),
        ];
        if game.image.starts_with("data:") {
            lines.push(Line::from("Image: embedded upload"));
        } else if !game.image.is_empty() {
            lines.push(Line::from(format!("Image: {}", game.image)));
        }
        if let Some(url) = game.trailer_url() {
            lines.push(Line::from(format!("Trailer: {url}")));
        }
        if self.controller.is_favorite(game.id) {
            lines.push(Line::from(Span::styled(
                "♥ In favorites",
                Style::default().fg(self.theme.favorite),
            )));
        }

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let primary = if self.state.mode == Mode::Search {
            Line::from(vec![
                Span::styled("/", Style::default().fg(self.theme.accent)),
                Span::raw(self.controller.query().to_string()),
            ])
        } else {
            let color = match self.state.tone {
                Tone::Info => self.theme.success,
                Tone::Warning => self.theme.warning,
                Tone::Error => self.theme.danger,
            };
            Line::from(Span::styled(
                self.state.status.clone(),
                Style::default().fg(color),
            ))
        };
        let loading = if self.controller.is_loading() {
            "Loading…  "
        } else {
            ""
        };
        let secondary = Line::from(Span::styled(
            format!(
                "{loading}{} games  / search  Tab tabs  f favorite  t trailer  a add  d delete  ^R reload  R retry  q quit",
                self.controller.games().len()
            ),
            Style::default().fg(self.theme.muted),
        ));
        let paragraph = Paragraph::new(vec![primary, secondary])
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_trailer(&self, frame: &mut Frame, game: &Game) {
        let area = centered_rect(72, 14, frame.size());
        frame.render_widget(Clear, area);
        let lines = vec![
            Line::from(vec![
                Span::styled("▶ ", Style::default().fg(self.theme.accent)),
                Span::styled(
                    game.trailer_url().unwrap_or_default().to_string(),
                    Style::default()
                        .fg(self.theme.accent_alt)
                        .add_modifier(Modifier::UNDERLINED),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Description",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(game.description.clone()),
            Line::from(""),
            Line::from(format!("Genre: {}    Rating: {}/10", game.genre, game.rating)),
            Line::from(""),
            Line::from(Span::styled("Esc close", Style::default().fg(self.theme.muted))),
        ];
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Trailer - {}", game.title)),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_confirm_delete(&self, frame: &mut Frame, id: GameId) {
        let title = self
            .controller
            .store()
            .get(id)
            .map(|game| game.title)
            .unwrap_or_else(|| format!("game #{id}"));
        let area = centered_rect(50, 6, frame.size());
        frame.render_widget(Clear, area);
        let paragraph = Paragraph::new(vec![
            Line::from(format!("Delete {title}?")),
            Line::from(""),
            Line::from(vec![
                Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" delete  "),
                Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" keep"),
            ]),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm delete")
                .border_style(Style::default().fg(self.theme.danger)),
        );
        frame.render_widget(paragraph, area);
    }

    fn render_form(&self, frame: &mut Frame, form: &GameForm) {
        let height = Field::ORDER.len() as u16 + 5;
        let area = centered_rect(70, height, frame.size());
        frame.render_widget(Clear, area);

        let submitting = self.controller.dialog() == DialogState::Submitting;
        let mut lines: Vec<Line> = Field::ORDER
            .iter()
            .map(|field| {
                let focused = *field == form.focus();
                let label_style = if focused {
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.muted)
                };
                Line::from(vec![
                    Span::styled(format!("{:>14}: ", field.label()), label_style),
                    Span::raw(form.input(*field).value().to_string()),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(if submitting {
            Line::from(Span::styled(
                "Submitting…",
                Style::default().fg(self.theme.warning),
            ))
        } else {
            Line::from(vec![
                Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" save  "),
                Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" next field  "),
                Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" cancel"),
            ])
        });

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Add game")
                .border_style(Style::default().fg(self.theme.accent)),
        );
        frame.render_widget(paragraph, area);

        if !submitting {
            let row = Field::ORDER
                .iter()
                .position(|field| *field == form.focus())
                .unwrap_or(0) as u16;
            let cursor = form.input(form.focus()).cursor() as u16;
            let cursor_x = (area.x + 1 + 16 + cursor).min(area.x + area.width.saturating_sub(2));
            frame.set_cursor(cursor_x, area.y + 1 + row);
        }
    }
}

fn empty_message(
    state: Option<EmptyState>,
    query: &str,
    loading: bool,
) -> (String, &'static str) {
    match state {
        _ if loading => ("Loading catalog…".to_string(), ""),
        Some(EmptyState::NoFavorites) => (
            "No favorite games yet".to_string(),
            "Press f on a game to add it to favorites",
        ),
        Some(EmptyState::NoMatches) => (
            format!("Nothing matches \"{query}\""),
            "Press / to change the search",
        ),
        Some(EmptyState::NoGames) | None => (
            "The catalog is empty".to_string(),
            "Press a to add a game or Ctrl-R to reload",
        ),
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

struct UiState {
    cursor: usize,
    offset: usize,
    list_height: usize,
    status: String,
    tone: Tone,
    mode: Mode,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            cursor: 0,
            offset: 0,
            list_height: 1,
            status: "Ready".to_string(),
            tone: Tone::Info,
            mode: Mode::Browse,
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: String, tone: Tone) {
        self.status = message;
        self.tone = tone;
    }

    fn page(&self) -> usize {
        self.list_height.max(1)
    }

    fn reset_cursor(&mut self) {
        self.cursor = 0;
        self.offset = 0;
    }

    fn move_cursor(&mut self, delta: isize, total: usize) {
        if total == 0 {
            return;
        }
        let idx = (self.cursor as isize + delta).clamp(0, total as isize - 1);
        self.cursor = idx as usize;
        self.ensure_cursor_visible(total);
    }

    fn move_to(&mut self, index: usize, total: usize) {
        if total == 0 {
            return;
        }
        self.cursor = index.min(total - 1);
        self.ensure_cursor_visible(total);
    }

    fn clamp_cursor(&mut self, total: usize) {
        if total == 0 {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= total {
            self.cursor = total - 1;
        }
    }

    fn ensure_cursor_visible(&mut self, total: usize) {
        if total == 0 || self.list_height == 0 {
            self.offset = 0;
            return;
        }
        let height = self.list_height;
        let max_offset = total.saturating_sub(height);

        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }

        if self.offset > max_offset {
            self.offset = max_offset;
        }
    }
}
