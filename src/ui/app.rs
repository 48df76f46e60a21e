use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ansi_to_tui::IntoText;
use chrono::Utc;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::backend::ScriptedBackend;
use crate::config::Config;
use crate::ui::clipboard::{ClipboardSink, TerminalClipboard};
use crate::ui::components::{ChatView, RandomVerbs};
use crate::ui::effect::Effect;
use crate::ui::events::{AppEvent, PanelEvent};
use crate::ui::terminal_guard::TerminalGuard;

/// Prompt submitted on Enter
const DEMO_PROMPT: &str = "Show me how to count the words in a file.";

/// Pause before the first reply chunk, so the waiting line is visible
const THINKING_PAUSE: Duration = Duration::from_millis(1500);

/// Simulated sandbox boot before the first reply
const CONTAINER_BOOT: Duration = Duration::from_millis(2500);

/// Lines scrolled per mouse wheel notch
const WHEEL_LINES: usize = 3;

const KEY_HINTS: &str = "Enter ask · drag / double / triple click select · y copy · Esc clear · q quit";

/// Main application state
pub struct App {
    /// Application configuration
    config: Config,
    chat_view: ChatView,
    /// Markdown reply streamed by the backend
    script: String,
    clipboard: Arc<dyn ClipboardSink>,
    /// Whether the app should quit
    should_quit: bool,
    /// A reply is in flight
    replying: bool,
    /// The container has booted once
    container_ready: bool,
    /// Panel rect from the last draw; mouse events are made relative to it
    panel_area: Rect,
    /// Event channel sender
    event_tx: mpsc::UnboundedSender<AppEvent>,
    /// Event channel receiver
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(config: Config, script: String) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let chat_view = ChatView::new(config.panel_config(), Box::new(RandomVerbs));

        Self {
            config,
            chat_view,
            script,
            clipboard: Arc::new(TerminalClipboard),
            should_quit: false,
            replying: false,
            container_ready: false,
            panel_area: Rect::default(),
            event_tx,
            event_rx,
        }
    }

    /// Replace the clipboard sink
    pub fn with_clipboard(mut self, clipboard: Arc<dyn ClipboardSink>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn chat_view(&self) -> &ChatView {
        &self.chat_view
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut guard = TerminalGuard::enter()?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal).await;

        guard.cleanup()?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            tokio::select! {
                // Terminal input, polled once per frame
                _ = tokio::time::sleep(Duration::from_millis(16)) => {
                    while event::poll(Duration::ZERO)? {
                        let input = event::read()?;
                        self.handle_app_event(AppEvent::Input(input));
                    }
                }

                Some(event) = self.event_rx.recv() => {
                    self.handle_app_event(event);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Apply one application event
    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(Event::Key(key)) => self.handle_key_event(key),
            AppEvent::Input(Event::Mouse(mouse)) => self.handle_mouse_event(mouse),
            AppEvent::Input(_) => {}
            AppEvent::Backend(event) => self.dispatch(event.into()),
            AppEvent::BackendEnded => {
                self.replying = false;
            }
            AppEvent::Tick(tick) => self.dispatch(PanelEvent::Tick(tick)),
            AppEvent::ClipboardFailed(reason) => {
                self.dispatch(PanelEvent::ClipboardFailed(reason));
            }
            AppEvent::ContainerReady => {
                self.container_ready = true;
                let effects = self
                    .chat_view
                    .set_container_initializing(false, None, Utc::now());
                self.execute(effects);
                self.start_reply();
            }
            AppEvent::Quit => {
                self.should_quit = true;
            }
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            // Plain q and Ctrl+Q both quit
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Enter => self.ask(),
            _ => self.dispatch(PanelEvent::Key(key)),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        let area = self.panel_area;
        let inside = mouse.column >= area.x
            && mouse.row >= area.y
            && mouse.column < area.x.saturating_add(area.width)
            && mouse.row < area.y.saturating_add(area.height);
        let x = mouse.column.saturating_sub(area.x);
        let y = mouse.row.saturating_sub(area.y);

        let event = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if inside => PanelEvent::MouseDown {
                x,
                y,
                at: Instant::now(),
            },
            MouseEventKind::Drag(MouseButton::Left) => PanelEvent::MouseDrag { x, y },
            MouseEventKind::Up(MouseButton::Left) => PanelEvent::MouseUp { x, y },
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown if inside => {
                let code = if mouse.kind == MouseEventKind::ScrollUp {
                    KeyCode::Up
                } else {
                    KeyCode::Down
                };
                for _ in 0..WHEEL_LINES {
                    self.dispatch(PanelEvent::Key(KeyEvent::from(code)));
                }
                return;
            }
            _ => return,
        };
        self.dispatch(event);
    }

    /// Hand an event to the panel and carry out what it asks for
    fn dispatch(&mut self, event: PanelEvent) {
        let effects = self.chat_view.handle(event, Utc::now());
        self.execute(effects);
    }

    fn execute(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ScheduleTick { tick, after } => {
                    let tx = self.event_tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        // Receiver only closes on shutdown
                        let _ = tx.send(AppEvent::Tick(tick));
                    });
                }
                Effect::CopyToClipboard(text) => {
                    tracing::debug!(chars = text.chars().count(), "Copying to clipboard");
                    self.clipboard.set_system_clipboard(&text);

                    let clipboard = Arc::clone(&self.clipboard);
                    let tx = self.event_tx.clone();
                    tokio::task::spawn_blocking(move || {
                        if let Err(e) = clipboard.write_native_clipboard(&text) {
                            tracing::warn!(error = %e, "Native clipboard write failed");
                            let _ = tx.send(AppEvent::ClipboardFailed(e.to_string()));
                        }
                    });
                }
            }
        }
    }

    /// Enter: boot the container on first use, then stream the script
    fn ask(&mut self) {
        if self.replying {
            return;
        }
        self.replying = true;

        if self.container_ready {
            self.start_reply();
            return;
        }

        let effects = self
            .chat_view
            .set_container_initializing(true, None, Utc::now());
        self.execute(effects);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(CONTAINER_BOOT).await;
            let _ = tx.send(AppEvent::ContainerReady);
        });
    }

    fn start_reply(&mut self) {
        let effects = self.chat_view.submit(DEMO_PROMPT, Utc::now());
        self.execute(effects);

        let backend = ScriptedBackend::from_reply(&self.script, self.config.chunk_delay());
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(THINKING_PAUSE).await;
            let mut rx = backend.start();
            while let Some(event) = rx.recv().await {
                if tx.send(AppEvent::Backend(event)).is_err() {
                    return;
                }
            }
            let _ = tx.send(AppEvent::BackendEnded);
        });
    }

    /// Handle every event already queued on the channel without waiting
    pub fn process_pending(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_app_event(event);
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw one frame, resizing the panel when the screen changed
    pub fn draw(&mut self, f: &mut Frame) {
        let [panel, _] = panel_layout(f.area());
        if panel != self.panel_area {
            self.panel_area = panel;
            self.chat_view.set_size(panel.width, panel.height, Utc::now());
        }
        let area = f.area();
        draw_panel(f, area, &self.chat_view);
    }
}

/// Split the screen into the bordered panel and a one-line footer
pub fn panel_layout(area: Rect) -> [Rect; 2] {
    Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area)
}

/// Draw the chat panel and footer into `area`
pub fn draw_panel(f: &mut Frame, area: Rect, chat_view: &ChatView) {
    let [panel, footer] = panel_layout(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" chatpane ");
    let inner = block.inner(panel);
    f.render_widget(block, panel);

    let text = chat_view.view().into_text().unwrap_or_default();
    f.render_widget(Paragraph::new(text), inner);

    let footer_line = match chat_view.notice(Utc::now()) {
        Some(notice) => Line::styled(notice.to_string(), Style::default().fg(Color::Yellow)),
        None => Line::styled(KEY_HINTS, Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(Paragraph::new(footer_line), footer);
}
