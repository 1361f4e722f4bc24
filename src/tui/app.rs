//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Wallet connect/disconnect
//! - Action chains via background workers

use std::io;
use std::sync::mpsc::TryRecvError;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::tfhe::{ephemeral_gateway_key, load_gateway_key};
use crate::adapters::{Devnet, LocalWallet, TfheClient};
use crate::application::{Action, Completion, Job, Session, SubscriptionService};
use crate::config::AppConfig;
use crate::ports::{ContractProvider, FheClient, WalletSession};

use super::ui::{
    browse::{render_browse, BrowseState},
    connect::render_connect,
    create::{render_create, CreateFormState},
    detail::render_detail,
    faq::render_faq,
    render_header, render_toast,
};
use super::worker::{ActionProgress, ActionWorker, ActionWorkerHandle};

/// Current screen/view in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Connect,
    Browse,
    Detail(String),
    Create,
    /// FAQ, remembering where to go back to
    Faq(Box<Screen>),
}

impl Screen {
    fn title(&self) -> &'static str {
        match self {
            Self::Connect => "Connect",
            Self::Browse => "Subscription Boxes",
            Self::Detail(_) => "Box Details",
            Self::Create => "New Confidential Box",
            Self::Faq(_) => "FAQ",
        }
    }
}

/// Main application state
pub struct App<P = Devnet, F = TfheClient<Devnet>>
where
    P: ContractProvider + 'static,
    F: FheClient + 'static,
{
    screen: Screen,
    should_quit: bool,
    auto_connect: bool,

    service: Arc<SubscriptionService<P, F>>,
    wallet: LocalWallet,
    session: Session,

    browse_state: BrowseState,
    form_state: CreateFormState,

    /// Running action chains
    workers: Vec<ActionWorkerHandle>,
}

impl App {
    /// Build the local devnet, FHE client and wallet from `config`.
    ///
    /// # Errors
    /// Returns error if a configured gateway seed cannot be loaded.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let gateway_key = match &config.gateway_seed_file {
            Some(path) => load_gateway_key(path)
                .map_err(|e| anyhow!("Failed to load gateway seed from {:?}: {}", path, e))?,
            None => {
                tracing::warn!("No gateway seed configured; using an ephemeral gateway key");
                ephemeral_gateway_key()
            }
        };

        let devnet = Arc::new(Devnet::new(
            config.contract_address,
            gateway_key.verifying_key(),
        ));
        let fhe = Arc::new(TfheClient::new(devnet.clone(), gateway_key));
        tracing::info!("Contract deployed at {}", devnet.address());

        let service = Arc::new(SubscriptionService::new(devnet, fhe));
        Ok(Self::with_dependencies(
            service,
            LocalWallet::new(config.account),
            config.auto_connect,
        ))
    }
}

impl<P, F> App<P, F>
where
    P: ContractProvider + 'static,
    F: FheClient + 'static,
{
    /// Create application with injected dependencies.
    pub fn with_dependencies(
        service: Arc<SubscriptionService<P, F>>,
        wallet: LocalWallet,
        auto_connect: bool,
    ) -> Self {
        Self {
            screen: Screen::Connect,
            should_quit: false,
            auto_connect,
            service,
            wallet,
            session: Session::new(),
            browse_state: BrowseState::default(),
            form_state: CreateFormState::default(),
            workers: Vec::new(),
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        if self.auto_connect {
            self.connect();
        }

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_workers();
            self.session.tick(Instant::now());

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(2), // Header
                        Constraint::Min(0),    // Screen
                        Constraint::Length(2), // Toast
                    ])
                    .split(f.area());

                render_header(f, chunks[0], &self.session, self.screen.title());

                let content = chunks[1];
                match &self.screen {
                    Screen::Connect => {
                        render_connect(f, content, &self.wallet_hint());
                    }
                    Screen::Browse => {
                        render_browse(f, content, &self.session, &self.browse_state);
                    }
                    Screen::Detail(id) => render_detail(f, content, &self.session, id),
                    Screen::Create => render_create(
                        f,
                        content,
                        &self.session.draft,
                        &self.form_state,
                        self.session.is_creating(),
                    ),
                    Screen::Faq(_) => render_faq(f, content),
                }

                render_toast(f, chunks[2], self.session.toast());
            })?;

            // Short poll to stay responsive
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn wallet_hint(&self) -> String {
        self.wallet.address().to_string()
    }

    fn spawn(&mut self, job: Option<Job>) {
        if let Some(job) = job {
            self.workers
                .push(ActionWorker::spawn(self.service.clone(), job));
        }
    }

    /// Apply every message the workers have sent so far.
    fn poll_workers(&mut self) {
        let now = Instant::now();
        let mut messages = Vec::new();

        self.workers.retain(|worker| loop {
            match worker.progress_rx.try_recv() {
                Ok(ActionProgress::Finished(result)) => {
                    messages.push(ActionProgress::Finished(result));
                    break false;
                }
                Ok(progress) => messages.push(progress),
                Err(TryRecvError::Empty) => break true,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("Action worker exited without a result");
                    break false;
                }
            }
        });

        for message in messages {
            match message {
                ActionProgress::Stage(stage) => self.session.progress(stage),
                ActionProgress::Finished(result) => {
                    let completion = self.session.complete(result, now);
                    self.on_completion(completion);
                }
            }
        }

        self.browse_state.clamp(self.session.visible_boxes().len());
    }

    fn on_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Created => {
                self.form_state = CreateFormState::default();
                if self.screen == Screen::Create {
                    self.screen = Screen::Browse;
                }
            }
            Completion::Decrypted { id, value } => {
                tracing::debug!("Decrypt of {} finished (revealed: {})", id, value.is_some());
            }
            Completion::Stale | Completion::Done => {}
        }
    }

    fn connect(&mut self) {
        self.wallet.connect();
        let Some(account) = self.wallet.account() else {
            return;
        };
        // Results of an earlier connection are no longer wanted.
        self.workers.clear();
        let job = self.session.connect(account);
        self.spawn(Some(job));
        self.browse_state = BrowseState::default();
        self.form_state = CreateFormState::default();
        self.screen = Screen::Browse;
    }

    fn disconnect(&mut self) {
        self.wallet.disconnect();
        self.workers.clear();
        self.session.disconnect();
        self.browse_state = BrowseState::default();
        self.screen = Screen::Connect;
    }

    fn request(&mut self, action: Action) {
        let job = self.session.begin(action, Instant::now());
        self.spawn(job);
    }

    fn selected_id(&self) -> Option<String> {
        self.session
            .visible_boxes()
            .get(self.browse_state.selected)
            .map(|b| b.id.clone())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen.clone() {
            Screen::Connect => self.handle_connect_key(key),
            Screen::Browse => self.handle_browse_key(key),
            Screen::Detail(id) => self.handle_detail_key(key, id),
            Screen::Create => self.handle_create_key(key),
            Screen::Faq(back) => {
                if matches!(key, KeyCode::Esc | KeyCode::Char('?')) {
                    self.screen = *back;
                }
            }
        }
    }

    fn open_faq(&mut self) {
        let back = std::mem::replace(&mut self.screen, Screen::Connect);
        self.screen = Screen::Faq(Box::new(back));
    }

    fn handle_connect_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Enter => self.connect(),
            KeyCode::Char('?') => self.open_faq(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_browse_key(&mut self, key: KeyCode) {
        if self.browse_state.searching {
            match key {
                KeyCode::Esc | KeyCode::Enter => self.browse_state.searching = false,
                KeyCode::Backspace => {
                    self.session.query.search.pop();
                }
                KeyCode::Char(c) => self.session.query.search.push(c),
                _ => {}
            }
            self.browse_state.clamp(self.session.visible_boxes().len());
            return;
        }

        let len = self.session.visible_boxes().len();
        match key {
            KeyCode::Up | KeyCode::Char('k') => self.browse_state.select_prev(len),
            KeyCode::Down | KeyCode::Char('j') => self.browse_state.select_next(len),
            KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    self.screen = Screen::Detail(id);
                }
            }
            KeyCode::Char('/') => self.browse_state.searching = true,
            KeyCode::Esc => {
                self.session.query.search.clear();
                self.browse_state.clamp(self.session.visible_boxes().len());
            }
            KeyCode::Char('f') | KeyCode::Char('F') => {
                self.session.query.category = self.session.query.category.next();
                self.browse_state.clamp(self.session.visible_boxes().len());
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.request(Action::Refresh),
            KeyCode::Char('a') | KeyCode::Char('A') => self.request(Action::CheckAvailability),
            KeyCode::Char('d') | KeyCode::Char('D') => {
                if let Some(id) = self.selected_id() {
                    self.request(Action::Decrypt(id));
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.form_state = CreateFormState::default();
                self.screen = Screen::Create;
            }
            KeyCode::Char('c') | KeyCode::Char('C') => self.disconnect(),
            KeyCode::Char('?') => self.open_faq(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyCode, id: String) {
        match key {
            KeyCode::Esc | KeyCode::Backspace => self.screen = Screen::Browse,
            KeyCode::Char('d') | KeyCode::Char('D') => self.request(Action::Decrypt(id)),
            KeyCode::Char('r') | KeyCode::Char('R') => self.request(Action::Refresh),
            KeyCode::Char('?') => self.open_faq(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_create_key(&mut self, key: KeyCode) {
        let draft = &mut self.session.draft;
        match key {
            KeyCode::Esc => self.screen = Screen::Browse,
            KeyCode::Up | KeyCode::BackTab => self.form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form_state.next_field(),
            KeyCode::Left => self.form_state.cycle_category(draft, false),
            KeyCode::Right => self.form_state.cycle_category(draft, true),
            KeyCode::Backspace => self.form_state.delete_char(draft),
            KeyCode::Char(c) => self.form_state.input_char(draft, c),
            KeyCode::Enter => {
                let job = self.session.submit_draft(Instant::now());
                self.spawn(job);
            }
            _ => {}
        }
    }
}
