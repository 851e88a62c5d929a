//! Main application module.
//!
//! This module contains the main `App` struct that coordinates
//! the event loop, state management, and rendering.

use crate::api::{BackendApi, HttpBackend};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::EventHandler;
use crate::state::{
    Action, ContextAggregator, DashboardViewModel, Notification, Store, View, WagerRequest,
};
use crate::ui::Ui;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use tokio::sync::mpsc;

/// The main application.
pub struct App {
    /// Terminal.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application store.
    store: Store,
    /// Event handler.
    event_handler: EventHandler,
    /// Action receiver.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Backend client.
    api_client: Option<HttpBackend>,
    /// Context snapshot builder.
    aggregator: ContextAggregator,
    /// Dashboard loader.
    dashboard_loader: DashboardViewModel,
    /// Configuration.
    config: Config,
}

impl App {
    /// Create a new application.
    pub async fn new(config: Config) -> Result<Self> {
        // Set up terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        // Create action channel
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        // Create store
        let store = Store::new(action_tx);

        // Create event handler
        let event_handler = EventHandler::new(config.keybindings.clone());

        // Try to create the backend client
        let api_client = match HttpBackend::new(config.api.clone()) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("Failed to create backend client: {}", e);
                None
            }
        };

        let dashboard_loader = DashboardViewModel::new(config.ui.history_limit);

        Ok(Self {
            terminal,
            store,
            event_handler,
            action_rx,
            api_client,
            aggregator: ContextAggregator::default(),
            dashboard_loader,
            config,
        })
    }

    /// Run the application event loop.
    pub async fn run(&mut self) -> Result<()> {
        // Initial connection test
        if let Some(client) = &self.api_client {
            match client.test_connection().await {
                Ok(true) => {
                    self.store.reduce(Action::SetConnected(true));
                    // Load initial data
                    self.store.dispatch(Action::RefreshAll)?;
                }
                Ok(false) | Err(_) => {
                    self.store.reduce(Action::SetConnected(false));
                }
            }
        }

        // Main event loop
        loop {
            // Update event handler with current state
            self.event_handler.update_store_snapshot(&self.store);

            // Render UI
            let store = &self.store;
            let ui_config = &self.config.ui;
            self.terminal.draw(|frame| {
                Ui::render(frame, store, ui_config);
            })?;

            // Handle events and actions
            tokio::select! {
                // Handle terminal events
                result = self.event_handler.next() => {
                    if let Some(action) = result? {
                        self.handle_action(action).await?;
                    }
                }

                // Handle actions from the channel
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action).await?;
                }
            }

            // Check if we should quit
            if self.store.app.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Handle an action.
    async fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::RefreshAll => {
                self.refresh_all().await?;
            }
            Action::RefreshContext => {
                self.refresh_context().await?;
            }
            Action::LoadDashboard => {
                self.refresh_dashboard().await?;
            }
            Action::LoadOpportunities => {
                self.refresh_opportunities().await?;
            }
            Action::SubmitMessage => {
                self.submit_message().await?;
            }
            Action::RegisterWager => {
                self.register_wager().await?;
            }
            Action::SetView(view) => {
                self.store.reduce(Action::SetView(view));
                self.load_view_if_stale(view).await?;
            }
            other => {
                // Let the store handle the action
                self.store.reduce(other);
            }
        }

        Ok(())
    }

    /// Refresh everything: context snapshot, dashboard, and opportunities.
    async fn refresh_all(&mut self) -> Result<()> {
        self.store.reduce(Action::SetLoading(true));

        self.refresh_context().await?;
        self.refresh_dashboard().await?;
        self.refresh_opportunities().await?;

        self.store.reduce(Action::SetLoading(false));
        Ok(())
    }

    /// Load a view's data the first time it is visited.
    async fn load_view_if_stale(&mut self, view: View) -> Result<()> {
        match view {
            View::Dashboard
                if self.store.dashboard.model.is_none() && !self.store.dashboard.loading =>
            {
                self.refresh_dashboard().await
            }
            View::Opportunities
                if self.store.opportunities.last_updated.is_none()
                    && !self.store.opportunities.loading =>
            {
                self.refresh_opportunities().await
            }
            _ => Ok(()),
        }
    }

    /// Rebuild the assistant context snapshot.
    ///
    /// A failed build leaves the session without context; messages go out
    /// bare until a retry succeeds.
    async fn refresh_context(&mut self) -> Result<()> {
        let Some(client) = &self.api_client else {
            return Ok(());
        };

        match self.aggregator.build(client).await {
            Ok(context) => {
                self.store.reduce(Action::ContextLoaded(context));
            }
            Err(e) => {
                tracing::warn!("context build failed: {}", e);
                self.store.reduce(Action::ShowNotification(Notification::warning(
                    "Contexto indisponível; o assistente responderá sem dados do dia.",
                )));
            }
        }

        Ok(())
    }

    /// Reload the dashboard model.
    async fn refresh_dashboard(&mut self) -> Result<()> {
        self.store.reduce(Action::LoadDashboard);

        let Some(client) = &self.api_client else {
            self.store
                .reduce(Action::SetError("Backend não configurado".to_string()));
            return Ok(());
        };

        match self.dashboard_loader.load(client).await {
            Ok(model) => {
                self.store.reduce(Action::DashboardLoaded(model));
            }
            Err(e) => {
                self.store.reduce(Action::SetError(e.to_string()));
            }
        }

        Ok(())
    }

    /// Reload the opportunity board.
    async fn refresh_opportunities(&mut self) -> Result<()> {
        self.store.reduce(Action::LoadOpportunities);

        let Some(client) = &self.api_client else {
            self.store
                .reduce(Action::SetError("Backend não configurado".to_string()));
            return Ok(());
        };

        match client
            .get_opportunities(crate::state::RAW_OPPORTUNITY_LIMIT)
            .await
        {
            Ok(board) => {
                self.store.reduce(Action::OpportunitiesLoaded(board));
            }
            Err(e) => {
                self.store.reduce(Action::SetError(e.to_string()));
            }
        }

        Ok(())
    }

    /// Send the input buffer as a chat message.
    async fn submit_message(&mut self) -> Result<()> {
        if self.store.chat.is_sending() {
            return Ok(());
        }

        let text = self.store.app.input_buffer.trim().to_string();
        if text.is_empty() {
            return Ok(());
        }
        self.store.app.clear_input();

        match &self.api_client {
            Some(client) => {
                self.store.chat.send(client, &text).await;
            }
            None => {
                // No client: the exchange still resolves into the fallback
                // reply so the log stays paired.
                if self.store.chat.begin_send(&text).is_some() {
                    self.store
                        .chat
                        .complete_send(Err(Error::application("Backend não configurado")));
                }
            }
        }

        Ok(())
    }

    /// Register the selected opportunity as a tracked wager.
    async fn register_wager(&mut self) -> Result<()> {
        let Some(client) = &self.api_client else {
            return Ok(());
        };
        let Some(opportunity) = self.store.opportunities.selected_opportunity() else {
            return Ok(());
        };

        let phase = self
            .store
            .chat
            .context()
            .map(|c| c.phase)
            .or_else(|| self.store.dashboard.model.as_ref().map(|m| m.phase.phase))
            .unwrap_or(1);
        let request = WagerRequest::from_opportunity(opportunity, phase);

        match client.register_wager(&request).await {
            Ok(message) => {
                self.store.reduce(Action::WagerRegistered(message));
            }
            Err(e) => {
                self.store.reduce(Action::SetError(e.to_string()));
            }
        }

        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
