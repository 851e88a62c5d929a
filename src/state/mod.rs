//! State management for Stakemate.
//!
//! This module provides centralized state management with a unidirectional
//! data flow pattern inspired by Redux/Elm architecture.

mod app_state;
mod chat_state;
mod context_state;
mod dashboard_state;

pub use app_state::{AppState, InputMode, View};
pub use chat_state::{
    ChatSession, FALLBACK_REPLY, GREETING, Message, QUICK_QUESTIONS, Role, SessionState,
};
pub use context_state::{
    AssistantContext, ContextAggregator, MAX_CONTEXT_MULTIPLES, MAX_CONTEXT_OPPORTUNITIES,
    Multiple, Opportunity, OpportunityBoard, OpportunityState, RAW_OPPORTUNITY_LIMIT,
};
pub use dashboard_state::{
    DashboardModel, DashboardState, DashboardViewModel, MISSING_FIELD, PhaseStatus, ProfitSign,
    Severity, Statistics, StatusBadge, WagerRecord, WagerRow, WagerStatus,
};

use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::mpsc;

/// Actions that can be dispatched to modify state.
#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    SetView(View),
    SetInputMode(InputMode),

    // Chat actions
    SubmitMessage,
    QuickQuestion(usize),

    // Context actions
    RefreshContext,
    ContextLoaded(AssistantContext),

    // Dashboard actions
    LoadDashboard,
    DashboardLoaded(DashboardModel),

    // Opportunity actions
    LoadOpportunities,
    OpportunitiesLoaded(OpportunityBoard),
    SelectOpportunity(usize),
    RegisterWager,
    WagerRegistered(String),

    // Input editing
    InputChar(char),
    InputBackspace,
    CursorLeft,
    CursorRight,

    // UI actions
    ScrollUp,
    ScrollDown,
    GoToTop,
    GoToBottom,
    ToggleHelp,
    ShowNotification(Notification),
    DismissNotification,

    // Data refresh
    RefreshAll,

    // Error handling
    SetError(String),
    ClearError,

    // Connection status
    SetConnected(bool),
    SetLoading(bool),

    // Quit
    Quit,
}

/// Request to register a tracked wager from an opportunity.
#[derive(Debug, Clone, Serialize)]
pub struct WagerRequest {
    #[serde(rename = "match")]
    pub matchup: String,
    pub market: String,
    pub odds: Decimal,
    pub stake: Decimal,
    pub phase: u32,
}

impl WagerRequest {
    /// Build a request from an opportunity at the given phase.
    pub fn from_opportunity(opportunity: &Opportunity, phase: u32) -> Self {
        Self {
            matchup: opportunity.matchup.clone(),
            market: opportunity.market.clone(),
            odds: opportunity.odds,
            stake: opportunity.stake,
            phase,
        }
    }
}

/// A notification to display to the user.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub duration_secs: u64,
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
            duration_secs: 3,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
            duration_secs: 3,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Warning,
            duration_secs: 5,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
            duration_secs: 10,
        }
    }
}

/// The global state store.
#[derive(Debug)]
pub struct Store {
    /// Application state.
    pub app: AppState,
    /// Conversation session.
    pub chat: ChatSession,
    /// Dashboard state.
    pub dashboard: DashboardState,
    /// Opportunities state.
    pub opportunities: OpportunityState,
    /// Action sender for dispatching actions.
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Store {
    /// Create a new store with the given action sender.
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            app: AppState::new(),
            chat: ChatSession::new(),
            dashboard: DashboardState::default(),
            opportunities: OpportunityState::default(),
            action_tx,
        }
    }

    /// Dispatch an action to the store.
    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.action_tx
            .send(action)
            .map_err(|e| crate::Error::channel(e.to_string()))
    }

    /// Apply an action to update state.
    pub fn reduce(&mut self, action: Action) {
        match action {
            // Navigation
            Action::SetView(view) => {
                self.app.current_view = view;
                // Typing only makes sense on the chat view.
                if view != View::Chat {
                    self.app.input_mode = InputMode::Normal;
                }
            }
            Action::SetInputMode(mode) => self.app.input_mode = mode,

            // Chat
            Action::QuickQuestion(index) => {
                if let Some(question) = QUICK_QUESTIONS.get(index) {
                    self.app.set_input(*question);
                    self.app.input_mode = InputMode::Insert;
                }
            }

            // Context
            Action::ContextLoaded(context) => {
                self.chat.set_context(context);
            }

            // Dashboard
            Action::LoadDashboard => self.dashboard.loading = true,
            Action::DashboardLoaded(model) => {
                self.dashboard.model = Some(model);
                self.dashboard.loading = false;
                self.dashboard.last_updated = Some(chrono::Utc::now());
            }

            // Opportunities
            Action::LoadOpportunities => self.opportunities.loading = true,
            Action::OpportunitiesLoaded(board) => {
                self.opportunities.board = board;
                self.opportunities.loading = false;
                self.opportunities.last_updated = Some(chrono::Utc::now());
                if self.opportunities.selected_index.is_none() && self.opportunities.count() > 0 {
                    self.opportunities.selected_index = Some(0);
                }
            }
            Action::SelectOpportunity(index) => {
                if index < self.opportunities.count() {
                    self.opportunities.selected_index = Some(index);
                }
            }
            Action::WagerRegistered(message) => {
                self.app.notification = Some(Notification::success(message));
            }

            // Input editing
            Action::InputChar(c) => self.app.push_char(c),
            Action::InputBackspace => self.app.pop_char(),
            Action::CursorLeft => self.app.cursor_left(),
            Action::CursorRight => self.app.cursor_right(),

            // UI
            Action::ScrollUp => self.scroll(-1),
            Action::ScrollDown => self.scroll(1),
            Action::GoToTop => self.go_to_top(),
            Action::GoToBottom => self.go_to_bottom(),
            Action::ToggleHelp => self.app.show_help = !self.app.show_help,
            Action::ShowNotification(notification) => {
                self.app.notification = Some(notification);
            }
            Action::DismissNotification => {
                self.app.notification = None;
            }

            // Data refresh
            Action::RefreshAll | Action::RefreshContext | Action::RegisterWager => {
                self.app.loading = true;
            }

            // Error handling
            Action::SetError(error) => {
                self.app.error = Some(error);
                self.app.loading = false;
                self.dashboard.loading = false;
                self.opportunities.loading = false;
            }
            Action::ClearError => {
                self.app.error = None;
            }

            // Connection status
            Action::SetConnected(connected) => {
                self.app.connected = connected;
            }
            Action::SetLoading(loading) => {
                self.app.loading = loading;
            }

            // Handled by the app loop, nothing to reduce.
            Action::SubmitMessage => {}

            // Quit
            Action::Quit => {
                self.app.should_quit = true;
            }
        }
    }

    fn scroll(&mut self, delta: i32) {
        if self.app.current_view == View::Opportunities {
            let current = self.opportunities.selected_index.unwrap_or(0) as i32;
            let new_index = (current + delta).max(0) as usize;
            let max_index = self.opportunities.count().saturating_sub(1);
            self.opportunities.selected_index = Some(new_index.min(max_index));
        }
    }

    fn go_to_top(&mut self) {
        if self.app.current_view == View::Opportunities {
            self.opportunities.selected_index = Some(0);
        }
    }

    fn go_to_bottom(&mut self) {
        if self.app.current_view == View::Opportunities {
            let max = self.opportunities.count().saturating_sub(1);
            self.opportunities.selected_index = Some(max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    fn store() -> Store {
        let (tx, _rx) = mpsc::unbounded_channel();
        Store::new(tx)
    }

    #[test]
    fn test_quick_question_fills_input() {
        let mut store = store();
        store.reduce(Action::QuickQuestion(1));
        assert_eq!(store.app.input_buffer, QUICK_QUESTIONS[1]);
        assert_eq!(store.app.input_mode, InputMode::Insert);

        // Out-of-range index is ignored.
        store.reduce(Action::QuickQuestion(99));
        assert_eq!(store.app.input_buffer, QUICK_QUESTIONS[1]);
    }

    #[test]
    fn test_select_opportunity_bounds() {
        let mut store = store();
        store.reduce(Action::SelectOpportunity(3));
        assert_eq!(store.opportunities.selected_index, None);
    }

    #[test]
    fn test_set_error_clears_loading_flags() {
        let mut store = store();
        store.reduce(Action::LoadDashboard);
        store.reduce(Action::LoadOpportunities);
        store.reduce(Action::SetError("boom".to_string()));
        assert!(!store.dashboard.loading);
        assert!(!store.opportunities.loading);
        assert_eq!(store.app.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_leaving_chat_exits_insert_mode() {
        let mut store = store();
        assert_eq!(store.app.input_mode, InputMode::Insert);
        store.reduce(Action::SetView(View::Dashboard));
        assert_eq!(store.app.input_mode, InputMode::Normal);
    }
}
