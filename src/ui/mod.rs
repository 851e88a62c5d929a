//! UI rendering using ratatui.
//!
//! This module contains all TUI components and rendering logic.

mod layout;
mod widgets;

pub use layout::Layout;
pub use widgets::{ChatPanel, DashboardPanel, HelpPanel, OpportunityList, StatusBar, TabBar};

use crate::config::UiConfig;
use crate::state::{Store, View};
use ratatui::Frame;

/// Main UI renderer.
pub struct Ui;

impl Ui {
    /// Render the entire UI.
    pub fn render(frame: &mut Frame, store: &Store, ui: &UiConfig) {
        let layout = Layout::new(frame.area(), ui.show_status_bar);

        if let Some(status_area) = layout.status_area {
            StatusBar::render(frame, status_area, store);
        }

        TabBar::render(frame, layout.tab_area, store);

        match store.app.current_view {
            View::Chat => ChatPanel::render(frame, layout.main_area, store),
            View::Dashboard => DashboardPanel::render(frame, layout.main_area, store, ui),
            View::Opportunities => OpportunityList::render(frame, layout.main_area, store),
        }

        if store.app.show_help {
            HelpPanel::render(frame, frame.area());
        }

        if let Some(notification) = &store.app.notification {
            widgets::render_notification(frame, layout.notification_area, notification);
        }

        if let Some(error) = &store.app.error {
            widgets::render_error(frame, layout.notification_area, error);
        }
    }
}
