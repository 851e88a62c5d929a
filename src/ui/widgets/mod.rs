//! TUI widgets.

mod chat;
mod dashboard;
mod help;
mod notifications;
mod opportunity_list;
mod status_bar;
mod tab_bar;

pub use chat::ChatPanel;
pub use dashboard::DashboardPanel;
pub use help::HelpPanel;
pub use notifications::{render_error, render_notification};
pub use opportunity_list::OpportunityList;
pub use status_bar::StatusBar;
pub use tab_bar::TabBar;

use crate::state::Severity;
use ratatui::style::Color;

/// Map a status badge severity to its display color.
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => Color::Green,
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Neutral => Color::Gray,
    }
}
