//! # Stakemate - Value Betting TUI Client
//!
//! A terminal client for a value-betting assistant backend: chat with the
//! assistant, track bankroll/phase progress, and browse the day's +EV
//! opportunities.
//!
//! ## Architecture
//!
//! The application follows a clean architecture pattern:
//!
//! - **App**: Core application state and lifecycle management
//! - **UI**: Layout and rendering logic
//! - **API**: Backend integration layer
//! - **State**: Centralized state management (session, context, dashboard)
//! - **Relevance**: Context-attachment policy for outbound messages
//! - **Events**: Input handling and event processing
//! - **Config**: Configuration management

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod relevance;
pub mod state;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
pub use relevance::{ContextRelevance, KeywordRelevance};
