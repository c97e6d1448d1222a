#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod config;
pub mod conversation;
pub mod error;
pub mod prompt;
pub mod providers;
pub mod tasks;
pub mod widget;

pub use config::Config;
pub use conversation::{Conversation, DEFAULT_GREETING, Message, MessageRole};
pub use error::{ChatError, ConfigError, ProviderError, Result};
pub use providers::{FALLBACK_REPLY, GeminiProvider, Provider};
pub use tasks::{
    KeywordTrigger, TaskDraft, TaskExtractor, TaskPriority, TaskStatus, TeamMember,
    TriggerDetector,
};
pub use widget::{APOLOGY_REPLY, ChatWidget, Turn};
