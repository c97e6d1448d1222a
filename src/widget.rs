//! Orchestrator for the chat widget: per-turn state machine, failure-path
//! message handling, and task-draft emission.
//!
//! Turn lifecycle: Idle → Sending → {Success → (EmitTask?) → Idle,
//! Failure → Idle}. `send` takes `&mut self`, so a second submission cannot
//! start while one is in flight; the loading flag is restored even if the
//! turn future is dropped mid-await.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::conversation::{Conversation, DEFAULT_GREETING, Message};
use crate::error::{ChatError, ConfigError, ProviderError, Result};
use crate::prompt::build_context_prompt;
use crate::providers::{GeminiProvider, Provider};
use crate::tasks::{TaskDraft, TaskExtractor, TeamMember, TriggerDetector};

/// Fixed assistant turn appended when a request fails.
pub const APOLOGY_REPLY: &str =
    "Sorry, I encountered an error processing your request. Please try again.";

type TaskCallback = Box<dyn Fn(TaskDraft) + Send + Sync>;

/// Outcome of one successful turn.
#[derive(Debug, Clone)]
pub struct Turn {
    pub reply: String,
    pub task: Option<TaskDraft>,
}

pub struct ChatWidget {
    conversation: Conversation,
    provider: Arc<dyn Provider>,
    team: Vec<TeamMember>,
    extractor: TaskExtractor,
    on_create_task: TaskCallback,
    last_created_task: Option<TaskDraft>,
    sending: Arc<AtomicBool>,
}

/// Clears the loading flag when the turn ends, including when the turn
/// future is dropped mid-await.
struct SendingGuard(Arc<AtomicBool>);

impl SendingGuard {
    fn engage(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(Arc::clone(flag))
    }
}

impl Drop for SendingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ChatWidget {
    /// Build a widget backed by the Gemini provider.
    ///
    /// The roster must contain at least one member: drafts always carry an
    /// assignee, falling back to the first member when nobody is named.
    pub fn new(
        config: Config,
        team: Vec<TeamMember>,
        on_create_task: impl Fn(TaskDraft) + Send + Sync + 'static,
    ) -> Result<Self> {
        let provider = Arc::new(GeminiProvider::from_config(&config)?);
        Self::with_provider(config, team, provider, on_create_task)
    }

    /// Build a widget around an injected backend. Transport settings in
    /// `config` are ignored here; the greeting still applies.
    pub fn with_provider(
        config: Config,
        team: Vec<TeamMember>,
        provider: Arc<dyn Provider>,
        on_create_task: impl Fn(TaskDraft) + Send + Sync + 'static,
    ) -> Result<Self> {
        if team.is_empty() {
            return Err(ConfigError::EmptyRoster.into());
        }

        let greeting = config
            .greeting
            .clone()
            .unwrap_or_else(|| DEFAULT_GREETING.to_string());

        Ok(Self {
            conversation: Conversation::new(&greeting),
            provider,
            team,
            extractor: TaskExtractor::default(),
            on_create_task: Box::new(on_create_task),
            last_created_task: None,
            sending: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Swap the trigger detector (e.g. for structured intent extraction).
    pub fn with_trigger(mut self, trigger: Box<dyn TriggerDetector>) -> Self {
        self.extractor = TaskExtractor::new(trigger);
        self
    }

    /// Run one conversation turn.
    ///
    /// The user/assistant pair is appended whether the turn succeeds or
    /// fails; on failure the assistant half is [`APOLOGY_REPLY`] and the
    /// error is returned to the caller. A draft is emitted at most once per
    /// turn, before the pair is appended.
    pub async fn send(&mut self, user_text: &str) -> Result<Turn> {
        let cancel = CancellationToken::new();
        self.send_with_cancel(user_text, &cancel).await
    }

    /// Like [`Self::send`], but also honors a caller-owned cancellation
    /// token for this turn. A cancelled turn follows the failure path: the
    /// pair is appended with the apology and [`ProviderError::Cancelled`]
    /// is returned.
    pub async fn send_with_cancel(
        &mut self,
        user_text: &str,
        cancel: &CancellationToken,
    ) -> Result<Turn> {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let _guard = SendingGuard::engage(&self.sending);
        let prompt = build_context_prompt(&self.team, user_text);

        debug!(chars = prompt.len(), "sending turn to provider");
        // biased: a cancelled token wins over an already-ready reply.
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ProviderError::Cancelled),
            result = self.provider.generate(&prompt) => result,
        };

        match outcome {
            Ok(reply) => {
                let task = self.extractor.maybe_extract(user_text, &reply, &self.team);
                if let Some(draft) = &task {
                    info!(title = %draft.title, assignee = %draft.assignee, "emitting task draft");
                    (self.on_create_task)(draft.clone());
                    self.last_created_task = Some(draft.clone());
                }
                self.conversation.push_exchange(user_text, reply.as_str());
                Ok(Turn { reply, task })
            }
            Err(err) => {
                warn!(error = %err, "turn failed, appending apology");
                self.conversation.push_exchange(user_text, APOLOGY_REPLY);
                Err(err.into())
            }
        }
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn is_open(&self) -> bool {
        self.conversation.is_open()
    }

    pub fn open(&mut self) {
        self.conversation.open();
    }

    pub fn close(&mut self) {
        self.conversation.close();
    }

    pub fn toggle(&mut self) {
        self.conversation.toggle();
    }

    /// True only while a turn is awaiting the provider.
    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::SeqCst)
    }

    /// Most recent draft handed to the host, kept for reference only.
    pub fn last_created_task(&self) -> Option<&TaskDraft> {
        self.last_created_task.as_ref()
    }
}
