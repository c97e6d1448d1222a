//! Keyword heuristics that turn a qualifying exchange into a [`TaskDraft`].
//!
//! This is deliberately substring matching, not parsing: the trigger seam
//! exists so a host can swap in structured intent extraction later without
//! touching the widget.

use chrono::{Days, Local, NaiveDate};
use tracing::warn;

use super::types::{TaskDraft, TaskPriority, TaskStatus, TeamMember};

/// Drafts fall due this many days after the submission date.
const DUE_OFFSET_DAYS: u64 = 7;

/// Decides whether a user message is asking for a task to be created.
pub trait TriggerDetector: Send + Sync {
    fn matches(&self, user_text: &str) -> bool;
}

/// Default detector: case-insensitive substring search over a fixed phrase
/// list.
pub struct KeywordTrigger {
    phrases: Vec<String>,
}

impl KeywordTrigger {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(|phrase| phrase.into().to_lowercase())
                .collect(),
        }
    }
}

impl Default for KeywordTrigger {
    fn default() -> Self {
        Self::new(["create task", "new task"])
    }
}

impl TriggerDetector for KeywordTrigger {
    fn matches(&self, user_text: &str) -> bool {
        let haystack = user_text.to_lowercase();
        self.phrases
            .iter()
            .any(|phrase| haystack.contains(phrase.as_str()))
    }
}

pub struct TaskExtractor {
    trigger: Box<dyn TriggerDetector>,
}

impl TaskExtractor {
    pub fn new(trigger: Box<dyn TriggerDetector>) -> Self {
        Self { trigger }
    }

    /// Derive a draft from the exchange, or `None` when the user text does
    /// not trigger task creation.
    ///
    /// The title is the first line of the assistant reply; the description
    /// is the whole reply. An empty roster yields `None` rather than a
    /// draft with no assignee.
    pub fn maybe_extract(
        &self,
        user_text: &str,
        reply: &str,
        team: &[TeamMember],
    ) -> Option<TaskDraft> {
        self.maybe_extract_at(user_text, reply, team, Local::now().date_naive())
    }

    fn maybe_extract_at(
        &self,
        user_text: &str,
        reply: &str,
        team: &[TeamMember],
        today: NaiveDate,
    ) -> Option<TaskDraft> {
        if !self.trigger.matches(user_text) {
            return None;
        }

        let Some(assignee) = find_assignee(user_text, team) else {
            warn!("task trigger matched but the roster is empty, skipping draft");
            return None;
        };

        Some(TaskDraft {
            title: reply.split('\n').next().unwrap_or_default().to_string(),
            description: reply.to_string(),
            status: TaskStatus::Todo,
            priority: extract_priority(user_text),
            assignee,
            due_date: due_date_from(today),
        })
    }
}

impl Default for TaskExtractor {
    fn default() -> Self {
        Self::new(Box::new(KeywordTrigger::default()))
    }
}

/// Ordered rules, first match wins: the High tier outranks Medium and Low
/// when phrases co-occur.
fn extract_priority(user_text: &str) -> TaskPriority {
    let text = user_text.to_lowercase();
    if ["urgent", "critical", "high priority"]
        .iter()
        .any(|phrase| text.contains(phrase))
    {
        TaskPriority::High
    } else if ["medium priority", "normal priority"]
        .iter()
        .any(|phrase| text.contains(phrase))
    {
        TaskPriority::Medium
    } else if text.contains("low priority") {
        TaskPriority::Low
    } else {
        TaskPriority::Medium
    }
}

/// First roster member named in the text, else the first member. `None`
/// only when the roster itself is empty.
fn find_assignee(user_text: &str, team: &[TeamMember]) -> Option<String> {
    let text = user_text.to_lowercase();
    team.iter()
        .find(|member| text.contains(&member.name.to_lowercase()))
        .or_else(|| team.first())
        .map(|member| member.name.clone())
}

fn due_date_from(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_days(Days::new(DUE_OFFSET_DAYS))
        .unwrap_or(today)
}
