mod extract;
mod types;

pub use extract::{KeywordTrigger, TaskExtractor, TriggerDetector};
pub use types::{TaskDraft, TaskPriority, TaskStatus, TeamMember};
