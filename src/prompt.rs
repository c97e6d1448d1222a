use crate::tasks::TeamMember;

/// Fixed system instruction embedded in every prompt.
const SYSTEM_INSTRUCTION: &str = "You are a helpful task management assistant. \
You can help with creating tasks, assigning team members, and providing information.";

/// Compose the single prompt string sent per turn: the system instruction,
/// the comma-joined roster, then the verbatim user text.
pub fn build_context_prompt(team: &[TeamMember], user_text: &str) -> String {
    let roster = team
        .iter()
        .map(|member| member.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!("{SYSTEM_INSTRUCTION} Current team members are: {roster}.\n\nUser message: {user_text}")
}
