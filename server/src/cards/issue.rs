//! Issue event card.

use super::{repository_line, with_description, CardBuilder, CardDocument};
use crate::webhooks::events::IssuesEvent;

/// Characters of the issue description shown before truncation.
pub const BODY_LIMIT: usize = 200;

const ACTION_LABELS: &[(&str, &str)] = &[
    ("opened", "🆕 New"),
    ("closed", "✅ Closed"),
    ("reopened", "🔄 Reopened"),
    ("edited", "✏️ Edited"),
    ("assigned", "👤 Assigned"),
    ("labeled", "🏷️ Labeled"),
];

pub fn action_label(action: &str) -> String {
    ACTION_LABELS
        .iter()
        .find(|(name, _)| *name == action)
        .map_or_else(|| format!("📝 action: {action}"), |(_, label)| (*label).to_string())
}

pub fn issue_card(event: &IssuesEvent) -> CardDocument {
    let issue = &event.issue;

    let header = format!(
        "{} **Issue**\n\n{}\n**Title:** [{}]({})\n**Author:** {}",
        action_label(&event.action),
        repository_line(&event.repository),
        issue.title,
        issue.html_url,
        issue.user.login,
    );

    let card = CardBuilder::new().markdown(header);
    with_description(card, "Description", issue.body.as_deref(), BODY_LIMIT)
        .link_button("View issue", &issue.html_url)
        .build()
}
