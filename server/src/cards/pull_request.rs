//! Pull request event card.

use super::{repository_line, with_description, CardBuilder, CardDocument};
use crate::webhooks::events::{PullRequest, PullRequestEvent};

/// Characters of the PR description shown before truncation.
pub const BODY_LIMIT: usize = 200;

const ACTION_LABELS: &[(&str, &str)] = &[
    ("opened", "🆕 New"),
    ("merged", "🔀 Merged"),
    ("reopened", "🔄 Reopened"),
    ("edited", "✏️ Edited"),
    ("review_requested", "👀 Review requested"),
    ("ready_for_review", "📋 Ready for review"),
];

/// Header label for a pull request action.
pub fn action_label(action: &str, pr: &PullRequest) -> String {
    if action == "closed" {
        return if pr.merged.unwrap_or(false) {
            "🔀 Merged".to_string()
        } else {
            "❌ Closed".to_string()
        };
    }

    ACTION_LABELS
        .iter()
        .find(|(name, _)| *name == action)
        .map_or_else(|| format!("📝 action: {action}"), |(_, label)| (*label).to_string())
}

pub fn pull_request_card(event: &PullRequestEvent) -> CardDocument {
    let pr = &event.pull_request;

    let header = format!(
        "{} **Pull Request**\n\n{}\n**Title:** [{}]({})\n**Author:** {}\n**Branch:** {} → {}",
        action_label(&event.action, pr),
        repository_line(&event.repository),
        pr.title,
        pr.html_url,
        pr.user.login,
        pr.head.name,
        pr.base.name,
    );

    let card = CardBuilder::new().markdown(header);
    with_description(card, "Description", pr.body.as_deref(), BODY_LIMIT)
        .link_button("View PR", &pr.html_url)
        .build()
}
