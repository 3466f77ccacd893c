//! Release event card.

use super::{repository_line, with_description, CardBuilder, CardDocument};
use crate::webhooks::events::ReleaseEvent;

/// Characters of the release notes shown before truncation.
pub const NOTES_LIMIT: usize = 300;

const ACTION_LABELS: &[(&str, &str)] = &[
    ("published", "🎉 Published"),
    ("created", "📦 Created"),
    ("edited", "✏️ Edited"),
    ("deleted", "🗑️ Deleted"),
];

pub fn action_label(action: &str) -> String {
    ACTION_LABELS
        .iter()
        .find(|(name, _)| *name == action)
        .map_or_else(|| format!("📝 action: {action}"), |(_, label)| (*label).to_string())
}

pub fn release_card(event: &ReleaseEvent) -> CardDocument {
    let release = &event.release;

    let header = format!(
        "{} **New Release**\n\n{}\n**Version:** [{}]({})\n**Name:** {}",
        action_label(&event.action),
        repository_line(&event.repository),
        release.tag_name,
        release.html_url,
        release.display_name(),
    );

    let card = CardBuilder::new().markdown(header);
    with_description(card, "Release notes", release.body.as_deref(), NOTES_LIMIT)
        .link_button("View release", &release.html_url)
        .build()
}
