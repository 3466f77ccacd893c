//! Push event card.

use super::{repository_line, CardBuilder, CardDocument};
use crate::webhooks::events::PushEvent;

/// Commits listed individually before collapsing into a summary line.
pub const MAX_LISTED_COMMITS: usize = 5;

const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Short commit hash length.
const SHORT_SHA_LEN: usize = 7;

/// Branch name for a ref, or the ref unchanged when it isn't a branch.
pub fn branch_name(git_ref: &str) -> &str {
    git_ref.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(git_ref)
}

pub fn push_card(event: &PushEvent) -> CardDocument {
    let repository = &event.repository;
    let commits = &event.commits;

    let header = format!(
        "🚀 **Code Push**\n\n{}\n**Branch:** {}\n**Pusher:** {}\n**Commits:** {}",
        repository_line(repository),
        branch_name(&event.git_ref),
        event.pusher.name,
        commits.len(),
    );

    let mut card = CardBuilder::new()
        .markdown(header)
        .divider()
        .markdown("**📝 Commit details:**");

    for commit in commits.iter().take(MAX_LISTED_COMMITS) {
        let short_sha: String = commit.id.chars().take(SHORT_SHA_LEN).collect();
        card = card.markdown(format!(
            "**[{short_sha}]({})** {}\n👤 {}",
            commit.url, commit.message, commit.author.name
        ));
    }

    if commits.len() > MAX_LISTED_COMMITS {
        card = card.plain_text(format!(
            "... +{} more commits",
            commits.len() - MAX_LISTED_COMMITS
        ));
    }

    card.link_button("View repository", &repository.html_url).build()
}
