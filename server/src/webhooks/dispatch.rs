//! Webhook Event Dispatch
//!
//! Picks the card formatter for an event type and action, or suppresses the
//! event. Payloads are only parsed into their typed form once an event has
//! passed its allow-list, so suppressed events never fail on shape.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::events::{
    CreateEvent, GitHubEvent, IssuesEvent, PullRequestEvent, PushEvent, RefType, ReleaseEvent,
};
use super::types::WebhookError;
use crate::cards::{
    issue::issue_card, pull_request::pull_request_card, push::push_card, release::release_card,
    repository_line, CardBuilder, CardDocument,
};

/// Pull request actions that produce a card.
pub const PULL_REQUEST_ACTIONS: &[&str] = &["opened", "closed", "reopened", "merged"];

/// Issue actions that produce a card.
pub const ISSUE_ACTIONS: &[&str] = &["opened", "closed", "reopened"];

/// Release actions that produce a card.
pub const RELEASE_ACTIONS: &[&str] = &["published", "created"];

/// Build the card for an event, or `None` when the event is suppressed.
///
/// `event` is the raw `X-GitHub-Event` header; a missing or unknown event is
/// suppressed, as is a known event whose action isn't on its allow-list.
pub fn dispatch(
    event: Option<&str>,
    payload: &Value,
) -> Result<Option<CardDocument>, WebhookError> {
    let Some(event) = event.and_then(GitHubEvent::parse_str) else {
        debug!(event = ?event, "Unsupported event type");
        return Ok(None);
    };

    let card = match event {
        GitHubEvent::Push => {
            if has_commits(payload) {
                Some(push_card(&PushEvent::deserialize(payload)?))
            } else {
                None
            }
        }
        GitHubEvent::PullRequest => {
            if action_allowed(payload, PULL_REQUEST_ACTIONS) {
                Some(pull_request_card(&PullRequestEvent::deserialize(payload)?))
            } else {
                None
            }
        }
        GitHubEvent::Issues => {
            if action_allowed(payload, ISSUE_ACTIONS) {
                Some(issue_card(&IssuesEvent::deserialize(payload)?))
            } else {
                None
            }
        }
        GitHubEvent::Release => {
            if action_allowed(payload, RELEASE_ACTIONS) {
                Some(release_card(&ReleaseEvent::deserialize(payload)?))
            } else {
                None
            }
        }
        GitHubEvent::Create => {
            let ref_type = payload
                .get("ref_type")
                .and_then(Value::as_str)
                .and_then(RefType::parse_str);
            if ref_type.is_some() {
                Some(create_ref_card(&CreateEvent::deserialize(payload)?))
            } else {
                None
            }
        }
    };

    if card.is_none() {
        debug!(event = %event, action = ?action(payload), "Event suppressed");
    }

    Ok(card)
}

fn action(payload: &Value) -> Option<&str> {
    payload.get("action").and_then(Value::as_str)
}

fn action_allowed(payload: &Value, allowed: &[&str]) -> bool {
    action(payload).is_some_and(|action| allowed.contains(&action))
}

/// Empty pushes (branch deletions, tag-only pushes) carry no commits.
fn has_commits(payload: &Value) -> bool {
    payload
        .get("commits")
        .and_then(Value::as_array)
        .is_some_and(|commits| !commits.is_empty())
}

fn create_ref_card(event: &CreateEvent) -> CardDocument {
    let kind = event.ref_type.as_str();
    CardBuilder::new()
        .markdown(format!(
            "🌿 **Created {kind}**\n\n{}\n**{kind}:** {}",
            repository_line(&event.repository),
            event.git_ref
        ))
        .link_button("View repository", &event.repository.html_url)
        .build()
}
