//! Feishu Interactive Cards
//!
//! Typed model of the interactive card JSON accepted by the Feishu message
//! API, plus one formatter per supported GitHub event.
//!
//! Wire shape:
//!
//! ```json
//! {
//!   "config": { "wide_screen_mode": true },
//!   "elements": [
//!     { "tag": "div", "text": { "tag": "lark_md", "content": "..." } },
//!     { "tag": "hr" },
//!     { "tag": "action", "actions": [
//!       { "tag": "button", "text": { "tag": "plain_text", "content": "..." },
//!         "type": "primary", "url": "..." }
//!     ] }
//!   ]
//! }
//! ```

pub mod issue;
pub mod pull_request;
pub mod push;
pub mod release;

use serde::{Deserialize, Serialize};

use crate::webhooks::events::Repository;

/// Marker appended to text cut short by [`truncate_chars`].
pub const ELLIPSIS: &str = "...";

/// A complete card, ready to be serialized into a message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDocument {
    pub config: CardConfig,
    pub elements: Vec<Element>,
}

/// Card-level layout flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardConfig {
    pub wide_screen_mode: bool,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            wide_screen_mode: true,
        }
    }
}

/// One block of the card body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Element {
    /// Text block.
    Div { text: Text },
    /// Horizontal rule.
    Hr,
    /// Row of interactive components.
    Action { actions: Vec<ActionItem> },
}

/// Text content, either Feishu-flavoured markdown or literal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Text {
    LarkMd { content: String },
    PlainText { content: String },
}

impl Text {
    pub fn content(&self) -> &str {
        match self {
            Self::LarkMd { content } | Self::PlainText { content } => content,
        }
    }
}

/// Component inside an [`Element::Action`] block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum ActionItem {
    Button {
        text: Text,
        #[serde(rename = "type")]
        kind: ButtonKind,
        url: String,
    },
}

/// Button style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    Primary,
}

impl CardDocument {
    /// Serialize to the JSON string carried in the message `content` field.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Contents of every text block, in order.
    pub fn div_contents(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|element| match element {
                Element::Div { text } => Some(text.content()),
                _ => None,
            })
            .collect()
    }

    /// URLs of every button, in order.
    pub fn button_urls(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|element| match element {
                Element::Action { actions } => Some(actions),
                _ => None,
            })
            .flatten()
            .map(|ActionItem::Button { url, .. }| url.as_str())
            .collect()
    }
}

/// Appends elements in order and produces a [`CardDocument`].
#[derive(Debug, Default)]
pub struct CardBuilder {
    elements: Vec<Element>,
}

impl CardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `lark_md` text block.
    #[must_use]
    pub fn markdown(mut self, content: impl Into<String>) -> Self {
        self.elements.push(Element::Div {
            text: Text::LarkMd {
                content: content.into(),
            },
        });
        self
    }

    /// Add a `plain_text` block.
    #[must_use]
    pub fn plain_text(mut self, content: impl Into<String>) -> Self {
        self.elements.push(Element::Div {
            text: Text::PlainText {
                content: content.into(),
            },
        });
        self
    }

    #[must_use]
    pub fn divider(mut self) -> Self {
        self.elements.push(Element::Hr);
        self
    }

    /// Add an action block holding a single primary link button.
    #[must_use]
    pub fn link_button(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.elements.push(Element::Action {
            actions: vec![ActionItem::Button {
                text: Text::PlainText {
                    content: label.into(),
                },
                kind: ButtonKind::Primary,
                url: url.into(),
            }],
        });
        self
    }

    pub fn build(self) -> CardDocument {
        CardDocument {
            config: CardConfig::default(),
            elements: self.elements,
        }
    }
}

/// Keep at most `limit` characters, appending [`ELLIPSIS`] only when text was cut.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}{ELLIPSIS}", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// `**Repository:** [name](url)` line shared by every card header.
pub(crate) fn repository_line(repository: &Repository) -> String {
    format!(
        "**Repository:** [{}]({})",
        repository.name, repository.html_url
    )
}

/// Optional description block, skipped when the body is absent or empty.
pub(crate) fn with_description(
    builder: CardBuilder,
    heading: &str,
    body: Option<&str>,
    limit: usize,
) -> CardBuilder {
    match body.filter(|b| !b.is_empty()) {
        Some(body) => builder.markdown(format!(
            "**{heading}:**\n{}",
            truncate_chars(body, limit)
        )),
        None => builder,
    }
}
