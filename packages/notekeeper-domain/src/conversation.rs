use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	System,
	User,
	Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
	pub role: Role,
	pub content: String,
}
impl ConversationMessage {
	pub fn system(content: impl Into<String>) -> Self {
		Self { role: Role::System, content: content.into() }
	}

	pub fn user(content: impl Into<String>) -> Self {
		Self { role: Role::User, content: content.into() }
	}

	pub fn assistant(content: impl Into<String>) -> Self {
		Self { role: Role::Assistant, content: content.into() }
	}
}

/// Returns the last `window_size` messages in their original order.
pub fn truncate_window(
	messages: &[ConversationMessage],
	window_size: usize,
) -> &[ConversationMessage] {
	let start = messages.len().saturating_sub(window_size);

	&messages[start..]
}

/// Joins message contents with newlines into the text sent to the embedder.
pub fn query_text(messages: &[ConversationMessage]) -> String {
	messages.iter().map(|message| message.content.as_str()).collect::<Vec<_>>().join("\n")
}
