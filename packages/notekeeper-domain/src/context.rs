use crate::conversation::ConversationMessage;

pub const GROUNDING_PREAMBLE: &str = "You are an intelligent note-taking app. You answer the user's question based on their existing notes. The relevant notes for this query are:\n";

const NOTE_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteExcerpt<'a> {
	pub title: &'a str,
	pub content: &'a str,
}

/// Builds the system message that grounds the model in the given notes.
///
/// With no notes the preamble is still emitted so the model keeps its note-assistant role.
pub fn grounded_context<'a, I>(notes: I) -> ConversationMessage
where
	I: IntoIterator<Item = NoteExcerpt<'a>>,
{
	let mut content = String::from(GROUNDING_PREAMBLE);

	for (i, note) in notes.into_iter().enumerate() {
		if i > 0 {
			content.push_str(NOTE_SEPARATOR);
		}

		content.push_str("Title: ");
		content.push_str(note.title);
		content.push_str("\n\nContent:\n");
		content.push_str(note.content);
	}

	ConversationMessage::system(content)
}

/// Prepends the grounding message to the conversation window.
pub fn generation_messages(
	context: ConversationMessage,
	window: &[ConversationMessage],
) -> Vec<ConversationMessage> {
	let mut messages = Vec::with_capacity(window.len() + 1);

	messages.push(context);
	messages.extend_from_slice(window);

	messages
}
