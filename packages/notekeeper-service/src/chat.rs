use serde::Deserialize;
use uuid::Uuid;

use notekeeper_domain::{
	context::{self, NoteExcerpt},
	conversation::{self, ConversationMessage},
};
use notekeeper_storage::models::Note;

use crate::{ChatService, Error, Relay, Result, SimilarityMatch};

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
	pub messages: Vec<ConversationMessage>,
}

impl ChatService {
	/// Answers the conversation from the caller's notes.
	///
	/// Returns once generation has started. Errors returned here happen before any output is
	/// produced; later failures surface through the relay.
	pub async fn chat(&self, user_id: &str, req: ChatRequest) -> Result<Relay> {
		if user_id.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "user_id must be non-empty.".to_string() });
		}
		if req.messages.is_empty() {
			return Err(Error::InvalidRequest {
				message: "messages must contain at least one message.".to_string(),
			});
		}

		let window =
			conversation::truncate_window(&req.messages, self.cfg.chat.window_size as usize);
		let vector = self.embed_query(window).await?;
		let matches = self.index.nearest(&vector, user_id, self.cfg.chat.top_k).await?;
		let notes = self.materialize(&matches, user_id).await?;
		let grounding = context::grounded_context(
			notes.iter().map(|note| NoteExcerpt { title: &note.title, content: &note.content }),
		);
		let messages = context::generation_messages(grounding, window);

		tracing::info!(
			user_id,
			window = window.len(),
			matches = matches.len(),
			notes = notes.len(),
			"Starting grounded generation."
		);

		let fragments =
			self.providers.chat.stream_chat(&self.cfg.providers.llm, &messages).await?;

		Ok(Relay::new(fragments))
	}

	async fn embed_query(&self, window: &[ConversationMessage]) -> Result<Vec<f32>> {
		let cfg = &self.cfg.providers.embedding;
		let texts = vec![conversation::query_text(window)];
		let mut vectors = self.providers.embedding.embed(cfg, &texts).await?;
		let Some(vector) = vectors.pop() else {
			return Err(Error::Embedding {
				message: "Embedding provider returned no vectors.".to_string(),
			});
		};

		if vector.len() != self.cfg.storage.qdrant.vector_dim as usize {
			return Err(Error::Embedding {
				message: format!(
					"Embedding vector has {} dimensions; expected {}.",
					vector.len(),
					self.cfg.storage.qdrant.vector_dim
				),
			});
		}

		Ok(vector)
	}

	/// Loads matched notes in similarity order.
	///
	/// Notes deleted since indexing are skipped. Notes owned by anyone but `user_id` are dropped
	/// even if the store returns them.
	async fn materialize(&self, matches: &[SimilarityMatch], user_id: &str) -> Result<Vec<Note>> {
		if matches.is_empty() {
			return Ok(Vec::new());
		}

		let note_ids = matches.iter().map(|m| m.note_id).collect::<Vec<_>>();
		let mut notes = self.store.find_by_ids(&note_ids, user_id).await?;
		let returned = notes.len();

		notes.retain(|note| note.owner_id == user_id);

		if notes.len() < returned {
			tracing::warn!(
				user_id,
				dropped = returned - notes.len(),
				"Note store returned notes owned by another user."
			);
		}

		notes.sort_by_key(|note| rank_of(&note_ids, note.note_id));
		notes.dedup_by_key(|note| note.note_id);

		if notes.len() < note_ids.len() {
			tracing::debug!(
				matched = note_ids.len(),
				found = notes.len(),
				"Some matched notes could not be loaded."
			);
		}

		Ok(notes)
	}
}

fn rank_of(note_ids: &[Uuid], note_id: Uuid) -> usize {
	note_ids.iter().position(|id| *id == note_id).unwrap_or(note_ids.len())
}
