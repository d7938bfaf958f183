pub mod chat;
pub mod relay;
pub mod retrieval;

mod error;

pub use chat::ChatRequest;
pub use error::{Error, Result};
pub use relay::Relay;
pub use retrieval::SimilarityMatch;

use std::{future::Future, pin::Pin, sync::Arc};

use futures::{Stream, TryStreamExt};
use uuid::Uuid;

use notekeeper_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use notekeeper_domain::conversation::ConversationMessage;
use notekeeper_providers::{chat as provider_chat, embedding};
use notekeeper_storage::{db::Db, models::Note, qdrant::QdrantStore, queries};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Generated text fragments in production order.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

pub trait ChatProvider
where
	Self: Send + Sync,
{
	/// Resolves once the upstream stream is established; fragments arrive through the stream.
	fn stream_chat<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [ConversationMessage],
	) -> BoxFuture<'a, Result<FragmentStream>>;
}

/// Vector index holding one point per note.
pub trait NoteIndex
where
	Self: Send + Sync,
{
	/// Best-first matches among the notes owned by `user_id`. Ownership must be part of the
	/// query, not a filter over its results.
	fn nearest<'a>(
		&'a self,
		vector: &'a [f32],
		user_id: &'a str,
		top_k: u32,
	) -> BoxFuture<'a, Result<Vec<SimilarityMatch>>>;
}

pub trait NoteStore
where
	Self: Send + Sync,
{
	fn find_by_ids<'a>(
		&'a self,
		note_ids: &'a [Uuid],
		user_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<Note>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub chat: Arc<dyn ChatProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>, chat: Arc<dyn ChatProvider>) -> Self {
		Self { embedding, chat }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), chat: provider }
	}
}

pub struct ChatService {
	pub cfg: Config,
	pub providers: Providers,
	pub index: Arc<dyn NoteIndex>,
	pub store: Arc<dyn NoteStore>,
}
impl ChatService {
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore) -> Self {
		Self { cfg, providers: Providers::default(), index: Arc::new(qdrant), store: Arc::new(db) }
	}

	pub fn with_backends(
		cfg: Config,
		providers: Providers,
		index: Arc<dyn NoteIndex>,
		store: Arc<dyn NoteStore>,
	) -> Self {
		Self { cfg, providers, index, store }
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move {
			embedding::embed(cfg, texts)
				.await
				.map_err(|err| Error::Embedding { message: err.to_string() })
		})
	}
}
impl ChatProvider for DefaultProviders {
	fn stream_chat<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [ConversationMessage],
	) -> BoxFuture<'a, Result<FragmentStream>> {
		Box::pin(async move {
			let fragments = provider_chat::stream_chat(cfg, messages)
				.await
				.map_err(|err| Error::Generation { message: err.to_string() })?;
			let fragments: FragmentStream =
				Box::pin(fragments.map_err(|err| Error::Stream { message: err.to_string() }));

			Ok(fragments)
		})
	}
}

impl NoteStore for Db {
	fn find_by_ids<'a>(
		&'a self,
		note_ids: &'a [Uuid],
		user_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<Note>>> {
		Box::pin(async move {
			queries::find_notes_by_ids(&self.pool, note_ids, user_id)
				.await
				.map_err(|err| Error::Store { message: err.to_string() })
		})
	}
}
