use std::sync::Arc;

use notekeeper_service::ChatService;
use notekeeper_storage::{db::Db, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ChatService>,
}
impl AppState {
	pub async fn new(config: notekeeper_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;
		let qdrant = QdrantStore::new(&config.storage.qdrant)?;

		Ok(Self::from_service(ChatService::new(config, db, qdrant)))
	}

	pub fn from_service(service: ChatService) -> Self {
		Self { service: Arc::new(service) }
	}
}
