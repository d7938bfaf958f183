mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Chat, Config, EmbeddingProviderConfig, LlmProviderConfig, Postgres, Providers, Qdrant,
	Security, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::Parse { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);
	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::validation("service.http_bind must be non-empty."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::validation("storage.postgres.pool_max_conns must be greater than zero."));
	}
	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(Error::validation("storage.qdrant.collection must be non-empty."));
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::validation(
			"providers.embedding.dimensions must be greater than zero.",
		));
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::validation(
			"providers.embedding.dimensions must match storage.qdrant.vector_dim.",
		));
	}
	if !cfg.providers.llm.temperature.is_finite() || cfg.providers.llm.temperature < 0.0 {
		return Err(Error::validation(
			"providers.llm.temperature must be a finite number, zero or greater.",
		));
	}

	for (label, timeout_ms) in [
		("embedding", cfg.providers.embedding.timeout_ms),
		("llm", cfg.providers.llm.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::validation(format!(
				"Provider {label} timeout_ms must be greater than zero."
			)));
		}
	}
	for (label, provider_id, key) in [
		("embedding", &cfg.providers.embedding.provider_id, &cfg.providers.embedding.api_key),
		("llm", &cfg.providers.llm.provider_id, &cfg.providers.llm.api_key),
	] {
		if provider_id.trim().is_empty() {
			return Err(Error::validation(format!(
				"Provider {label} provider_id must be non-empty."
			)));
		}
		if key.trim().is_empty() {
			return Err(Error::validation(format!("Provider {label} api_key must be non-empty.")));
		}
	}

	if cfg.chat.window_size == 0 {
		return Err(Error::validation("chat.window_size must be greater than zero."));
	}
	if cfg.chat.top_k == 0 {
		return Err(Error::validation("chat.top_k must be greater than zero."));
	}

	let header = cfg.security.user_id_header.as_str();

	if header.is_empty()
		|| !header.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
	{
		return Err(Error::validation(
			"security.user_id_header must be a non-empty HTTP header name.",
		));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.storage.qdrant.vector_name.as_deref().map(|name| name.trim().is_empty()).unwrap_or(false)
	{
		cfg.storage.qdrant.vector_name = None;
	}
	if cfg
		.security
		.default_user_id
		.as_deref()
		.map(|user_id| user_id.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.security.default_user_id = None;
	}

	cfg.security.user_id_header = cfg.security.user_id_header.trim().to_ascii_lowercase();
}
