pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures of the chat pipeline.
///
/// Every variant except [`Error::Stream`] happens before any response byte is sent.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Embedding provider error: {message}")]
	Embedding { message: String },
	#[error("Retrieval error: {message}")]
	Retrieval { message: String },
	#[error("Note store error: {message}")]
	Store { message: String },
	#[error("Generation error: {message}")]
	Generation { message: String },
	#[error("Generation stream failed: {message}")]
	Stream { message: String },
}
