use std::{collections::VecDeque, pin::Pin, time::Duration};

use futures::{Stream, StreamExt, stream};
use reqwest::{Client, header::ACCEPT};
use serde_json::Value;

use notekeeper_domain::conversation::ConversationMessage;

use crate::{
	Error, Result,
	sse::{SseData, SseDecoder},
};

/// Lazy sequence of generated text fragments. Ends when the model signals completion.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Opens a streamed chat completion.
///
/// Only stream setup is bounded by `timeout_ms`; once headers arrive the body is read for as
/// long as the model keeps producing.
pub async fn stream_chat(
	cfg: &notekeeper_config::LlmProviderConfig,
	messages: &[ConversationMessage],
) -> Result<FragmentStream> {
	let setup_timeout = Duration::from_millis(cfg.timeout_ms);
	let client = Client::builder().connect_timeout(setup_timeout).build()?;
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"stream": true,
		"messages": messages,
	});
	let request = client
		.post(crate::endpoint(&cfg.api_base, &cfg.path))
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.header(ACCEPT, "text/event-stream")
		.json(&body)
		.send();
	let res = tokio::time::timeout(setup_timeout, request)
		.await
		.map_err(|_| Error::Timeout { timeout_ms: cfg.timeout_ms })??;
	let res = res.error_for_status()?;

	tracing::debug!(
		provider_id = %cfg.provider_id,
		model = %cfg.model,
		status = %res.status(),
		"Chat completion stream opened."
	);

	Ok(fragments(res.bytes_stream()))
}

/// Turns a raw event-stream body into text fragments.
pub fn fragments<S, B, E>(body: S) -> FragmentStream
where
	S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
	B: AsRef<[u8]> + Send + 'static,
	E: Into<Error> + Send + 'static,
{
	let state = FragmentState {
		body: Box::pin(body),
		decoder: SseDecoder::default(),
		pending: VecDeque::new(),
		done: false,
	};

	Box::pin(stream::unfold(state, |mut state| async move {
		loop {
			if let Some(fragment) = state.pending.pop_front() {
				return Some((Ok(fragment), state));
			}
			if state.done {
				return None;
			}

			let events = match state.body.next().await {
				Some(Ok(chunk)) => state.decoder.push(chunk.as_ref()),
				Some(Err(err)) => Err(err.into()),
				None => {
					state.done = true;

					state.decoder.finish().map(|event| event.into_iter().collect())
				},
			};

			if let Err(err) = events.and_then(|events| state.absorb(events)) {
				state.done = true;
				state.pending.clear();

				return Some((Err(err), state));
			}
		}
	}))
}

struct FragmentState<S> {
	body: Pin<Box<S>>,
	decoder: SseDecoder,
	pending: VecDeque<String>,
	done: bool,
}
impl<S> FragmentState<S> {
	fn absorb(&mut self, events: Vec<SseData>) -> Result<()> {
		for event in events {
			match event {
				SseData::Done => {
					self.done = true;

					break;
				},
				SseData::Payload(payload) =>
					if let Some(fragment) = parse_delta(&payload)? {
						self.pending.push_back(fragment);
					},
			}
		}

		Ok(())
	}
}

fn parse_delta(payload: &str) -> Result<Option<String>> {
	let json: Value = serde_json::from_str(payload)?;

	if let Some(err) = json.get("error") {
		let message = err.get("message").and_then(Value::as_str).unwrap_or("unknown error");

		return Err(Error::InvalidResponse {
			message: format!("Chat completion stream reported an error: {message}"),
		});
	}

	let content = json
		.get("choices")
		.and_then(Value::as_array)
		.and_then(|choices| choices.first())
		.and_then(|choice| choice.get("delta"))
		.and_then(|delta| delta.get("content"))
		.and_then(Value::as_str)
		.filter(|content| !content.is_empty());

	Ok(content.map(str::to_string))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_delta_content() {
		let payload = r#"{"choices":[{"index":0,"delta":{"content":"Hello"}}]}"#;

		assert_eq!(parse_delta(payload).expect("parse failed").as_deref(), Some("Hello"));
	}

	#[test]
	fn role_only_and_finish_deltas_carry_no_text() {
		let role = r#"{"choices":[{"delta":{"role":"assistant"}}]}"#;
		let finish = r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#;

		assert_eq!(parse_delta(role).expect("parse failed"), None);
		assert_eq!(parse_delta(finish).expect("parse failed"), None);
	}

	#[test]
	fn error_payload_fails() {
		let payload = r#"{"error":{"message":"overloaded"}}"#;
		let err = parse_delta(payload).expect_err("Expected stream error.");

		assert!(err.to_string().contains("overloaded"), "Unexpected error: {err}");
	}
}
