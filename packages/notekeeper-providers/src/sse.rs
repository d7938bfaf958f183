//! Line decoder for `text/event-stream` bodies as sent by chat completion APIs.
//!
//! Each `data:` line is one event. Other fields, comments and blank lines carry nothing the
//! chat stream needs and are dropped.

use std::mem;

use crate::{Error, Result};

const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseData {
	Payload(String),
	Done,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
	buffer: Vec<u8>,
}
impl SseDecoder {
	/// Feeds a body chunk and returns every event completed by it.
	pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<SseData>> {
		self.buffer.extend_from_slice(chunk);

		let mut events = Vec::new();

		while let Some(pos) = self.buffer.iter().position(|byte| *byte == b'\n') {
			let line = self.buffer.drain(..=pos).collect::<Vec<_>>();

			if let Some(event) = decode_line(&line)? {
				events.push(event);
			}
		}

		Ok(events)
	}

	/// Decodes a trailing line left without a terminating newline.
	pub fn finish(&mut self) -> Result<Option<SseData>> {
		let rest = mem::take(&mut self.buffer);

		decode_line(&rest)
	}
}

fn decode_line(raw: &[u8]) -> Result<Option<SseData>> {
	let line = std::str::from_utf8(raw).map_err(|_| Error::InvalidResponse {
		message: "Event stream line is not valid UTF-8.".to_string(),
	})?;
	let line = line.trim_end_matches(['\r', '\n']);
	let Some(data) = line.strip_prefix("data:") else {
		return Ok(None);
	};
	let data = data.strip_prefix(' ').unwrap_or(data);

	if data == DONE_SENTINEL {
		return Ok(Some(SseData::Done));
	}

	Ok(Some(SseData::Payload(data.to_string())))
}
