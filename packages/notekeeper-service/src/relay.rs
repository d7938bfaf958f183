use std::{
	pin::Pin,
	task::{Context, Poll},
};

use futures::Stream;

use crate::{Error, FragmentStream, Result};

/// Forwards generated fragments to the transport one at a time.
///
/// The first upstream error is yielded once and ends the relay, so the transport aborts the
/// partially sent body instead of reporting a clean finish. Dropping the relay before it ends
/// drops the upstream stream with it.
pub struct Relay {
	upstream: FragmentStream,
	forwarded: usize,
	finished: bool,
}
impl Relay {
	pub fn new(upstream: FragmentStream) -> Self {
		Self { upstream, forwarded: 0, finished: false }
	}

	pub fn forwarded(&self) -> usize {
		self.forwarded
	}
}
impl Stream for Relay {
	type Item = Result<String>;

	fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
		loop {
			if self.finished {
				return Poll::Ready(None);
			}

			match self.upstream.as_mut().poll_next(cx) {
				Poll::Pending => return Poll::Pending,
				Poll::Ready(Some(Ok(fragment))) => {
					if fragment.is_empty() {
						continue;
					}

					self.forwarded += 1;

					return Poll::Ready(Some(Ok(fragment)));
				},
				Poll::Ready(Some(Err(err))) => {
					self.finished = true;

					tracing::error!(
						error = %err,
						forwarded = self.forwarded,
						"Generation stream failed after the response started."
					);

					let err = match err {
						Error::Stream { .. } => err,
						other => Error::Stream { message: other.to_string() },
					};

					return Poll::Ready(Some(Err(err)));
				},
				Poll::Ready(None) => {
					self.finished = true;

					tracing::info!(forwarded = self.forwarded, "Generation stream completed.");

					return Poll::Ready(None);
				},
			}
		}
	}
}
impl Drop for Relay {
	fn drop(&mut self) {
		if !self.finished {
			tracing::info!(
				forwarded = self.forwarded,
				"Client went away before the response completed; releasing the generation stream."
			);
		}
	}
}
