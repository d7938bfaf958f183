use qdrant_client::qdrant::{ScoredPoint, point_id::PointIdOptions};
use uuid::Uuid;

use notekeeper_storage::qdrant::QdrantStore;

use crate::{BoxFuture, Error, NoteIndex, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityMatch {
	pub note_id: Uuid,
	pub score: f32,
}

impl NoteIndex for QdrantStore {
	fn nearest<'a>(
		&'a self,
		vector: &'a [f32],
		user_id: &'a str,
		top_k: u32,
	) -> BoxFuture<'a, Result<Vec<SimilarityMatch>>> {
		Box::pin(async move {
			let points = self
				.nearest_for_owner(vector, user_id, top_k)
				.await
				.map_err(|err| Error::Retrieval { message: err.to_string() })?;

			Ok(matches_from_points(points))
		})
	}
}

/// Keeps the index's ordering. Points not keyed by a note UUID cannot be materialized and are
/// dropped.
pub(crate) fn matches_from_points(points: Vec<ScoredPoint>) -> Vec<SimilarityMatch> {
	let mut matches = Vec::with_capacity(points.len());

	for point in points {
		let raw_id = point.id.and_then(|id| id.point_id_options);
		let note_id = match raw_id {
			Some(PointIdOptions::Uuid(raw)) => Uuid::parse_str(&raw).ok(),
			Some(PointIdOptions::Num(_)) | None => None,
		};
		let Some(note_id) = note_id else {
			tracing::warn!(score = point.score, "Skipping vector match without a note UUID.");

			continue;
		};

		matches.push(SimilarityMatch { note_id, score: point.score });
	}

	matches
}
