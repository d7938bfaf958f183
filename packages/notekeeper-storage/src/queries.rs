use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{Result, models::Note};

/// Batch lookup of notes by id, restricted to `owner_id`.
///
/// Ids that no longer exist or belong to someone else are simply absent from the result.
pub async fn find_notes_by_ids<'e, E>(
	executor: E,
	note_ids: &[Uuid],
	owner_id: &str,
) -> Result<Vec<Note>>
where
	E: Executor<'e, Database = Postgres>,
{
	if note_ids.is_empty() {
		return Ok(Vec::new());
	}

	let notes = sqlx::query_as::<_, Note>(
		"\
SELECT note_id, owner_id, title, content, created_at, updated_at
FROM notes
WHERE note_id = ANY($1) AND owner_id = $2",
	)
	.bind(note_ids)
	.bind(owner_id)
	.fetch_all(executor)
	.await?;

	Ok(notes)
}
