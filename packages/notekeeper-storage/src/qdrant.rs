use qdrant_client::qdrant::{Condition, Filter, Query, QueryPointsBuilder, ScoredPoint};

use crate::Result;

/// Payload key the indexer stores the owning user's id under.
pub const OWNER_PAYLOAD_KEY: &str = "userId";

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_name: Option<String>,
}
impl QdrantStore {
	pub fn new(cfg: &notekeeper_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self {
			client,
			collection: cfg.collection.clone(),
			vector_name: cfg.vector_name.clone(),
		})
	}

	/// Nearest points to `vector` among those owned by `owner_id`, best first.
	///
	/// The owner filter is part of the query so other users' points are never scored.
	pub async fn nearest_for_owner(
		&self,
		vector: &[f32],
		owner_id: &str,
		limit: u32,
	) -> Result<Vec<ScoredPoint>> {
		let mut search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector.to_vec()))
			.filter(owner_filter(owner_id))
			.limit(limit as u64)
			.with_payload(false);

		if let Some(name) = self.vector_name.as_deref() {
			search = search.using(name);
		}

		let response = self.client.query(search).await?;

		Ok(response.result)
	}
}

pub fn owner_filter(owner_id: &str) -> Filter {
	Filter::must([Condition::matches(OWNER_PAYLOAD_KEY, owner_id.to_string())])
}

#[cfg(test)]
mod tests {
	use qdrant_client::qdrant::{condition::ConditionOneOf, r#match::MatchValue};

	use super::*;

	#[test]
	fn owner_filter_matches_the_indexed_user_id_key() {
		let filter = owner_filter("user_a");

		assert_eq!(filter.must.len(), 1);
		assert!(filter.should.is_empty());
		assert!(filter.must_not.is_empty());

		let Some(ConditionOneOf::Field(field)) = &filter.must[0].condition_one_of else {
			panic!("Expected a field condition, got {:?}.", filter.must[0]);
		};

		assert_eq!(field.key, "userId");

		let value = field.r#match.as_ref().and_then(|m| m.match_value.as_ref());

		assert_eq!(value, Some(&MatchValue::Keyword("user_a".to_string())));
	}
}
