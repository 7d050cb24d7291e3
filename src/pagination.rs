//! Listing pagination.
//!
//! Builds the listing envelope out of two store round-trips: an unlimited
//! count of the kind and a page of at most [`PAGE_SIZE`] items. The total
//! can therefore be stale relative to the page when writes interleave.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::store::Datastore;

pub const PAGE_SIZE: usize = 5;

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub total: usize,
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Echoes the cursor the client sent, not a computed prior page.
    #[serde(rename = "prev", skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

/// Assemble one page of `kind`, resuming after `cursor` when present.
/// `base_url` is the absolute collection URL the next/prev links extend.
pub async fn paginate<T>(
    store: &Datastore,
    kind: &'static str,
    base_url: &str,
    cursor: Option<&str>,
) -> Result<Page<T>>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    // Total is a raw count of the kind, not filtered by owner.
    let total = store.count(kind).await?;
    let page = store.query(kind, PAGE_SIZE, cursor).await?;

    let previous = cursor.map(|c| format!("{base_url}?cursor={c}"));
    let next = page
        .more
        .then(|| page.end_cursor.as_deref())
        .flatten()
        .map(|c| format!("{base_url}?cursor={c}"));

    Ok(Page {
        total,
        items: page.items,
        next,
        previous,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::migrations::run_migrations_for_tests;
    use crate::models::Exercise;
    use crate::store::EXERCISES;

    fn setup_store() -> Datastore {
        let pool = create_memory_pool().expect("Failed to create test database");
        run_migrations_for_tests(&pool).expect("Failed to run migrations");
        Datastore::new(pool)
    }

    async fn seed_exercises(store: &Datastore, n: usize) {
        for i in 0..n {
            let exercise = Exercise::new(
                format!("Exercise {i}"),
                "strength".to_string(),
                "none".to_string(),
                "alice".to_string(),
            );
            store.create(EXERCISES, &exercise).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_seven_records_split_five_and_two() {
        let store = setup_store();
        seed_exercises(&store, 7).await;

        let base = "http://localhost/exercises";
        let first: Page<Exercise> = paginate(&store, EXERCISES, base, None).await.unwrap();
        assert_eq!(first.total, 7);
        assert_eq!(first.items.len(), 5);
        assert!(first.previous.is_none());
        let next = first.next.expect("first page should link onward");

        let cursor = next.rsplit("cursor=").next().unwrap().to_string();
        let second: Page<Exercise> = paginate(&store, EXERCISES, base, Some(&cursor))
            .await
            .unwrap();
        assert_eq!(second.total, 7);
        assert_eq!(second.items.len(), 2);
        assert!(second.next.is_none());
    }

    #[tokio::test]
    async fn test_previous_echoes_incoming_cursor() {
        let store = setup_store();
        seed_exercises(&store, 7).await;

        let base = "http://localhost/exercises";
        let first: Page<Exercise> = paginate(&store, EXERCISES, base, None).await.unwrap();
        let cursor = first
            .next
            .unwrap()
            .rsplit("cursor=")
            .next()
            .unwrap()
            .to_string();

        let second: Page<Exercise> = paginate(&store, EXERCISES, base, Some(&cursor))
            .await
            .unwrap();
        assert_eq!(
            second.previous.as_deref(),
            Some(format!("{base}?cursor={cursor}").as_str())
        );
    }

    #[tokio::test]
    async fn test_exact_page_has_no_next() {
        let store = setup_store();
        seed_exercises(&store, 5).await;

        let first: Page<Exercise> = paginate(&store, EXERCISES, "http://h/exercises", None)
            .await
            .unwrap();
        assert_eq!(first.items.len(), 5);
        assert!(first.next.is_none());
    }

    #[tokio::test]
    async fn test_empty_kind() {
        let store = setup_store();

        let page: Page<Exercise> = paginate(&store, EXERCISES, "http://h/exercises", None)
            .await
            .unwrap();
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
    }
}
