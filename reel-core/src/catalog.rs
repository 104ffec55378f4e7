//! In-memory movie catalog.
//!
//! Keeps records in insertion order alongside an id → position index.
//! The catalog itself is not synchronized; share it as a [`SharedCatalog`]
//! and hold the write lock across any lookup-then-mutate sequence.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::movie::{MovieDraft, MovieId, MoviePatch, MovieRecord};

/// Catalog shared between request handlers.
pub type SharedCatalog = Arc<RwLock<MovieCatalog>>;

/// Errors raised while building a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Duplicate movie id: {id}")]
    DuplicateId { id: MovieId },
}

/// Ordered collection of movie records with unique identifiers.
#[derive(Debug, Default)]
pub struct MovieCatalog {
    movies: Vec<MovieRecord>,
    positions: HashMap<MovieId, usize>,
}

impl MovieCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from records, preserving their order.
    ///
    /// # Errors
    ///
    /// - `CatalogError::DuplicateId` - If two records share an identifier
    pub fn from_records(records: Vec<MovieRecord>) -> Result<Self, CatalogError> {
        let mut positions = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if positions.insert(record.id, position).is_some() {
                return Err(CatalogError::DuplicateId { id: record.id });
            }
        }

        Ok(Self {
            movies: records,
            positions,
        })
    }

    /// Wraps the catalog for sharing across handlers.
    pub fn into_shared(self) -> SharedCatalog {
        Arc::new(RwLock::new(self))
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Returns true when the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Iterates over records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MovieRecord> {
        self.movies.iter()
    }

    /// Returns a snapshot of all records, or of those tagged with `genre`.
    ///
    /// Genre matching ignores case. No match yields an empty list.
    pub fn list(&self, genre: Option<&str>) -> Vec<MovieRecord> {
        match genre {
            Some(genre) => self
                .movies
                .iter()
                .filter(|movie| movie.has_genre(genre))
                .cloned()
                .collect(),
            None => self.movies.clone(),
        }
    }

    /// Looks up a record by identifier.
    pub fn get(&self, id: MovieId) -> Option<&MovieRecord> {
        self.positions.get(&id).map(|&position| &self.movies[position])
    }

    /// Stores a validated draft under a fresh identifier at the end of the catalog.
    pub fn create(&mut self, draft: MovieDraft) -> MovieRecord {
        let id = self.fresh_id();
        let record = draft.into_record(id);

        self.positions.insert(id, self.movies.len());
        self.movies.push(record.clone());

        info!(%id, title = %record.title, "Movie created");
        record
    }

    /// Removes a record, keeping the relative order of the rest.
    ///
    /// Returns the removed record, or `None` if no record has `id`.
    pub fn delete(&mut self, id: MovieId) -> Option<MovieRecord> {
        let position = self.positions.remove(&id)?;
        let removed = self.movies.remove(position);

        for movie in &self.movies[position..] {
            if let Some(slot) = self.positions.get_mut(&movie.id) {
                *slot -= 1;
            }
        }

        info!(%id, title = %removed.title, "Movie deleted");
        Some(removed)
    }

    /// Merges `patch` over the record with `id`, in place.
    ///
    /// Returns the merged record, or `None` if no record has `id`.
    pub fn update(&mut self, id: MovieId, patch: MoviePatch) -> Option<MovieRecord> {
        let position = *self.positions.get(&id)?;
        let record = &mut self.movies[position];
        patch.apply(record);

        info!(%id, "Movie updated");
        Some(record.clone())
    }

    fn fresh_id(&self) -> MovieId {
        loop {
            let id = MovieId::random();
            if !self.positions.contains_key(&id) {
                return id;
            }
            debug!(%id, "Regenerating colliding movie id");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movie::Genre;

    fn draft(title: &str, genre: Vec<Genre>) -> MovieDraft {
        MovieDraft {
            title: title.to_string(),
            year: 2000,
            director: "Someone".to_string(),
            duration: 120,
            poster: "https://posters.reel.dev/poster.jpg".to_string(),
            genre,
            rate: 5.0,
        }
    }

    fn catalog_with(titles: &[&str]) -> (MovieCatalog, Vec<MovieId>) {
        let mut catalog = MovieCatalog::new();
        let ids = titles
            .iter()
            .map(|title| catalog.create(draft(title, vec![Genre::Drama])).id)
            .collect();
        (catalog, ids)
    }

    fn titles(catalog: &MovieCatalog) -> Vec<String> {
        catalog.iter().map(|movie| movie.title.clone()).collect()
    }

    #[test]
    fn test_create_appends_with_fresh_id() {
        let (mut catalog, ids) = catalog_with(&["First", "Second"]);
        let created = catalog.create(draft("Third", vec![Genre::Comedy]));

        assert_eq!(catalog.len(), 3);
        assert!(!ids.contains(&created.id));
        assert_eq!(catalog.iter().last().unwrap(), &created);
        assert_eq!(catalog.get(created.id), Some(&created));
    }

    #[test]
    fn test_duplicate_titles_are_allowed() {
        let (catalog, ids) = catalog_with(&["Same", "Same"]);

        assert_eq!(catalog.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_list_filters_by_genre_ignoring_case() {
        let mut catalog = MovieCatalog::new();
        catalog.create(draft("Heat", vec![Genre::Crime, Genre::Drama]));
        catalog.create(draft("Alien", vec![Genre::Horror]));
        catalog.create(draft("Se7en", vec![Genre::Crime, Genre::Mystery]));

        let crime: Vec<_> = catalog
            .list(Some("cRiMe"))
            .into_iter()
            .map(|movie| movie.title)
            .collect();
        assert_eq!(crime, vec!["Heat", "Se7en"]);
        assert!(catalog.list(Some("western")).is_empty());
        assert_eq!(catalog.list(None).len(), 3);
    }

    #[test]
    fn test_delete_preserves_order_and_index() {
        let (mut catalog, ids) = catalog_with(&["A", "B", "C", "D"]);

        let removed = catalog.delete(ids[1]).unwrap();
        assert_eq!(removed.title, "B");
        assert_eq!(titles(&catalog), vec!["A", "C", "D"]);

        // Positions after the removed record must still resolve
        assert_eq!(catalog.get(ids[2]).unwrap().title, "C");
        assert_eq!(catalog.get(ids[3]).unwrap().title, "D");
        assert!(catalog.delete(ids[1]).is_none());
        assert!(catalog.get(ids[1]).is_none());
    }

    #[test]
    fn test_update_merges_in_place() {
        let (mut catalog, ids) = catalog_with(&["A", "B", "C"]);

        let updated = catalog
            .update(
                ids[1],
                MoviePatch {
                    rate: Some(9.5),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, ids[1]);
        assert_eq!(updated.title, "B");
        assert_eq!(updated.rate, 9.5);
        assert_eq!(titles(&catalog), vec!["A", "B", "C"]);
        assert_eq!(catalog.get(ids[1]), Some(&updated));
    }

    #[test]
    fn test_update_unknown_id_changes_nothing() {
        let (mut catalog, _) = catalog_with(&["A"]);
        let before = catalog.list(None);

        let patch = MoviePatch {
            title: Some("Changed".to_string()),
            ..Default::default()
        };
        assert!(catalog.update(MovieId::random(), patch).is_none());
        assert_eq!(catalog.list(None), before);
    }

    #[test]
    fn test_from_records_rejects_duplicate_ids() {
        let id = MovieId::random();
        let records = vec![
            draft("A", vec![Genre::Drama]).into_record(id),
            draft("B", vec![Genre::Drama]).into_record(id),
        ];

        let error = MovieCatalog::from_records(records).unwrap_err();
        assert!(matches!(error, CatalogError::DuplicateId { id: dup } if dup == id));
    }
}
