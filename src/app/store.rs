// src/app/store.rs
use crate::app::omdb::SearchHit;

/// One search result line backing the list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
}

impl ResultRow {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            image_url: image_url.into(),
        }
    }

    /// Description reads `"{year} ({type})"`, e.g. `1979 (movie)`.
    pub fn from_hit(hit: &SearchHit) -> Self {
        Self {
            id: hit.imdb_id.clone(),
            title: hit.title.clone(),
            description: format!("{} ({})", hit.year, hit.kind),
            image_url: hit.poster.clone(),
        }
    }

    pub fn has_poster(&self) -> bool {
        self.image_url.starts_with("http://") || self.image_url.starts_with("https://")
    }
}

/// Rows of the current search session, in fetch order.
#[derive(Debug, Default)]
pub struct ResultStore {
    rows: Vec<ResultRow>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Adds one fetched page. Ids already present in this session are skipped.
    pub fn append<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = ResultRow>,
    {
        for row in rows {
            if self.find(&row.id).is_none() {
                self.rows.push(row);
            }
        }
    }

    pub fn all(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn find(&self, id: &str) -> Option<&ResultRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
