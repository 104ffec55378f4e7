//! Movie record model.
//!
//! Defines the stored record, its server-assigned identifier, the genre
//! enumeration, and the two validated write shapes: a complete draft for
//! creation and a sparse patch for partial updates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Server-assigned movie identifier.
///
/// Always a random (v4) UUID rendered in lowercase hyphenated form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(Uuid);

impl MovieId {
    /// Generates a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its canonical text form.
    ///
    /// Only the lowercase hyphenated rendering is accepted, so a lookup by
    /// `{...}`, `urn:uuid:` or uppercase variants never aliases a stored id.
    pub fn parse(text: &str) -> Option<Self> {
        let uuid = Uuid::parse_str(text).ok()?;
        let id = Self(uuid);
        (id.to_string() == text).then_some(id)
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Fixed set of genres a movie may be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Comedy,
    Crime,
    Drama,
    Fantasy,
    Horror,
    Mystery,
    Thriller,
}

impl Genre {
    /// Every genre in declaration order.
    pub const ALL: [Genre; 9] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Comedy,
        Genre::Crime,
        Genre::Drama,
        Genre::Fantasy,
        Genre::Horror,
        Genre::Mystery,
        Genre::Thriller,
    ];

    /// Canonical wire name of the genre.
    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Comedy => "Comedy",
            Genre::Crime => "Crime",
            Genre::Drama => "Drama",
            Genre::Fantasy => "Fantasy",
            Genre::Horror => "Horror",
            Genre::Mystery => "Mystery",
            Genre::Thriller => "Thriller",
        }
    }

    /// Case-insensitive comparison used by list filtering.
    pub fn matches_ignore_case(self, query: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(query)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = String;

    /// Exact, case-sensitive parse. Payload genres must use canonical names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|genre| genre.as_str() == s)
            .ok_or_else(|| format!("Unknown genre: '{s}'"))
    }
}

/// A movie as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    pub year: u16,
    pub director: String,
    /// Running time in minutes
    pub duration: u32,
    pub poster: String,
    pub genre: Vec<Genre>,
    /// Rating out of 10. Whole ratings are written as JSON integers.
    #[serde(serialize_with = "serialize_rate")]
    pub rate: f64,
}

impl MovieRecord {
    /// Checks whether any of the record's genres matches `query`, ignoring case.
    pub fn has_genre(&self, query: &str) -> bool {
        self.genre.iter().any(|genre| genre.matches_ignore_case(query))
    }
}

fn serialize_rate<S: Serializer>(rate: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    // Ratings are validated to 0..=10, so the cast is exact for whole values
    if rate.fract() == 0.0 && (0.0..=10.0).contains(rate) {
        serializer.serialize_u8(*rate as u8)
    } else {
        serializer.serialize_f64(*rate)
    }
}

/// Complete, validated movie payload without an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDraft {
    pub title: String,
    pub year: u16,
    pub director: String,
    pub duration: u32,
    pub poster: String,
    pub genre: Vec<Genre>,
    pub rate: f64,
}

impl MovieDraft {
    /// Attaches an identifier, producing a storable record.
    pub fn into_record(self, id: MovieId) -> MovieRecord {
        MovieRecord {
            id,
            title: self.title,
            year: self.year,
            director: self.director,
            duration: self.duration,
            poster: self.poster,
            genre: self.genre,
            rate: self.rate,
        }
    }
}

/// Validated partial update. `None` fields are left untouched on merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub year: Option<u16>,
    pub director: Option<String>,
    pub duration: Option<u32>,
    pub poster: Option<String>,
    pub genre: Option<Vec<Genre>>,
    pub rate: Option<f64>,
}

impl MoviePatch {
    /// Returns true when the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the patch over `record`. The identifier is never touched.
    pub fn apply(self, record: &mut MovieRecord) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(year) = self.year {
            record.year = year;
        }
        if let Some(director) = self.director {
            record.director = director;
        }
        if let Some(duration) = self.duration {
            record.duration = duration;
        }
        if let Some(poster) = self.poster {
            record.poster = poster;
        }
        if let Some(genre) = self.genre {
            record.genre = genre;
        }
        if let Some(rate) = self.rate {
            record.rate = rate;
        }
    }

    /// Converts a fully populated patch into a draft.
    ///
    /// Returns `None` if any required field is missing.
    pub fn into_draft(self) -> Option<MovieDraft> {
        Some(MovieDraft {
            title: self.title?,
            year: self.year?,
            director: self.director?,
            duration: self.duration?,
            poster: self.poster?,
            genre: self.genre?,
            rate: self.rate.unwrap_or(0.0),
        })
    }
}
