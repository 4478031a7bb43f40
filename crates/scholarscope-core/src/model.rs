//! Report payload types returned by the analysis service, plus the
//! summary record kept in the history store.
//!
//! The service is a pandas pipeline, so integer-valued fields occasionally
//! arrive as floats (`12.0`) or `null`. Numeric fields are decoded leniently
//! instead of failing the whole report.

use serde::{Deserialize, Deserializer, Serialize};

/// Category used for papers with no venue.
pub const UNKNOWN_VENUE: &str = "Unknown";

/// Scholar profile header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub affiliations: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub academic_age: u64,
}

/// Bibliometric scalars computed upstream. Treated as opaque; missing or
/// `null` values read as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metrics {
    #[serde(deserialize_with = "lenient_scalar")]
    pub total_c: f64,
    #[serde(deserialize_with = "lenient_scalar")]
    pub total_p: f64,
    #[serde(deserialize_with = "lenient_scalar")]
    pub recent_c: f64,
    #[serde(deserialize_with = "lenient_scalar")]
    pub recent_p: f64,
    #[serde(deserialize_with = "lenient_scalar")]
    pub h_index: f64,
    #[serde(deserialize_with = "lenient_scalar")]
    pub i10_index: f64,
    #[serde(deserialize_with = "lenient_scalar")]
    pub g_index: f64,
    /// Average citations per paper.
    #[serde(deserialize_with = "lenient_scalar")]
    pub cpp: f64,
    /// Unique co-authors.
    #[serde(deserialize_with = "lenient_scalar")]
    pub network_size: f64,
    /// Percentage of first/solo-author papers.
    #[serde(deserialize_with = "lenient_scalar")]
    pub leadership_score: f64,
    /// Percentage of citations coming from the single most cited paper.
    #[serde(deserialize_with = "lenient_scalar")]
    pub one_hit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub title: String,
    #[serde(default, deserialize_with = "lenient_year")]
    pub year: Option<i32>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub author_pos: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub citations: u64,
}

impl Paper {
    /// Venue used for grouping and filtering. Missing or empty venues
    /// collapse into [`UNKNOWN_VENUE`].
    pub fn venue_label(&self) -> &str {
        match self.venue.as_deref() {
            Some(v) if !v.is_empty() => v,
            _ => UNKNOWN_VENUE,
        }
    }

    /// Whether the venue rank is a top-tier one (CORE A* or a Q1 journal).
    pub fn is_top_ranked(&self) -> bool {
        self.rank
            .as_deref()
            .is_some_and(|r| r.contains("A*") || r.contains("Q1"))
    }
}

/// A complete analysis result. Replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub profile: Profile,
    pub metrics: Metrics,
    #[serde(default)]
    pub papers: Vec<Paper>,
}

/// User-curated summary of a [`Report`], persisted in the history list.
///
/// Key names match the stored JSON layout (`userRating`, `userComment`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub total_c: f64,
    #[serde(default)]
    pub h_index: f64,
    #[serde(default)]
    pub affiliations: Option<String>,
    /// 0 = not yet rated, otherwise 1..=5.
    #[serde(rename = "userRating", default)]
    pub user_rating: u8,
    #[serde(rename = "userComment", default)]
    pub user_comment: String,
    /// ISO-8601 save timestamp.
    pub date: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Int(i64),
    Float(f64),
}

fn lenient_count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    Ok(match Option::<Number>::deserialize(d)? {
        Some(Number::Int(n)) => n.max(0) as u64,
        Some(Number::Float(f)) if f.is_finite() && f > 0.0 => f.round() as u64,
        _ => 0,
    })
}

fn lenient_scalar<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(match Option::<Number>::deserialize(d)? {
        Some(Number::Int(n)) => n as f64,
        Some(Number::Float(f)) if f.is_finite() => f,
        _ => 0.0,
    })
}

fn lenient_year<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
    Ok(match Option::<Number>::deserialize(d)? {
        Some(Number::Int(n)) => i32::try_from(n).ok(),
        Some(Number::Float(f)) if f.is_finite() => Some(f.round() as i32),
        _ => None,
    })
}
