//! Free-text lookup of Points and Paths.
//!
//! Scoring, per candidate object:
//!
//! | Match                                             | Score      |
//! |---------------------------------------------------|------------|
//! | term equals the object's ID (case-insensitive)    | +20        |
//! | each whole-word occurrence in a tag value         | +3         |
//! | each substring occurrence in a tag value          | +3         |
//!
//! A whole-word occurrence is also a substring occurrence, so it earns +6 in
//! total.  Matching on tag values is case-insensitive.

use gm_core::{GeoObject, ObjectId, ObjectStore, PointId, Tags};

use crate::{SpatialError, SpatialResult};

const ID_SCORE: u32 = 20;
const WORD_SCORE: u32 = 3;
const SUBSTRING_SCORE: u32 = 3;

/// One scored search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchHit {
    pub id:    ObjectId,
    pub score: u32,
}

/// Score every Point and Path against `term` and return the best `limit`
/// hits, highest score first, ties in ID order.  Objects scoring zero and
/// blank terms produce no hits.
pub fn search(store: &ObjectStore, term: &str, limit: usize) -> Vec<SearchHit> {
    let term = term.trim();
    if term.is_empty() || limit == 0 {
        return Vec::new();
    }
    let needle = term.to_lowercase();

    let mut hits: Vec<SearchHit> = store
        .iter()
        .filter_map(|(id, object)| {
            let tags = match object {
                GeoObject::Point(p) => &p.tags,
                GeoObject::Path(p) => &p.tags,
                _ => return None,
            };
            let score = score_object(id, tags, term, &needle);
            (score > 0).then_some(SearchHit { id, score })
        })
        .collect();

    hits.sort_unstable_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
    hits.truncate(limit);
    hits
}

fn score_object(id: ObjectId, tags: &Tags, term: &str, needle: &str) -> u32 {
    let mut score = 0;
    if id.to_string().eq_ignore_ascii_case(term) {
        score += ID_SCORE;
    }
    for value in tags.values() {
        let haystack = value.to_lowercase();
        for (start, matched) in haystack.match_indices(needle) {
            score += SUBSTRING_SCORE;
            if is_word_boundary(&haystack, start, start + matched.len()) {
                score += WORD_SCORE;
            }
        }
    }
    score
}

/// `true` if `haystack[start..end]` is not flanked by alphanumerics.
fn is_word_boundary(haystack: &str, start: usize, end: usize) -> bool {
    let before = haystack[..start].chars().next_back();
    let after = haystack[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// Resolve a search term to a single point: the best hit if it is a Point,
/// or the midpoint of the best hit if it is a Path.
pub fn resolve_term(store: &ObjectStore, term: &str) -> SpatialResult<PointId> {
    let no_match = || SpatialError::NoMatch { term: term.to_string() };
    let hit = search(store, term, 1).into_iter().next().ok_or_else(no_match)?;
    match hit.id {
        ObjectId::Point(id) => Ok(id),
        ObjectId::Path(id) => store.path(id).map(|path| path.midpoint()).ok_or_else(no_match),
        _ => Err(no_match()),
    }
}
