// Wire schemas for the catalog API. Decoding is strict: a missing or
// mismatched field fails the whole record, never yielding a partial value.

use serde::Deserialize;

/// Pagination cursor embedded in every collection envelope. `next` and
/// `previous`, when present, are complete URLs dispatchable as-is; pages
/// are never reconstructed from page numbers.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PageInfo {
    pub count: u32,
    pub pages: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

/// One page of a collection: the cursor plus its ordered results.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub info: PageInfo,
    pub results: Vec<T>,
}

/// Name/URL pair pointing at another resource.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ResourceRef {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Character {
    pub name: String,
    pub status: String,
    pub species: String,
    pub origin: ResourceRef,
    pub location: ResourceRef,
    pub image: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub dimension: String,
    pub residents: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Episode {
    pub name: String,
    pub air_date: String,
    pub episode: String,
    pub url: String,
    pub characters: Vec<String>,
}
