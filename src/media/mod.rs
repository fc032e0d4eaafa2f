//! Media records and the predicates used to filter them

mod types;

pub use types::{
    Caption, Counter, Image, Images, Location, MediaItem, MediaResponse, MediaUser, Meta,
    Pagination,
};

use crate::engine::AcceptancePredicate;
use types::normalize_tag;

/// Accepts an item only if it carries every one of `tags`
///
/// Tag searches fan out one lineage per tag, so without this filter the output
/// would be the union of the tags rather than their intersection.
pub fn has_all_tags(tags: &[String]) -> AcceptancePredicate<MediaItem> {
    let wanted: Vec<String> = tags.iter().map(|tag| normalize_tag(tag)).collect();
    AcceptancePredicate::new(move |item: &MediaItem| wanted.iter().all(|tag| item.has_tag(tag)))
}

/// Accepts every item
pub fn accept_all() -> AcceptancePredicate<MediaItem> {
    AcceptancePredicate::accept_all()
}
