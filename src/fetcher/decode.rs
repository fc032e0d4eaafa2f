//! JSON page decoding

use crate::engine::{Page, PageRequest};
use crate::media::{MediaItem, MediaResponse};
use thiserror::Error;

/// A page body that could not be decoded
#[derive(Debug, Error)]
#[error("malformed page payload: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Decodes a raw body into the full API response envelope
pub fn decode_response(bytes: &[u8]) -> Result<MediaResponse, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Decodes a raw body into a page of items and its continuation
///
/// An absent or empty `next_url` means the lineage has no further pages.
pub fn decode_page(bytes: &[u8]) -> Result<Page<MediaItem>, DecodeError> {
    let response = decode_response(bytes)?;
    Ok(into_page(response))
}

pub(crate) fn into_page(response: MediaResponse) -> Page<MediaItem> {
    let next = response
        .pagination
        .next_url
        .filter(|url| !url.is_empty())
        .map(PageRequest::new);
    Page::new(response.data, next)
}
