//! Share links: a tactic carried in the `data` query parameter.

use url::Url;

use crate::codec;
use crate::foundation::error::{TacticError, TacticResult};
use crate::model::tactic::TacticState;

/// Query parameter that carries the encoded tactic.
pub const DATA_PARAM: &str = "data";

/// Build a share link for `state` on top of `base`.
///
/// Other query parameters on `base` are kept; an existing `data` parameter is replaced.
pub fn share_url(base: &str, state: &TacticState) -> TacticResult<Url> {
    let mut url =
        Url::parse(base).map_err(|e| TacticError::validation(format!("invalid base url: {e}")))?;
    let encoded = codec::encode(state)?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != DATA_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    {
        let mut q = url.query_pairs_mut();
        q.clear();
        q.extend_pairs(kept);
        q.append_pair(DATA_PARAM, &encoded);
    }
    Ok(url)
}

/// Restore the tactic carried by a share link.
///
/// No `data` parameter (or an empty one) yields the default full-court state; a payload that
/// fails to decode falls back the same way. Only an unparsable URL is an error.
pub fn restore_from_url(link: &str) -> TacticResult<TacticState> {
    let url =
        Url::parse(link).map_err(|e| TacticError::validation(format!("invalid share url: {e}")))?;
    let data = url
        .query_pairs()
        .find(|(k, _)| k == DATA_PARAM)
        .map(|(_, v)| v.into_owned());
    Ok(restore_from_query_value(data.as_deref()))
}

/// Restore from the raw value of the `data` parameter, if any.
pub fn restore_from_query_value(data: Option<&str>) -> TacticState {
    match data {
        Some(d) if !d.trim().is_empty() => codec::decode_or_default(d),
        _ => TacticState::default(),
    }
}
