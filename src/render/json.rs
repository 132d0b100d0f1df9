//! JSON structure dump of the parsed deck, for inspection and
//! regression tooling.

use crate::error::{Error, Result};
use crate::model::SlideDeck;

/// Serialize the deck model to JSON.
pub fn to_json(deck: &SlideDeck, pretty: bool) -> Result<String> {
    let result = if pretty {
        serde_json::to_string_pretty(deck)
    } else {
        serde_json::to_string(deck)
    };
    result.map_err(|e| Error::Render(e.to_string()))
}
