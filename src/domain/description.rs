//! Proposal description payload.
//!
//! Proposals store their human text as a JSON string
//! `{"title": "...", "detail": "..."}` inside the on-chain description.
//! A payload that does not parse degrades to a placeholder title with the
//! raw text as detail; it never fails the page.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Title used when the payload has none.
pub const UNTITLED: &str = "Untitled proposal";

/// Parsed title and body of a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProposalDescription {
    /// Short headline.
    pub title: String,
    /// Long-form body.
    pub detail: String,
    /// `false` when the payload was malformed and a placeholder was used.
    pub well_formed: bool,
}

#[derive(Deserialize)]
struct Payload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl ProposalDescription {
    /// Parses the raw on-chain description.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Payload>(raw) {
            Ok(Payload { title, detail }) => {
                let title = title.filter(|t| !t.trim().is_empty());
                let well_formed = title.is_some() && detail.is_some();
                if !well_formed {
                    tracing::debug!("proposal description missing title or detail");
                }
                Self {
                    title: title.unwrap_or_else(|| UNTITLED.to_string()),
                    detail: detail.unwrap_or_default(),
                    well_formed,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "malformed proposal description");
                Self {
                    title: UNTITLED.to_string(),
                    detail: raw.to_string(),
                    well_formed: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_title_and_detail() {
        let desc = ProposalDescription::parse(r#"{"title":"T","detail":"D"}"#);
        assert_eq!(desc.title, "T");
        assert_eq!(desc.detail, "D");
        assert!(desc.well_formed);
    }

    #[test]
    fn plain_text_degrades_to_placeholder() {
        let desc = ProposalDescription::parse("Renovate the lobby");
        assert_eq!(desc.title, UNTITLED);
        assert_eq!(desc.detail, "Renovate the lobby");
        assert!(!desc.well_formed);
    }

    #[test]
    fn missing_fields_fill_in() {
        let desc = ProposalDescription::parse(r#"{"detail":"only body"}"#);
        assert_eq!(desc.title, UNTITLED);
        assert_eq!(desc.detail, "only body");
        assert!(!desc.well_formed);
    }

    #[test]
    fn non_object_json_degrades() {
        let desc = ProposalDescription::parse("[1,2,3]");
        assert_eq!(desc.title, UNTITLED);
        assert_eq!(desc.detail, "[1,2,3]");
    }
}
