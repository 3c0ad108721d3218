//! Keyword-window section extraction.
//!
//! Locates named sections in raw document text by searching for marker
//! keywords. A section runs from just after its keyword up to the next
//! marker found later in the text, or to the end of the document.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    #[error("marker keyword for section '{0}' is empty")]
    EmptyKeyword(String),
    #[error("duplicate marker keyword: {0}")]
    DuplicateKeyword(String),
    #[error("marker keyword '{0}' has leading or trailing whitespace")]
    PaddedKeyword(String),
}

/// Sections looked up in every RFP, in document order.
pub const DEFAULT_MARKERS: &[(&str, &str)] = &[
    ("Goals", "Goals"),
    ("Deliverables", "Deliverables"),
    ("Timeline", "Timeline"),
    ("Evaluation Criteria", "Evaluation Criteria"),
];

/// A named section and the keyword that starts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    pub keyword: String,
}

impl Marker {
    pub fn new(name: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keyword: keyword.into(),
        }
    }

    /// Markers whose section name doubles as the keyword
    pub fn from_names<I, S>(names: I) -> Vec<Marker>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|n| Marker::new(n.as_ref(), n.as_ref()))
            .collect()
    }

    /// The built-in RFP marker list
    pub fn defaults() -> Vec<Marker> {
        DEFAULT_MARKERS
            .iter()
            .map(|(name, keyword)| Marker::new(*name, *keyword))
            .collect()
    }
}

/// Check a marker list before it is used for extraction.
pub fn validate_markers(markers: &[Marker]) -> Result<(), ExtractError> {
    let mut seen: Vec<String> = Vec::with_capacity(markers.len());
    for marker in markers {
        if marker.keyword.trim().is_empty() {
            return Err(ExtractError::EmptyKeyword(marker.name.clone()));
        }
        if marker.keyword.trim() != marker.keyword {
            return Err(ExtractError::PaddedKeyword(marker.keyword.clone()));
        }
        let folded = marker.keyword.to_ascii_lowercase();
        if seen.contains(&folded) {
            return Err(ExtractError::DuplicateKeyword(marker.keyword.clone()));
        }
        seen.push(folded);
    }
    Ok(())
}

/// Section name to extracted text, kept in marker order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyDetails {
    entries: Vec<(String, String)>,
}

impl KeyDetails {
    /// Text extracted for a section, `None` if the section was never configured
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, text)| text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of sections whose keyword was found with some text after it
    pub fn found(&self) -> usize {
        self.entries.iter().filter(|(_, t)| !t.is_empty()).count()
    }
}

impl Serialize for KeyDetails {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, text) in &self.entries {
            map.serialize_entry(name, text)?;
        }
        map.end()
    }
}

/// Extract one text window per marker.
///
/// Only the first occurrence of each keyword is considered. Matching ignores
/// case for ASCII letters only, so `Évaluation` does not match `évaluation`.
/// A window is cut short by the earliest first occurrence of any other marker
/// that lies after the window start. Missing keywords yield an empty string.
pub fn extract_key_details(text: &str, markers: &[Marker]) -> KeyDetails {
    // ASCII folding keeps byte offsets aligned with `text`.
    let haystack = text.to_ascii_lowercase();

    let positions: Vec<Option<usize>> = markers
        .iter()
        .map(|m| {
            let needle = m.keyword.to_ascii_lowercase();
            if needle.is_empty() {
                None
            } else {
                haystack.find(&needle)
            }
        })
        .collect();

    let entries = markers
        .iter()
        .enumerate()
        .map(|(idx, marker)| {
            let content = match positions[idx] {
                Some(pos) => {
                    let start = content_start(text, pos + marker.keyword.len());
                    let end = positions
                        .iter()
                        .enumerate()
                        .filter(|(other, _)| *other != idx)
                        .filter_map(|(_, p)| *p)
                        .filter(|p| *p >= start)
                        .min()
                        .unwrap_or(text.len());
                    text[start..end].to_string()
                }
                None => {
                    log::debug!("marker '{}' not found", marker.keyword);
                    String::new()
                }
            };
            (marker.name.clone(), content)
        })
        .collect();

    KeyDetails { entries }
}

/// Skip a single `:` and the whitespace that follows a keyword
fn content_start(text: &str, after_keyword: usize) -> usize {
    let rest = &text[after_keyword..];
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    let skipped = rest.len() - rest.trim_start().len();
    text.len() - rest.len() + skipped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers(names: &[&str]) -> Vec<Marker> {
        Marker::from_names(names.iter().copied())
    }

    #[test]
    fn test_two_sections() {
        let text = "Goals: Increase revenue. Deliverables: Ship report.";
        let details = extract_key_details(text, &markers(&["Goals", "Deliverables"]));
        assert_eq!(details.get("Goals"), Some("Increase revenue. "));
        assert_eq!(details.get("Deliverables"), Some("Ship report."));
    }

    #[test]
    fn test_missing_marker_is_empty() {
        let text = "Goals: Grow. Timeline: Q3.";
        let details = extract_key_details(text, &Marker::defaults());
        assert_eq!(details.len(), 4);
        assert_eq!(details.get("Deliverables"), Some(""));
        assert_eq!(details.get("Evaluation Criteria"), Some(""));
        assert_eq!(details.get("Goals"), Some("Grow. "));
        assert_eq!(details.get("Timeline"), Some("Q3."));
        assert_eq!(details.found(), 2);
    }

    #[test]
    fn test_case_insensitive() {
        let text = "GOALS - win the bid. deliverables: a plan";
        let details = extract_key_details(text, &markers(&["Goals", "Deliverables"]));
        assert_eq!(details.get("Goals"), Some("- win the bid. "));
        assert_eq!(details.get("Deliverables"), Some("a plan"));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let text = "Goals: one. Deliverables: two. Goals again: three.";
        let details = extract_key_details(text, &markers(&["Goals", "Deliverables"]));
        assert_eq!(details.get("Goals"), Some("one. "));
        assert_eq!(details.get("Deliverables"), Some("two. Goals again: three."));
    }

    #[test]
    fn test_out_of_order_markers() {
        let text = "Timeline: June. Goals: expand.";
        let details = extract_key_details(text, &markers(&["Goals", "Timeline"]));
        assert_eq!(details.get("Goals"), Some("expand."));
        assert_eq!(details.get("Timeline"), Some("June. "));
    }

    #[test]
    fn test_empty_text() {
        let details = extract_key_details("", &Marker::defaults());
        assert_eq!(details.len(), 4);
        assert!(details.iter().all(|(_, t)| t.is_empty()));
    }

    #[test]
    fn test_non_ascii_text_keeps_offsets() {
        let text = "Résumé first. Goals: café ☕ expansion. Timeline: été";
        let details = extract_key_details(text, &markers(&["Goals", "Timeline"]));
        assert_eq!(details.get("Goals"), Some("café ☕ expansion. "));
        assert_eq!(details.get("Timeline"), Some("été"));
    }

    #[test]
    fn test_unknown_section_is_none() {
        let details = extract_key_details("Goals: x", &markers(&["Goals"]));
        assert_eq!(details.get("Budget"), None);
    }

    #[test]
    fn test_serialises_as_ordered_map() {
        let details = extract_key_details("Timeline: soon. Goals: all", &markers(&["Timeline", "Goals"]));
        let json = serde_json::to_string(&details).unwrap();
        assert_eq!(json, r#"{"Timeline":"soon. ","Goals":"all"}"#);
    }

    #[test]
    fn test_validate_markers() {
        assert!(validate_markers(&Marker::defaults()).is_ok());
        assert_eq!(
            validate_markers(&[Marker::new("Goals", " ")]),
            Err(ExtractError::EmptyKeyword("Goals".to_string()))
        );
        assert_eq!(
            validate_markers(&markers(&["Goals", "goals"])),
            Err(ExtractError::DuplicateKeyword("goals".to_string()))
        );
    }

    #[test]
    fn test_padded_keyword_rejected() {
        let padded = vec![Marker::new("Goals", "Goals"), Marker::new("Deliverables", " Deliverables")];
        assert_eq!(
            validate_markers(&padded),
            Err(ExtractError::PaddedKeyword(" Deliverables".to_string()))
        );
        assert_eq!(
            validate_markers(&[Marker::new("Goals", "Goals\t")]),
            Err(ExtractError::PaddedKeyword("Goals\t".to_string()))
        );
    }

    #[test]
    fn test_non_ascii_case_is_not_folded() {
        let details = extract_key_details("évaluation: price", &markers(&["Évaluation"]));
        assert_eq!(details.get("Évaluation"), Some(""));

        let details = extract_key_details("ÉVALUATION: price", &markers(&["Évaluation"]));
        assert_eq!(details.get("Évaluation"), Some("price"));
    }
}
