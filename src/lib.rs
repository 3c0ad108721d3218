//! # rfpdeck
//!
//! Turns requests for proposal and simple section plans into PowerPoint decks.
//!
//! ## Features
//!
//! - **Section extraction**: Locates keyword-delimited sections (Goals, Deliverables, ...) in RFP text
//! - **Extractive summaries**: Keeps the leading sentences of every section, verbatim
//! - **Declarative slides**: Deck builders produce plain `Slide` records; a single renderer writes `.pptx`
//! - **Custom decks**: Title, divider and numbered content slides from a TOML plan or an interactive form

pub mod config;
pub mod deck;
pub mod extract;
pub mod form;
pub mod pdf;
pub mod pptx;
pub mod rfp;
pub mod slide;
pub mod summary;

pub use config::Settings;
pub use deck::{assemble, DeckConfig, SectionConfig};
pub use extract::{extract_key_details, KeyDetails, Marker};
pub use rfp::RfpReport;
pub use slide::{Deck, Rgb, Slide};
pub use summary::{summarize, SectionSummary};
