//! RFP to slides pipeline.
//!
//! Extracts the configured sections from an RFP, summarises each one and
//! lays the result out on a fixed Letter-sized template.

use crate::extract::{extract_key_details, KeyDetails, Marker};
use crate::pdf::{self, PdfError};
use crate::slide::{Deck, Font, Frame, Rgb, Slide, SlideKind, TextBox};
use crate::summary::{summarize, SectionSummary};
use serde::Serialize;

pub const DECK_TITLE: &str = "RFP Response Presentation";
pub const OUTPUT_FILENAME: &str = "Generated_RFP_Presentation.pptx";

const FONT: &str = "Helvetica";
const PAGE_WIDTH: f64 = 8.5;
const PAGE_HEIGHT: f64 = 11.0;
const BODY_COLOR: Rgb = Rgb::new(50, 50, 50);

/// Extracted and summarised sections of one RFP.
#[derive(Debug, Clone, Serialize)]
pub struct RfpReport {
    pub details: KeyDetails,
    pub summaries: Vec<SectionSummary>,
}

impl RfpReport {
    /// Analyse already-extracted document text
    pub fn from_text(text: &str, markers: &[Marker], max_sentences: usize) -> Self {
        let details = extract_key_details(text, markers);
        let summaries = details
            .iter()
            .map(|(name, content)| SectionSummary::new(name, summarize(content, max_sentences)))
            .collect();

        log::info!(
            "found {}/{} sections in {} characters",
            details.found(),
            details.len(),
            text.len()
        );
        Self { details, summaries }
    }

    /// Extract text from a PDF and analyse it
    pub fn from_pdf(
        bytes: &[u8],
        markers: &[Marker],
        max_sentences: usize,
    ) -> Result<Self, PdfError> {
        let text = pdf::extract_text(bytes)?;
        Ok(Self::from_text(&text, markers, max_sentences))
    }

    pub fn summary(&self, name: &str) -> Option<&str> {
        self.summaries
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.summary.as_str())
    }

    /// Title slide plus one slide per section
    pub fn to_deck(&self) -> Deck {
        let mut deck = Deck::new(DECK_TITLE, PAGE_WIDTH, PAGE_HEIGHT);

        deck.push(Slide::new(SlideKind::Title).text_box(TextBox::new(
            Frame::new(0.5, 0.5, 7.5, 2.0),
            DECK_TITLE,
            Font::new(FONT, 36).bold(),
        )));

        for section in &self.summaries {
            deck.push(
                Slide::new(SlideKind::Content)
                    .text_box(TextBox::new(
                        Frame::new(0.5, 0.5, 7.5, 1.0),
                        section.name.clone(),
                        Font::new(FONT, 32).bold(),
                    ))
                    .text_box(TextBox::new(
                        Frame::new(0.5, 1.5, 7.5, 3.0),
                        section.summary.clone(),
                        Font::new(FONT, 18).color(BODY_COLOR),
                    )),
            );
        }

        deck
    }
}
