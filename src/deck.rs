//! Custom deck builder.
//!
//! Expands a list of sections into a title slide followed, per section, by a
//! divider slide and a run of numbered content slides.

use crate::slide::{Align, Deck, Font, Frame, Rgb, Slide, SlideKind, TextBox};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_SLIDES: u32 = 1;
pub const MAX_SLIDES: u32 = 10;

pub const DEFAULT_DECK_TITLE: &str = "Custom Presentation";
pub const OUTPUT_FILENAME: &str = "Custom_Presentation.pptx";

/// Built-in sections: title, slide count, divider color
pub const DEFAULT_SECTIONS: &[(&str, u32, Rgb)] = &[
    ("Introduction", 1, Rgb::new(0x1F, 0x4E, 0x79)),
    ("Problem Statement", 1, Rgb::new(0xC0, 0x50, 0x4D)),
    ("Proposed Solution", 2, Rgb::new(0x4F, 0x81, 0xBD)),
    ("Timeline", 1, Rgb::new(0x9B, 0xBB, 0x59)),
    ("Budget", 1, Rgb::new(0x80, 0x64, 0xA2)),
    ("Conclusion", 1, Rgb::new(0xF7, 0x96, 0x46)),
];

const FONT: &str = "Helvetica";
const WIDTH: f64 = 10.0;
const HEIGHT: f64 = 7.5;
const BODY_COLOR: Rgb = Rgb::new(50, 50, 50);
/// Number of the title slide; content numbering starts after it
const TITLE_SLIDE_NUMBER: u32 = 1;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck title is empty")]
    EmptyTitle,
    #[error("deck has no sections")]
    NoSections,
    #[error("section {0} has an empty title")]
    EmptySectionTitle(usize),
    #[error("section '{title}' asks for {count} slides, allowed range is 1-10")]
    SlideCount { title: String, count: u32 },
}

/// One section of a custom deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionConfig {
    pub title: String,
    pub slide_count: u32,
    pub color: Rgb,
}

impl SectionConfig {
    pub fn new(title: impl Into<String>, slide_count: u32, color: Rgb) -> Self {
        Self {
            title: title.into(),
            slide_count,
            color,
        }
    }
}

/// Everything needed to build a custom deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckConfig {
    pub title: String,
    #[serde(rename = "section")]
    pub sections: Vec<SectionConfig>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_DECK_TITLE.to_string(),
            sections: DEFAULT_SECTIONS
                .iter()
                .map(|(title, count, color)| SectionConfig::new(*title, *count, *color))
                .collect(),
        }
    }
}

impl DeckConfig {
    pub fn validate(&self) -> Result<(), DeckError> {
        if self.title.trim().is_empty() {
            return Err(DeckError::EmptyTitle);
        }
        if self.sections.is_empty() {
            return Err(DeckError::NoSections);
        }
        for (idx, section) in self.sections.iter().enumerate() {
            if section.title.trim().is_empty() {
                return Err(DeckError::EmptySectionTitle(idx + 1));
            }
            if !(MIN_SLIDES..=MAX_SLIDES).contains(&section.slide_count) {
                return Err(DeckError::SlideCount {
                    title: section.title.clone(),
                    count: section.slide_count,
                });
            }
        }
        Ok(())
    }

    /// Content slides across all sections
    pub fn content_slides(&self) -> u32 {
        self.sections.iter().map(|s| s.slide_count).sum()
    }
}

/// Build the slide list for a custom deck.
///
/// Content slides are numbered from 2 upwards across the whole deck; title
/// and divider slides do not take a number.
pub fn assemble(config: DeckConfig) -> Result<Deck, DeckError> {
    config.validate()?;

    let mut deck = Deck::new(config.title.clone(), WIDTH, HEIGHT);
    deck.push(title_slide(&config));

    let mut number = TITLE_SLIDE_NUMBER;
    for section in &config.sections {
        deck.push(divider_slide(section));
        for page in 1..=section.slide_count {
            number += 1;
            deck.push(content_slide(section, page, number));
        }
    }

    log::debug!(
        "assembled '{}': {} sections, {} slides",
        config.title,
        config.sections.len(),
        deck.len()
    );
    Ok(deck)
}

fn title_slide(config: &DeckConfig) -> Slide {
    let agenda = config
        .sections
        .iter()
        .map(|s| s.title.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    Slide::new(SlideKind::Title)
        .text_box(
            TextBox::new(
                Frame::new(0.5, 1.5, 9.0, 1.5),
                config.title.clone(),
                Font::new(FONT, 44).bold(),
            )
            .align(Align::Center),
        )
        .text_box(
            TextBox::new(
                Frame::new(1.5, 3.5, 7.0, 3.0),
                agenda,
                Font::new(FONT, 20).color(BODY_COLOR),
            )
            .align(Align::Center),
        )
}

fn divider_slide(section: &SectionConfig) -> Slide {
    Slide::new(SlideKind::Divider)
        .with_background(section.color)
        .text_box(
            TextBox::new(
                Frame::new(0.5, 3.0, 9.0, 1.5),
                section.title.clone(),
                Font::new(FONT, 40)
                    .bold()
                    .color(text_color_on(section.color)),
            )
            .align(Align::Center),
        )
}

fn content_slide(section: &SectionConfig, page: u32, number: u32) -> Slide {
    let heading = if section.slide_count > 1 {
        format!("{} ({}/{})", section.title, page, section.slide_count)
    } else {
        section.title.clone()
    };

    Slide::new(SlideKind::Content)
        .with_number(number)
        .text_box(TextBox::new(
            Frame::new(0.5, 0.4, 9.0, 1.0),
            heading,
            Font::new(FONT, 32).bold().color(section.color),
        ))
        .text_box(TextBox::new(
            Frame::new(0.5, 1.6, 9.0, 4.8),
            format!("Add {} content here.", section.title),
            Font::new(FONT, 20).color(BODY_COLOR),
        ))
        .text_box(
            TextBox::new(
                Frame::new(7.5, 6.8, 2.0, 0.4),
                format!("Slide {number}"),
                Font::new(FONT, 12).color(BODY_COLOR),
            )
            .align(Align::Right),
        )
}

/// Black or white, whichever reads better on `background`
fn text_color_on(background: Rgb) -> Rgb {
    let luma = 299 * background.r as u32 + 587 * background.g as u32 + 114 * background.b as u32;
    if luma > 150_000 {
        Rgb::BLACK
    } else {
        Rgb::WHITE
    }
}
