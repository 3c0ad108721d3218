//! Interactive terminal form for the custom deck builder.
//!
//! Every field is checked as it is entered, so the returned plan is always
//! valid.

use crate::deck::{DeckConfig, DeckError, SectionConfig, MAX_SLIDES, MIN_SLIDES};
use crate::slide::Rgb;
use dialoguer::{Confirm, Input};
use thiserror::Error;

/// Upper bound on sections offered by the form
pub const MAX_SECTIONS: usize = 20;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("invalid deck: {0}")]
    Deck(#[from] DeckError),
    #[error("cancelled")]
    Cancelled,
}

/// Ask for a deck plan, pre-filling every field from `initial`
pub fn prompt_deck(initial: &DeckConfig) -> Result<DeckConfig, FormError> {
    let title = Input::<String>::new()
        .with_prompt("Presentation title")
        .default(initial.title.clone())
        .validate_with(|input: &String| validate_title(input))
        .interact_text()?;

    let count = Input::<usize>::new()
        .with_prompt("Number of sections")
        .default(initial.sections.len().clamp(1, MAX_SECTIONS))
        .validate_with(|input: &usize| validate_section_count(*input))
        .interact_text()?;

    let mut sections = Vec::with_capacity(count);
    for idx in 0..count {
        let default = section_default(initial, idx);
        println!("\nSection {}", idx + 1);
        sections.push(prompt_section(&default)?);
    }

    let plan = DeckConfig { title, sections };
    plan.validate()?;

    let proceed = Confirm::new()
        .with_prompt(format!(
            "Build {} content slides across {} sections?",
            plan.content_slides(),
            plan.sections.len()
        ))
        .default(true)
        .interact()?;
    if !proceed {
        return Err(FormError::Cancelled);
    }

    Ok(plan)
}

fn prompt_section(default: &SectionConfig) -> Result<SectionConfig, FormError> {
    let title = Input::<String>::new()
        .with_prompt("  Title")
        .default(default.title.clone())
        .validate_with(|input: &String| validate_title(input))
        .interact_text()?;

    let slide_count = Input::<u32>::new()
        .with_prompt(format!("  Slides ({MIN_SLIDES}-{MAX_SLIDES})"))
        .default(default.slide_count)
        .validate_with(|input: &u32| validate_slide_count(*input))
        .interact_text()?;

    // Rgb parses the answer itself and re-prompts with the ColorError message
    let color = Input::<Rgb>::new()
        .with_prompt("  Divider color (#RRGGBB)")
        .default(default.color)
        .interact_text()?;

    Ok(SectionConfig {
        title,
        slide_count,
        color,
    })
}

/// Pre-filled values for the section at `idx`
fn section_default(initial: &DeckConfig, idx: usize) -> SectionConfig {
    initial.sections.get(idx).cloned().unwrap_or_else(|| {
        SectionConfig::new(format!("Section {}", idx + 1), MIN_SLIDES, Rgb::new(0x40, 0x40, 0x40))
    })
}

fn validate_title(input: &str) -> Result<(), String> {
    if input.trim().is_empty() {
        Err("title cannot be empty".to_string())
    } else {
        Ok(())
    }
}

fn validate_section_count(count: usize) -> Result<(), String> {
    if (1..=MAX_SECTIONS).contains(&count) {
        Ok(())
    } else {
        Err(format!("enter between 1 and {MAX_SECTIONS} sections"))
    }
}

fn validate_slide_count(count: u32) -> Result<(), String> {
    if (MIN_SLIDES..=MAX_SLIDES).contains(&count) {
        Ok(())
    } else {
        Err(format!("enter between {MIN_SLIDES} and {MAX_SLIDES} slides"))
    }
}
