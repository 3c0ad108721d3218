use rfpdeck::{assemble, config, pptx, DeckConfig, Marker, RfpReport};
use std::io::{Cursor, Read, Write};
use zip::ZipArchive;

const RFP_TEXT: &str = "City of Springfield - Request for Proposal\n\n\
Goals: Replace the legacy permit system. Give residents online access. \
Reduce processing time by half. Publish open data.\n\
Deliverables: Hosted web application. Data migration. Staff training.\n\
Timeline: Proposals due March 1. Award in April.\n\
Evaluation Criteria: Cost (40%). Experience (30%). Approach (30%). References.";

fn slide_xml(bytes: &[u8], n: usize) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut part = archive
        .by_name(&format!("ppt/slides/slide{n}.xml"))
        .unwrap();
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    xml
}

fn slide_count(bytes: &[u8]) -> usize {
    let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    archive
        .file_names()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .count()
}

#[test]
fn rfp_text_to_pptx() {
    let report = RfpReport::from_text(RFP_TEXT, &Marker::defaults(), 3);

    assert_eq!(
        report.summary("Goals"),
        Some(
            "Replace the legacy permit system. Give residents online access. \
             Reduce processing time by half."
        )
    );
    assert_eq!(
        report.summary("Timeline"),
        Some("Proposals due March 1. Award in April.\n")
    );

    let bytes = pptx::render(&report.to_deck()).unwrap();
    assert_eq!(slide_count(&bytes), 5);

    let title = slide_xml(&bytes, 1);
    assert!(title.contains("<a:t>RFP Response Presentation</a:t>"));

    let criteria = slide_xml(&bytes, 5);
    assert!(criteria.contains("<a:t>Evaluation Criteria</a:t>"));
    assert!(criteria.contains("<a:t>Cost (40%). Experience (30%). Approach (30%).</a:t>"));
}

#[test]
fn empty_document_still_renders() {
    let report = RfpReport::from_text("", &Marker::defaults(), 3);
    assert!(report.details.iter().all(|(_, text)| text.is_empty()));
    assert!(report.summaries.iter().all(|s| s.summary.is_empty()));

    let bytes = pptx::render(&report.to_deck()).unwrap();
    assert_eq!(slide_count(&bytes), 5);
}

#[test]
fn report_serialises_to_json() {
    let report = RfpReport::from_text("Goals: Win. Deliverables: Plan.", &Marker::defaults(), 3);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["summaries"][0]["name"], "Goals");
    assert_eq!(json["summaries"][0]["summary"], "Win. ");
    assert_eq!(json["summaries"][3]["summary"], "");
}

#[test]
fn plan_file_to_pptx() {
    let mut plan_file = tempfile::NamedTempFile::new().unwrap();
    write!(
        plan_file,
        r##"title = "Quarterly Review"

[[section]]
title = "Wins"
slide_count = 1
color = "#1F4E79"

[[section]]
title = "Numbers"
slide_count = 2
color = "#9BBB59"

[[section]]
title = "Next Steps"
slide_count = 1
color = "#C0504D"
"##
    )
    .unwrap();

    let plan = config::load_plan(plan_file.path()).unwrap();
    let deck = assemble(plan).unwrap();
    assert_eq!(deck.content_numbers(), vec![2, 3, 4, 5]);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("review.pptx");
    let written = pptx::write_to_path(&deck, &out).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(bytes.len(), written);
    assert_eq!(slide_count(&bytes), 8);

    let divider = slide_xml(&bytes, 4);
    assert!(divider.contains(r#"<a:srgbClr val="9BBB59"/>"#));
    assert!(divider.contains("<a:t>Numbers</a:t>"));

    let last = slide_xml(&bytes, 8);
    assert!(last.contains("<a:t>Slide 5</a:t>"));
}

#[test]
fn default_plan_builds() {
    let deck = assemble(DeckConfig::default()).unwrap();
    let bytes = pptx::render(&deck).unwrap();
    // title + 6 dividers + 7 content slides
    assert_eq!(slide_count(&bytes), 14);
}
