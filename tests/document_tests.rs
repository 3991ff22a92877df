//! Tests for the printable documents (HTML and PDF).
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;
mod fixtures;

use common::pdf_text_runs;
use firmas::layout::{BlockLayout, LayoutConfig, LayoutMode};
use firmas::render::{render_html, render_pdf, save_html, save_pdf, FontConfig, SheetFonts};
use firmas::roster::sort_participants;
use firmas::{DayLabels, DocumentMeta, ParticipantRecord, Week};
use fixtures::*;

fn test_meta() -> DocumentMeta {
    DocumentMeta::default()
        .with_subject(Some("Test"))
        .with_group(Some("T1"))
        .with_week(Week::new(1))
        .with_day_labels(DayLabels::from_inputs(Some("Lunes"), Some("Viernes")))
}

fn sorted_pokemon() -> Vec<ParticipantRecord> {
    let mut people = pokemon_participants();
    sort_participants(&mut people);
    people
}

fn html_for(people: &[ParticipantRecord], meta: &DocumentMeta) -> String {
    let layout = BlockLayout::new(people, &LayoutConfig::default()).unwrap();
    render_html(&layout, meta).unwrap()
}

fn fonts() -> SheetFonts {
    SheetFonts::load(&FontConfig::default()).expect("a system sans-serif TrueType font")
}

fn pdf_with(people: &[ParticipantRecord], config: &LayoutConfig, meta: &DocumentMeta) -> Vec<u8> {
    let layout = BlockLayout::new(people, config).unwrap();
    render_pdf(&layout, meta, &fonts()).unwrap()
}

fn pdf_for(people: &[ParticipantRecord], meta: &DocumentMeta) -> Vec<u8> {
    pdf_with(people, &LayoutConfig::default(), meta)
}

fn assert_shown(runs: &[String], expected: &str) {
    assert!(
        runs.iter().any(|r| r == expected),
        "{expected:?} not drawn; runs: {runs:?}"
    );
}

fn stacked() -> LayoutConfig {
    LayoutConfig {
        mode: LayoutMode::Stacked,
        ..LayoutConfig::default()
    }
}

fn assert_pdf(bytes: &[u8]) {
    assert!(bytes.starts_with(b"%PDF-"), "missing PDF header");
    let tail = String::from_utf8_lossy(&bytes[bytes.len().saturating_sub(16)..]).into_owned();
    assert!(tail.contains("%%EOF"), "missing EOF marker");
}

/// Value of the page tree's `/Count` entry.
fn page_count(pdf: &[u8]) -> usize {
    let text = String::from_utf8_lossy(pdf);
    let rest = text.split("/Count ").nth(1).expect("page tree count");
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap()
}

// ============================================================================
// HTML
// ============================================================================

#[test]
fn test_html_with_metadata() {
    let html = html_for(&sorted_pokemon(), &test_meta());
    assert!(html.contains("Hoja de Firmas"));
    assert!(html.contains("Test"));
    assert!(html.contains("T1"));
    assert!(html.contains("Semana 1"));
    assert!(html.contains("Lunes"));
    assert!(html.contains("Viernes"));
    assert!(!html.contains(">Asignatura<"));
}

#[test]
fn test_html_placeholders_without_metadata() {
    let html = html_for(&sorted_pokemon(), &DocumentMeta::default());
    assert!(html.contains("Hoja de Firmas"));
    assert!(html.contains("primera"));
    assert!(html.contains("segunda"));
    for placeholder in ["Asignatura", "Grupo", "Fecha", "Semana"] {
        assert!(
            html.contains(&format!(r#"<span class="placeholder">{placeholder}</span>"#)),
            "{placeholder}"
        );
    }
}

#[test]
fn test_html_one_table_per_block() {
    let html = html_for(&sorted_pokemon(), &test_meta());
    assert_eq!(html.matches(r#"<table class="table">"#).count(), 7);
    assert_eq!(html.matches(r#"<div class="row">"#).count(), 4);
    assert_eq!(html.matches("Lunes").count(), 53);
}

#[test]
fn test_html_pairs_blocks_whatever_the_sheet_layout() {
    let people = sorted_pokemon();
    for config in [
        stacked(),
        LayoutConfig {
            blocks_per_row: 3,
            ..LayoutConfig::default()
        },
    ] {
        let layout = BlockLayout::new(&people, &config).unwrap();
        let html = render_html(&layout, &test_meta()).unwrap();
        assert_eq!(html.matches(r#"<div class="row">"#).count(), 4);
        assert_eq!(html.matches(r#"<table class="table">"#).count(), 7);
    }
}

#[test]
fn test_html_special_characters_verbatim() {
    let meta = DocumentMeta::default()
        .with_subject(Some("Español & Français"))
        .with_group(Some("T2"))
        .with_week(Week::new(2))
        .with_day_labels(DayLabels::from_inputs(Some("Lunes"), Some("Miércoles")));
    let html = html_for(&special_participants(), &meta);
    assert!(html.contains("Español & Français"));
    assert!(html.contains("José María"));
    assert!(html.contains("Muñoz-Álvarez"));
    assert!(html.contains("O'Connor"));
    assert!(html.contains("Smith & Wesson"));
    assert!(html.contains("Miércoles"));
}

#[test]
fn test_html_markup_in_names_is_escaped() {
    let people = vec![ParticipantRecord::new("<script>", "Sol")];
    let html = html_for(&people, &DocumentMeta::default());
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
}

#[test]
fn test_html_empty_roster() {
    let html = html_for(&[], &DocumentMeta::default());
    assert!(html.contains("Hoja de Firmas"));
    assert!(!html.contains(r#"<table class="table">"#));
}

#[test]
fn test_save_html() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hoja_firmas.html");
    let people = sorted_pokemon();
    let layout = BlockLayout::new(&people, &LayoutConfig::default()).unwrap();
    save_html(&layout, &test_meta(), &path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("<!DOCTYPE html>"));
}

// ============================================================================
// PDF
// ============================================================================

#[test]
fn test_pdf_with_metadata() {
    let people = sorted_pokemon();
    let pdf = pdf_for(&people, &test_meta());
    assert_pdf(&pdf);

    let runs = pdf_text_runs(&pdf);
    for expected in ["Hoja de Firmas", "Test", "T1", "Fecha", "Semana 1", "Nombre", "Firma"] {
        assert_shown(&runs, expected);
    }
    assert!(!runs.iter().any(|r| r == "Asignatura" || r == "Grupo"));
    assert_eq!(runs.iter().filter(|r| *r == "Lunes").count(), 53);
    assert_eq!(runs.iter().filter(|r| *r == "Viernes").count(), 53);
    for person in &people {
        assert_shown(&runs, &person.first_name);
    }
}

#[test]
fn test_pdf_placeholders_without_metadata() {
    let pdf = pdf_for(&sorted_pokemon(), &DocumentMeta::default());
    assert_pdf(&pdf);
    let runs = pdf_text_runs(&pdf);
    for expected in ["Asignatura", "Grupo", "Fecha", "Semana", "primera", "segunda"] {
        assert_shown(&runs, expected);
    }
}

#[test]
fn test_pdf_empty_roster() {
    let pdf = pdf_for(&[], &DocumentMeta::default());
    assert_pdf(&pdf);
    let runs = pdf_text_runs(&pdf);
    assert_shown(&runs, "Hoja de Firmas");
    assert!(!runs.iter().any(|r| r == "Nombre"));
}

#[test]
fn test_pdf_special_characters() {
    let meta = DocumentMeta::default()
        .with_subject(Some("Español & Français"))
        .with_day_labels(DayLabels::from_inputs(Some("Lunes"), Some("Miércoles")));
    let pdf = pdf_for(&special_participants(), &meta);
    assert_pdf(&pdf);
    let runs = pdf_text_runs(&pdf);
    for expected in [
        "Español & Français",
        "José María",
        "Muñoz-Álvarez",
        "Zoë",
        "O'Connor",
        "Ñuño",
        "Smith & Wesson",
        "Miércoles",
    ] {
        assert_shown(&runs, expected);
    }
}

#[test]
fn test_pdf_names_outside_windows_1252() {
    let people = vec![
        ParticipantRecord::new("Ștefan", "Łukasiewicz"),
        ParticipantRecord::new("Antonín", "Dvořák"),
        ParticipantRecord::new("Pál", "Erdős"),
    ];
    let pdf = pdf_for(&people, &DocumentMeta::default());
    let runs = pdf_text_runs(&pdf);
    for person in &people {
        assert_shown(&runs, &person.first_name);
        assert_shown(&runs, &person.last_name);
    }
    assert!(!runs.iter().any(|r| r.contains('?') || r.contains('\u{FFFD}')));
}

#[test]
fn test_pdf_pairs_blocks_whatever_the_sheet_layout() {
    let people = numbered_participants(400);
    let grid = pdf_for(&people, &test_meta());
    let from_stacked = pdf_with(&people, &stacked(), &test_meta());
    assert_eq!(page_count(&grid), page_count(&from_stacked));
    assert_eq!(pdf_text_runs(&grid), pdf_text_runs(&from_stacked));
}

#[test]
fn test_pdf_large_roster_paginates() {
    let people = numbered_participants(400);
    let bytes = pdf_for(&people, &test_meta());
    assert_pdf(&bytes);
    assert!(page_count(&bytes) > page_count(&pdf_for(&sorted_pokemon(), &test_meta())));
}

#[test]
fn test_save_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test_hoja_firmas.pdf");
    let people = sorted_pokemon();
    let layout = BlockLayout::new(&people, &LayoutConfig::default()).unwrap();
    save_pdf(&layout, &test_meta(), &fonts(), &path).unwrap();
    assert_pdf(&std::fs::read(&path).unwrap());
}
