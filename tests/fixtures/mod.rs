//! Test fixtures: roster CSV builders and a realistic 53-person roster.
//!
//! # Example
//!
//! ```rust
//! use fixtures::RosterBuilder;
//!
//! let csv = RosterBuilder::new()
//!     .participant("Ana", "Sol")
//!     .participant("beto", "Ruiz")
//!     .build();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::path::{Path, PathBuf};

use firmas::ParticipantRecord;

// ============================================================================
// Roster Builder
// ============================================================================

/// Builds roster CSV text the way the course platform exports it.
#[derive(Debug, Clone)]
pub struct RosterBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    delimiter: char,
    bom: bool,
}

impl Default for RosterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterBuilder {
    /// Export layout with a leading and a trailing extra column.
    pub fn new() -> Self {
        Self {
            headers: vec![
                "Nombre".into(),
                "Apellido(s)".into(),
                "Dirección de correo".into(),
            ],
            rows: Vec::new(),
            delimiter: ',',
            bom: false,
        }
    }

    pub fn headers(mut self, headers: &[&str]) -> Self {
        self.headers = headers.iter().map(|h| (*h).to_string()).collect();
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_bom(mut self) -> Self {
        self.bom = true;
        self
    }

    /// Add a row for the default headers.
    pub fn participant(mut self, first: &str, last: &str) -> Self {
        let email = format!("{}@example.org", first.trim().to_lowercase().replace(' ', "."));
        self.rows.push(vec![first.into(), last.into(), email]);
        self
    }

    pub fn participants<S: AsRef<str>>(mut self, pairs: &[(S, S)]) -> Self {
        for (first, last) in pairs {
            self = self.participant(first.as_ref(), last.as_ref());
        }
        self
    }

    /// Add a raw row, for custom headers or short rows.
    pub fn row(mut self, fields: &[&str]) -> Self {
        self.rows.push(fields.iter().map(|f| (*f).to_string()).collect());
        self
    }

    pub fn build(&self) -> String {
        let mut out = String::new();
        if self.bom {
            out.push('\u{feff}');
        }
        out.push_str(&self.join(&self.headers));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&self.join(row));
            out.push('\n');
        }
        out
    }

    /// Write the CSV to `dir/name` and return the path.
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).expect("write roster fixture");
        path
    }

    fn join(&self, fields: &[String]) -> String {
        fields
            .iter()
            .map(|f| quote(f, self.delimiter))
            .collect::<Vec<_>>()
            .join(&self.delimiter.to_string())
    }
}

fn quote(field: &str, delimiter: char) -> String {
    if field.contains(delimiter) || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// ============================================================================
// Sample Rosters
// ============================================================================

const POKEMON_NAMES: [&str; 53] = [
    "Pikachu", "Bulbasaur", "Charmander", "Squirtle", "Jigglypuff", "Meowth", "Psyduck",
    "Machop", "Magnemite", "Eevee", "Snorlax", "Mewtwo", "Chikorita", "Cyndaquil", "Totodile",
    "Mareep", "Sudowoodo", "Espeon", "Umbreon", "Murkrow", "Wobbuffet", "Larvitar", "Treecko",
    "Torchic", "Mudkip", "Ralts", "Surskit", "Shroomish", "Makuhita", "Skitty", "Sableye",
    "Mawile", "Meditite", "Swablu", "Barboach", "Bagon", "Beldum", "Turtwig", "Chimchar",
    "Piplup", "Starly", "Kricketot", "Shinx", "Riolu", "Gible", "Hippopotas", "Snover", "Rotom",
    "Snivy", "Tepig", "Oshawott", "Zorua", "Axew",
];

const FRENCH_SURNAMES: [&str; 30] = [
    "Dufour", "Lafitte", "Dumont", "Duchamp", "Bourdet", "Bideau", "Lissarrague", "Darrigrand",
    "Larrieu", "Larronde", "Larrarte", "Larrucea", "Etcheto", "Etcheverry", "Etchegoyen",
    "Etcheberry", "Larralde", "Darracq", "Bidegain", "Larranaga", "Lafargue", "Laborde", "Lafon",
    "Lafargue", "Lafitte", "Lafon", "Lafargue", "Lafitte", "Lafon", "Lafargue",
];

const BASQUE_SURNAMES: [&str; 31] = [
    "Aguirre", "Echeverria", "Goikoetxea", "Ibarra", "Irizar", "Mendieta", "Oteiza", "Urrutia",
    "Zabala", "Zubizarreta", "Arrieta", "Etxeberria", "Garate", "Garmendia", "Goñi",
    "Iturriaga", "Lasa", "Muguruza", "Olaizola", "Sarasola", "Ugalde", "Urkiza", "Zuloaga",
    "Zunzunegui", "Zubiri", "Zubia", "Zubeldia", "Zubimendi", "Zubizarreta", "Zuloaga", "Zubia",
];

/// 53 (first name, compound surname) pairs in export order (unsorted).
pub fn pokemon_roster() -> Vec<(String, String)> {
    POKEMON_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let french = FRENCH_SURNAMES[i % FRENCH_SURNAMES.len()];
            let basque = BASQUE_SURNAMES[i % BASQUE_SURNAMES.len()];
            ((*name).to_string(), format!("{french} {basque}"))
        })
        .collect()
}

/// [`pokemon_roster`] as records, in export order.
pub fn pokemon_participants() -> Vec<ParticipantRecord> {
    pokemon_roster()
        .iter()
        .map(|(first, last)| ParticipantRecord::new(first, last))
        .collect()
}

/// Names with accents, apostrophes and markup-significant characters.
pub fn special_participants() -> Vec<ParticipantRecord> {
    vec![
        ParticipantRecord::new("José María", "Muñoz-Álvarez"),
        ParticipantRecord::new("Zoë", "O'Connor"),
        ParticipantRecord::new("Ñuño", "Smith & Wesson"),
    ]
}

/// `n` records named `P000`, `P001`... in order.
pub fn numbered_participants(n: usize) -> Vec<ParticipantRecord> {
    (0..n)
        .map(|i| ParticipantRecord::new(&format!("P{i:03}"), &format!("Surname {i:03}")))
        .collect()
}
