//! Immutable airport reference data.
//!
//! The directory is loaded once at process start and shared behind an `Arc`; nothing mutates
//! it afterwards, so concurrent lookups need no synchronization.

mod parser;

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::workflows::eligibility::domain::{Airport, IataCode};
use crate::workflows::eligibility::error::EligibilityError;
use parser::{parse_airports, ParsedRow};

const EMBEDDED_AIRPORTS: &str = include_str!("../../../data/airports.csv");

#[derive(Debug)]
pub enum AirportImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, reason: String },
    Empty,
}

impl std::fmt::Display for AirportImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AirportImportError::Io(err) => write!(f, "failed to read airport dataset: {}", err),
            AirportImportError::Csv(err) => write!(f, "invalid airport CSV data: {}", err),
            AirportImportError::InvalidRow { line, reason } => {
                write!(f, "invalid airport on line {}: {}", line, reason)
            }
            AirportImportError::Empty => write!(f, "airport dataset contains no airports"),
        }
    }
}

impl std::error::Error for AirportImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AirportImportError::Io(err) => Some(err),
            AirportImportError::Csv(err) => Some(err),
            AirportImportError::InvalidRow { .. } | AirportImportError::Empty => None,
        }
    }
}

impl From<std::io::Error> for AirportImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for AirportImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Counts reported after a dataset import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub loaded: usize,
    pub duplicates: usize,
}

/// Lookup table from IATA code to airport.
#[derive(Debug, Clone)]
pub struct AirportDirectory {
    airports: HashMap<IataCode, Airport>,
    summary: ImportSummary,
}

impl AirportDirectory {
    /// Dataset compiled into the binary.
    pub fn embedded() -> Result<Self, AirportImportError> {
        Self::from_reader(EMBEDDED_AIRPORTS.as_bytes())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AirportImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AirportImportError> {
        let mut airports = HashMap::new();
        let mut summary = ImportSummary::default();

        for row in parse_airports(reader)? {
            let airport = match row {
                ParsedRow::Valid(airport) => airport,
                ParsedRow::Invalid { line, reason } => {
                    return Err(AirportImportError::InvalidRow { line, reason })
                }
            };

            if airports.contains_key(&airport.code) {
                warn!(code = %airport.code, "duplicate airport row ignored");
                summary.duplicates += 1;
                continue;
            }
            airports.insert(airport.code.clone(), airport);
        }

        if airports.is_empty() {
            return Err(AirportImportError::Empty);
        }

        summary.loaded = airports.len();
        info!(
            loaded = summary.loaded,
            duplicates = summary.duplicates,
            "airport directory loaded"
        );

        Ok(Self { airports, summary })
    }

    pub fn from_airports<I>(airports: I) -> Self
    where
        I: IntoIterator<Item = Airport>,
    {
        let mut map = HashMap::new();
        let mut summary = ImportSummary::default();
        for airport in airports {
            if map.contains_key(&airport.code) {
                summary.duplicates += 1;
                continue;
            }
            map.insert(airport.code.clone(), airport);
        }
        summary.loaded = map.len();
        Self {
            airports: map,
            summary,
        }
    }

    pub fn lookup(&self, code: &IataCode) -> Result<&Airport, EligibilityError> {
        self.airports
            .get(code)
            .ok_or_else(|| EligibilityError::UnknownAirport(code.clone()))
    }

    pub fn contains(&self, code: &IataCode) -> bool {
        self.airports.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    pub fn summary(&self) -> ImportSummary {
        self.summary
    }
}
