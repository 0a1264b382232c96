use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::workflows::eligibility::domain::{Airport, IataCode};

/// Parsed row before it is admitted into the directory.
#[derive(Debug)]
pub(crate) enum ParsedRow {
    Valid(Airport),
    Invalid { line: u64, reason: String },
}

pub(crate) fn parse_airports<R: Read>(reader: R) -> Result<Vec<ParsedRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let row: AirportRow = record.deserialize(Some(&headers))?;
        rows.push(row.into_parsed(line));
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct AirportRow {
    #[serde(alias = "IATA", alias = "code")]
    iata: String,
    latitude: f64,
    longitude: f64,
    #[serde(default, deserialize_with = "empty_string_as_unknown")]
    country: String,
}

impl AirportRow {
    fn into_parsed(self, line: u64) -> ParsedRow {
        let code = match IataCode::parse(&self.iata) {
            Ok(code) => code,
            Err(err) => {
                return ParsedRow::Invalid {
                    line,
                    reason: err.to_string(),
                }
            }
        };

        if !(-90.0..=90.0).contains(&self.latitude) {
            return ParsedRow::Invalid {
                line,
                reason: format!("latitude {} out of range for {code}", self.latitude),
            };
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return ParsedRow::Invalid {
                line,
                reason: format!("longitude {} out of range for {code}", self.longitude),
            };
        }

        ParsedRow::Valid(Airport {
            code,
            latitude: self.latitude,
            longitude: self.longitude,
            country: self.country,
        })
    }
}

fn empty_string_as_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.trim().to_ascii_uppercase())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "ZZ".to_string()))
}
