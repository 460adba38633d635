#![deny(unsafe_code)]

use serde::Deserialize;

use crate::error::RegistryError;
use crate::types::{Effectiveness, GGroup, GGroupEntry};

#[derive(Debug, Deserialize)]
struct GGroupRecord {
    group_nr: u32,
    title: String,
    effectiveness: String,
    short_name: String,
    entry_nr: u32,
    entry_id: String,
    description: String,
}

/// Parses the flat one-row-per-entry table into groups ordered by number.
pub fn parse_g_groups_csv(contents: &str) -> Result<Vec<GGroup>, RegistryError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| RegistryError::csv(1, &e))?
        .clone();

    let mut groups: Vec<GGroup> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| {
            let line = e.position().map_or(0, csv::Position::line);
            RegistryError::csv(line, &e)
        })?;
        let line = record.position().map_or(0, csv::Position::line);
        let row: GGroupRecord = record
            .deserialize(Some(&headers))
            .map_err(|e| RegistryError::csv(line, &e))?;

        let effectiveness = Effectiveness::parse(&row.effectiveness).ok_or_else(|| {
            RegistryError::InvalidEffectiveness {
                group_nr: row.group_nr,
                value: row.effectiveness.clone(),
            }
        })?;
        let entry = GGroupEntry {
            id: row.entry_id,
            nr: row.entry_nr,
            description: row.description,
        };

        match groups.iter_mut().find(|g| g.nr == row.group_nr) {
            Some(group) => {
                check_consistent(group.nr, "title", &group.title, &row.title)?;
                check_consistent(
                    group.nr,
                    "short_name",
                    &group.short_name,
                    &row.short_name,
                )?;
                check_consistent(
                    group.nr,
                    "effectiveness",
                    group.effectiveness.as_str(),
                    effectiveness.as_str(),
                )?;
                group.entries.push(entry);
            }
            None => groups.push(GGroup {
                nr: row.group_nr,
                title: row.title,
                effectiveness,
                short_name: row.short_name,
                entries: vec![entry],
            }),
        }
    }

    groups.sort_by_key(|g| g.nr);
    for group in &mut groups {
        group.entries.sort_by_key(|e| e.nr);
    }
    Ok(groups)
}

fn check_consistent(
    group_nr: u32,
    field: &'static str,
    first: &str,
    second: &str,
) -> Result<(), RegistryError> {
    if first == second {
        return Ok(());
    }
    Err(RegistryError::InconsistentGroup {
        group_nr,
        field,
        first: first.to_string(),
        second: second.to_string(),
    })
}
