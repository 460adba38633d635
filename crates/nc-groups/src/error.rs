#![deny(unsafe_code)]

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to parse G-group table at line {line}: {message}")]
    Csv { line: u64, message: String },

    #[error("invalid effectiveness '{value}' for group {group_nr} (expected 'modal' or 'non-modal')")]
    InvalidEffectiveness { group_nr: u32, value: String },

    #[error("group {group_nr} is declared with conflicting {field}: '{first}' vs '{second}'")]
    InconsistentGroup {
        group_nr: u32,
        field: &'static str,
        first: String,
        second: String,
    },

    #[error("short name '{short_name}' is used by groups {first} and {second}")]
    DuplicateShortName {
        short_name: String,
        first: u32,
        second: u32,
    },

    #[error("code '{entry_id}' is listed in groups {first} and {second}")]
    DuplicateEntry {
        entry_id: String,
        first: u32,
        second: u32,
    },

    #[error("unknown G group: {short_name}")]
    UnknownGroup { short_name: String },
}

impl RegistryError {
    pub(crate) fn csv(line: u64, source: &csv::Error) -> Self {
        Self::Csv {
            line,
            message: source.to_string(),
        }
    }
}
