//! Column identifiers and their semantic roles.
//!
//! A column's role is decided once from its identifier. The role fixes the
//! column's dtype, whether its value stays in the machine state after the
//! line, and whether the table forward-fills it.

use serde::{Deserialize, Serialize};

/// Block number (`N10`).
pub const BLOCK_NUMBER_COLUMN: &str = "N";
/// Tool selection (`T="DRILL"`).
pub const TOOL_COLUMN: &str = "T";
/// Auxiliary functions (`M3 M8`), stored as a list per line.
pub const DIRECTIVES_COLUMN: &str = "M";
/// Subprogram / cycle calls and codes the registry does not know.
pub const FUNCTION_CALL_COLUMN: &str = "function_call";
/// Trailing `;` comment.
pub const COMMENT_COLUMN: &str = "comment";

/// Columns whose meaning is fixed; none of them may be configured as an axis.
pub const RESERVED_COLUMNS: &[&str] = &[
    BLOCK_NUMBER_COLUMN,
    TOOL_COLUMN,
    DIRECTIVES_COLUMN,
    FUNCTION_CALL_COLUMN,
    COMMENT_COLUMN,
];

/// Maximum number of M functions in one block.
pub const MAX_DIRECTIVES_PER_BLOCK: usize = 5;

pub fn is_reserved_column(id: &str) -> bool {
    RESERVED_COLUMNS.contains(&id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColumnRole {
    BlockNumber,
    ModalGroup,
    NonModalGroup,
    Axis,
    Tool,
    Unknown,
    Directives,
    FunctionCall,
    Comment,
}

impl ColumnRole {
    /// Whether the value survives into the state used for the next line.
    pub fn persists(self) -> bool {
        matches!(
            self,
            Self::Axis | Self::ModalGroup | Self::Tool | Self::Unknown
        )
    }

    /// Whether table cells are filled from the last defined value.
    ///
    /// The tool stays selected in the machine state but its column is only
    /// set on the line that selects it.
    pub fn forward_fills(self) -> bool {
        matches!(self, Self::Axis | Self::ModalGroup | Self::Unknown)
    }
}
