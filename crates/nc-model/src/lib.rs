pub mod column;
pub mod options;
pub mod state;
pub mod value;

pub use column::{
    BLOCK_NUMBER_COLUMN, COMMENT_COLUMN, ColumnRole, DIRECTIVES_COLUMN, FUNCTION_CALL_COLUMN,
    MAX_DIRECTIVES_PER_BLOCK, RESERVED_COLUMNS, TOOL_COLUMN, is_reserved_column,
};
pub use options::{
    ConvertOptions, DEFAULT_AXIS_IDENTIFIERS, DEFAULT_ITERATION_LIMIT, DEFAULT_PRECISION,
    MalformedLinePolicy, ReverseOptions,
};
pub use state::{FinalState, MachineState, StateEntry};
pub use value::Value;
