//! Library side of the `nc-gcode` command-line tool.

pub mod logging;
pub mod output;
