//! Embedded G-group reference data.
//!
//! The table is compiled into the binary with `include_str!()`, so loading
//! the registry never touches the filesystem.
//!
//! One CSV row per group entry:
//! `group_nr,title,effectiveness,short_name,entry_nr,entry_id,description`.

/// Sinumerik-style G groups (motion, plane, offsets, feed, spline, ...).
pub const G_GROUPS_CSV: &str = include_str!("../data/g_groups.csv");
