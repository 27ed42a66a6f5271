//! Database construction: discover MAD files, read them, backfill rotations.

pub mod merge;
pub mod reader;
pub mod scanner;

pub use merge::merge_rotations;
pub use reader::{parse_mad, read_mad_file, read_mad_files, MadFields, MAD_TAGS};
pub use scanner::find_mad_files;
