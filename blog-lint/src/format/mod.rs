//! Parsers for Jekyll content files.
//!
//! - `front_matter`: splits the leading `---` block and parses it as YAML
//! - `markdown`: extracts image and Liquid link references from the body,
//!   skipping fenced and inline code

pub mod front_matter;
pub mod markdown;
