//! MAD descriptor reader
//!
//! Streams each file through an XML pull parser, capturing the first text
//! value of a fixed set of tags (matched case-insensitively). Parsing stops as soon as every tag has been
//! seen. A file that fails to parse is logged and contributes nothing.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use xml::common::Position;
use xml::reader::{ParserConfig, XmlEvent};

use crate::model::{Database, SetRecord};
use crate::rotation::degrees_from_mad_text;

/// Tags extracted from every MAD file
pub const MAD_TAGS: [&str; 11] = [
    "name",
    "setname",
    "rotation",
    "flip",
    "resolution",
    "region",
    "homebrew",
    "bootleg",
    "year",
    "category",
    "manufacturer",
];

/// Raw tag values captured from one MAD file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MadFields {
    values: BTreeMap<&'static str, String>,
}

impl MadFields {
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.values.get(tag).map(String::as_str)
    }

    /// Key of the record in the database; empty when the tag is missing
    pub fn setname(&self) -> &str {
        self.get("setname").unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn is_complete(&self) -> bool {
        self.values.len() == MAD_TAGS.len()
    }

    /// Build a set record from the captured values.
    ///
    /// Values that are blank after trimming are dropped; the rest are copied
    /// verbatim. `rotation` goes through the MAD rotation vocabulary and is
    /// dropped when unrecognized.
    pub fn to_record(&self) -> SetRecord {
        let mut record = SetRecord::default();

        for (&tag, value) in &self.values {
            if value.trim().is_empty() {
                continue;
            }

            let slot = match tag {
                "name" => &mut record.name,
                "flip" => &mut record.flip,
                "resolution" => &mut record.resolution,
                "region" => &mut record.region,
                "homebrew" => &mut record.homebrew,
                "bootleg" => &mut record.bootleg,
                "year" => &mut record.year,
                "category" => &mut record.category,
                "manufacturer" => &mut record.manufacturer,
                "rotation" => {
                    record.rotation = degrees_from_mad_text(value);
                    continue;
                }
                _ => continue,
            };
            *slot = Some(value.clone());
        }

        record
    }
}

/// Parse MAD content from any reader.
pub fn parse_mad<R: Read>(source: R) -> Result<MadFields, xml::reader::Error> {
    let parser = ParserConfig::new()
        .trim_whitespace(false)
        .cdata_to_characters(true)
        .create_reader(source);

    let mut fields = MadFields::default();
    // Tag whose text is currently being collected
    let mut pending: Option<(&'static str, String)> = None;

    for event in parser {
        match event? {
            XmlEvent::StartElement { name, .. } => {
                if let Some((tag, text)) = pending.take() {
                    fields.values.insert(tag, text);
                }
                if fields.is_complete() {
                    break;
                }

                // Element names match regardless of case: <SetName> is <setname>
                let local_name = name.local_name.to_lowercase();
                let tag = MAD_TAGS.iter().copied().find(|tag| *tag == local_name);
                if let Some(tag) = tag {
                    if !fields.values.contains_key(tag) {
                        pending = Some((tag, String::new()));
                    }
                }
            }
            XmlEvent::Characters(text) | XmlEvent::Whitespace(text) => {
                if let Some((_, buffer)) = pending.as_mut() {
                    buffer.push_str(&text);
                }
            }
            XmlEvent::EndElement { .. } => {
                if let Some((tag, text)) = pending.take() {
                    fields.values.insert(tag, text);
                }
                if fields.is_complete() {
                    break;
                }
            }
            XmlEvent::EndDocument => break,
            _ => {}
        }
    }

    Ok(fields)
}

/// Read one MAD file. Errors are logged and yield an empty field set.
pub fn read_mad_file(path: &Path) -> MadFields {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            error!(path = %path.display(), "Failed to open MAD file: {}", e);
            return MadFields::default();
        }
    };

    match parse_mad(BufReader::new(file)) {
        Ok(fields) => fields,
        Err(e) => {
            error!(
                path = %path.display(),
                line = e.position().row + 1,
                "Failed to parse MAD file: {}",
                e
            );
            MadFields::default()
        }
    }
}

/// Read every file in order and accumulate records keyed by set name.
///
/// Later files win when two share a set name. Files without a set name are
/// skipped.
pub fn read_mad_files(paths: &[PathBuf]) -> Database {
    let mut database = Database::new();

    for path in paths {
        let fields = read_mad_file(path);
        let setname = fields.setname();

        if setname.trim().is_empty() {
            if !fields.is_empty() {
                warn!(path = %path.display(), "MAD file has no setname, skipping");
            }
            continue;
        }

        debug!("Read {} fields for {} from {}", fields.len(), setname, path.display());
        if database.insert(setname.to_string(), fields.to_record()).is_some() {
            warn!(path = %path.display(), "Duplicate setname {}, keeping the later file", setname);
        }
    }

    info!("Read {} MAD files into {} records", paths.len(), database.len());
    database
}
