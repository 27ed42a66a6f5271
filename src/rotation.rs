//! Rotation data: the remote `name,rotN` list and the MAD rotation vocabulary.

use std::path::Path;

use tracing::{debug, info};

use crate::model::{Degrees, RotationTable};
use crate::{MadDbError, Result};

/// Translate a rotation list code (`rot0`, `rot90`, ...) to degrees.
///
/// Matching is case-insensitive. Only a trailing `\n` or `\r\n` is stripped,
/// so `rot90 ` is not a known code.
pub fn degrees_from_code(code: &str) -> Option<Degrees> {
    let code = code
        .strip_suffix("\r\n")
        .or_else(|| code.strip_suffix('\n'))
        .unwrap_or(code);
    match code.to_lowercase().as_str() {
        "rot0" => Some(0),
        "rot90" => Some(90),
        "rot180" => Some(180),
        "rot270" => Some(270),
        _ => None,
    }
}

/// Translate the free-text `<rotation>` value of a MAD file to degrees.
pub fn degrees_from_mad_text(text: &str) -> Option<Degrees> {
    match text.trim().to_lowercase().as_str() {
        "horizontal" => Some(0),
        "vertical (cw)" => Some(90),
        "horizontal (180)" => Some(180),
        "vertical (ccw)" => Some(270),
        _ => None,
    }
}

/// Parse the body of a rotation list.
///
/// Lines that do not split into exactly two comma-separated parts, or whose
/// code is unknown, are skipped.
pub fn parse_rotation_list(body: &str) -> RotationTable {
    let mut table = RotationTable::new();

    for line in body.lines() {
        let parts: Vec<&str> = line.split(',').collect();
        let [name, code] = parts.as_slice() else {
            continue;
        };

        match degrees_from_code(code) {
            Some(degrees) => {
                table.insert((*name).to_string(), degrees);
            }
            None => debug!("Ignoring rotation code {:?} for {}", code, name),
        }
    }

    table
}

/// Download the rotation list and parse it. No retry: any failure aborts.
pub async fn fetch_rotations(url: &str) -> Result<RotationTable> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("mad-db/", env!("CARGO_PKG_VERSION")))
        .build()?;

    fetch_rotations_with(&client, url).await
}

/// Same as [`fetch_rotations`] with a caller-supplied HTTP client
pub async fn fetch_rotations_with(client: &reqwest::Client, url: &str) -> Result<RotationTable> {
    info!("Fetching rotations from {}", url);

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(MadDbError::HttpStatus {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.text().await?;
    let table = parse_rotation_list(&body);

    info!("Fetched {} rotations", table.len());
    Ok(table)
}

/// Read the rotation list from a local file instead of the network
pub fn load_rotations(path: &Path) -> Result<RotationTable> {
    info!("Loading rotations from {}", path.display());

    let body = std::fs::read_to_string(path)?;
    let table = parse_rotation_list(&body);

    info!("Loaded {} rotations", table.len());
    Ok(table)
}
