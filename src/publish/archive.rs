//! Artifact packaging: JSON database, deterministic zip, MD5 sidecar

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::model::Database;
use crate::Result;

pub const JSON_FILE: &str = "mad_db.json";
pub const ZIP_FILE: &str = "mad_db.json.zip";
pub const MD5_FILE: &str = "mad_db.json.zip.md5";

/// 1980-01-01T00:00:00Z, the earliest instant a zip entry can record
pub const FIXED_TIMESTAMP: i64 = 315_532_800;

const DEFLATE_MAX_LEVEL: i64 = 9;

/// Paths of the files produced by one run plus the archive digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub json: PathBuf,
    pub zip: PathBuf,
    pub md5: PathBuf,
    pub digest: String,
}

/// Serialize the database as JSON with sorted keys
pub fn write_json(database: &Database, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, database)?;
    writer.flush()?;
    Ok(())
}

/// Set access and modification time to `FIXED_TIMESTAMP`
pub fn pin_timestamp(path: &Path) -> Result<()> {
    let time = FileTime::from_unix_time(FIXED_TIMESTAMP, 0);
    filetime::set_file_times(path, time, time)?;
    Ok(())
}

/// Deflate `source` at maximum compression into a single-entry zip at `dest`.
///
/// Entry metadata is fixed so identical input produces identical bytes.
pub fn zip_file(source: &Path, dest: &Path, entry_name: &str) -> Result<()> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(DEFLATE_MAX_LEVEL))
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut zip = ZipWriter::new(File::create(dest)?);
    zip.start_file(entry_name, options)?;
    io::copy(&mut File::open(source)?, &mut zip)?;
    zip.finish()?;
    Ok(())
}

/// Hex MD5 of a file, streamed in 8 KiB chunks
pub fn md5_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut context = md5::Context::new();
    let mut buffer = [0; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        context.consume(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", context.compute()))
}

/// Write `mad_db.json`, `mad_db.json.zip` and `mad_db.json.zip.md5` into `out_dir`
pub fn write_artifacts(database: &Database, out_dir: &Path) -> Result<Artifacts> {
    std::fs::create_dir_all(out_dir)?;

    let json = out_dir.join(JSON_FILE);
    let zip = out_dir.join(ZIP_FILE);
    let md5 = out_dir.join(MD5_FILE);

    write_json(database, &json)?;
    pin_timestamp(&json)?;
    zip_file(&json, &zip, JSON_FILE)?;

    let digest = md5_file(&zip)?;
    std::fs::write(&md5, &digest)?;

    info!(
        "Wrote {} records to {} (md5 {})",
        database.len(),
        zip.display(),
        digest
    );

    Ok(Artifacts {
        json,
        zip,
        md5,
        digest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_md5_of_known_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.txt");
        std::fs::write(&path, "hello world").unwrap();

        assert_eq!(md5_file(&path).unwrap(), "5eb63bbbe01eeed093cb22bb8f5acdc3");
    }

    #[test]
    fn test_md5_spans_multiple_chunks() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("big.bin");
        let content = vec![b'a'; 8192 * 3 + 17];
        std::fs::write(&path, &content).unwrap();

        assert_eq!(
            md5_file(&path).unwrap(),
            format!("{:x}", md5::compute(&content))
        );
    }

    #[test]
    fn test_pin_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("file.json");
        std::fs::write(&path, "{}").unwrap();

        pin_timestamp(&path).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        let mtime = FileTime::from_last_modification_time(&metadata);
        assert_eq!(mtime.unix_seconds(), FIXED_TIMESTAMP);
    }

    #[test]
    fn test_write_json_sorted_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(JSON_FILE);

        let mut database = Database::new();
        database.insert("zzz".to_string(), Default::default());
        database.insert(
            "aaa".to_string(),
            crate::model::SetRecord::with_rotation(270),
        );
        write_json(&database, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, r#"{"aaa":{"rotation":270},"zzz":{}}"#);
    }
}
