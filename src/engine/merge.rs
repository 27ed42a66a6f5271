//! Rotation backfill

use tracing::info;

use crate::model::{Database, RotationTable};

/// Overlay the rotation table onto the database.
///
/// Every set in the table ends up in the database, created empty when no MAD
/// file described it. A rotation that came from a MAD file is never replaced.
/// Returns how many records received their rotation from the table.
pub fn merge_rotations(database: &mut Database, rotations: &RotationTable) -> usize {
    let mut backfilled = 0;

    for (setname, &degrees) in rotations {
        let record = database.entry(setname.clone()).or_default();
        if record.rotation.is_none() {
            record.rotation = Some(degrees);
            backfilled += 1;
        }
    }

    info!(
        "Backfilled {} rotations from a table of {}",
        backfilled,
        rotations.len()
    );
    backfilled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SetRecord;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_existing_rotation_is_kept() {
        let mut database = Database::new();
        database.insert("foo".to_string(), SetRecord::with_rotation(90));
        let before = database.clone();

        let rotations: RotationTable = [("foo".to_string(), 270)].into_iter().collect();
        assert_eq!(merge_rotations(&mut database, &rotations), 0);
        assert_eq!(database, before);
    }

    #[test]
    fn test_missing_set_is_created() {
        let mut database = Database::new();
        let rotations: RotationTable = [("bar".to_string(), 180)].into_iter().collect();

        assert_eq!(merge_rotations(&mut database, &rotations), 1);
        assert_eq!(database.get("bar"), Some(&SetRecord::with_rotation(180)));
    }

    #[test]
    fn test_record_without_rotation_is_filled() {
        let mut database = Database::new();
        database.insert(
            "sf2".to_string(),
            SetRecord {
                year: Some("1991".to_string()),
                ..SetRecord::default()
            },
        );

        let rotations: RotationTable = [("sf2".to_string(), 0)].into_iter().collect();
        merge_rotations(&mut database, &rotations);

        assert_eq!(
            database["sf2"],
            SetRecord {
                rotation: Some(0),
                year: Some("1991".to_string()),
                ..SetRecord::default()
            }
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut database = Database::new();
        let rotations: RotationTable = [("a".to_string(), 90), ("b".to_string(), 270)]
            .into_iter()
            .collect();

        merge_rotations(&mut database, &rotations);
        let once = database.clone();
        assert_eq!(merge_rotations(&mut database, &rotations), 0);
        assert_eq!(database, once);
    }
}
