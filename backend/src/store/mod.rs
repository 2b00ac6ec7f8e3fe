//! Dataset store - flat JSON files on disk.
//!
//! One directory holds the three artifacts of an import run:
//!
//! | File | Content |
//! |---|---|
//! | `schools.json` | `[School]` |
//! | `observations.json` | `[Observation]` |
//! | `aggregates.json` | `[Aggregates]` |
//!
//! Files are pretty printed and rewritten whole on every save.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::models::{Aggregates, Observation, School};

pub const SCHOOLS_FILE: &str = "schools.json";
pub const OBSERVATIONS_FILE: &str = "observations.json";
pub const AGGREGATES_FILE: &str = "aggregates.json";

/// Everything an import run produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Schools in first-seen order
    pub schools: Vec<School>,
    pub observations: Vec<Observation>,
    pub aggregates: Vec<Aggregates>,
}

impl Dataset {
    pub fn school(&self, code: &str) -> Option<&School> {
        self.schools.iter().find(|s| s.school_code == code)
    }

    pub fn observations_for(&self, code: &str) -> Vec<Observation> {
        self.observations
            .iter()
            .filter(|o| o.school_code == code)
            .cloned()
            .collect()
    }

    pub fn aggregates_for(&self, code: &str) -> Option<&Aggregates> {
        self.aggregates.iter().find(|a| a.school_code == code)
    }
}

/// Reads and writes a [`Dataset`] in one directory.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    dir: PathBuf,
}

impl DatasetStore {
    /// Store rooted at `dir` (created on first save).
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        Self { dir: PathBuf::from(dir.as_ref()) }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// True when all three files are present.
    pub fn exists(&self) -> bool {
        [SCHOOLS_FILE, OBSERVATIONS_FILE, AGGREGATES_FILE]
            .iter()
            .all(|f| self.dir.join(f).is_file())
    }

    /// Write all three files.
    pub fn save(&self, dataset: &Dataset) -> StoreResult<()> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.display().to_string(),
            source,
        })?;

        self.write_json(SCHOOLS_FILE, &dataset.schools)?;
        self.write_json(OBSERVATIONS_FILE, &dataset.observations)?;
        self.write_json(AGGREGATES_FILE, &dataset.aggregates)?;
        Ok(())
    }

    /// Read all three files. Observations are reclassified from their
    /// scores; stored bands may be stale or missing.
    pub fn load(&self) -> StoreResult<Dataset> {
        let observations: Vec<Observation> = self.read_json(OBSERVATIONS_FILE)?;
        Ok(Dataset {
            schools: self.read_json(SCHOOLS_FILE)?,
            observations: observations.into_iter().map(Observation::reclassified).collect(),
            aggregates: self.read_json(AGGREGATES_FILE)?,
        })
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> StoreResult<()> {
        let path = self.dir.join(file);
        let content = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
            path: path.display().to_string(),
            source,
        })?;
        fs::write(&path, content).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> StoreResult<T> {
        let path = self.dir.join(file);
        let content = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_all;
    use crate::models::{GradeLevel, PriorityBand, Subject};
    use tempfile::tempdir;

    fn dataset() -> Dataset {
        let observations = vec![
            Observation::new("101", GradeLevel::SIX, Subject::English, "Vocabulary", 4.5),
            Observation::new("202", GradeLevel::EIGHT, Subject::SocialScience, "Understanding Local governance", 7.0),
        ];
        Dataset {
            schools: vec![
                School { school_code: "101".into(), school_name: "GPS Banar".into() },
                School { school_code: "202".into(), school_name: "GUPS Mandore".into() },
            ],
            aggregates: aggregate_all(&observations),
            observations,
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::with_dir(dir.path().join("nested"));
        assert!(!store.exists());

        store.save(&dataset()).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), dataset());
    }

    #[test]
    fn test_file_shapes() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::with_dir(dir.path());
        store.save(&dataset()).unwrap();

        let raw = fs::read_to_string(dir.path().join(OBSERVATIONS_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[1]["subject"], "Social Science");
        assert_eq!(value[1]["priority_band"], "Low");

        let raw = fs::read_to_string(dir.path().join(AGGREGATES_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value[0]["grade_avg_map"]["7"].is_null());
        assert_eq!(value[0]["subject_avg_map"]["English"], 4.5);
    }

    #[test]
    fn test_missing_dir_is_io_error() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::with_dir(dir.path().join("absent"));
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(err.to_string().contains(SCHOOLS_FILE));
    }

    #[test]
    fn test_corrupt_file_is_json_error() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::with_dir(dir.path());
        store.save(&dataset()).unwrap();
        fs::write(dir.path().join(AGGREGATES_FILE), "{ nope").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Json { .. })));
    }

    #[test]
    fn test_load_reclassifies_legacy_bands() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::with_dir(dir.path());
        store.save(&dataset()).unwrap();

        // Legacy rows: `score_10`, one without a band, one with a stale band
        let legacy = serde_json::json!([
            { "school_code": "101", "grade_level": 6, "subject": "English",
              "competency_name": "Vocabulary", "score_10": 9.0 },
            { "school_code": "101", "grade_level": 6, "subject": "English",
              "competency_name": "Reading Comprehension", "score_10": 6.5, "priority_band": "High" }
        ]);
        fs::write(dir.path().join(OBSERVATIONS_FILE), legacy.to_string()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.observations[0].score, 9.0);
        assert_eq!(loaded.observations[0].priority_band, PriorityBand::Low);
        assert_eq!(loaded.observations[1].priority_band, PriorityBand::Medium);
    }

    #[test]
    fn test_dataset_lookups() {
        let data = dataset();
        assert_eq!(data.school("202").unwrap().school_name, "GUPS Mandore");
        assert_eq!(data.observations_for("101").len(), 1);
        assert_eq!(data.aggregates_for("202").unwrap().overall_avg, Some(7.0));
        assert!(data.school("999").is_none());
    }
}
