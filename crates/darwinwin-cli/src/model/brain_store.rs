use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::{DateTime, Utc};
use darwinwin_engine::Brain;

const EXTENSION: &str = "brain";

/// Directory of serialized brains, one file per save.
///
/// Files are named after the UTC time of the save, so the lexicographically greatest
/// name is the newest brain.
#[derive(Debug, Clone)]
pub(crate) struct BrainStore {
    dir: PathBuf,
}

impl BrainStore {
    pub(crate) fn open<P>(dir: P) -> anyhow::Result<Self>
    where
        P: Into<PathBuf>,
    {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create brain directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(time: DateTime<Utc>) -> String {
        format!("{}.{EXTENSION}", time.format("%Y%m%dT%H%M%S%.6fZ"))
    }

    pub(crate) fn save(&self, brain: &Brain) -> anyhow::Result<PathBuf> {
        let path = self.dir.join(Self::file_name(Utc::now()));
        fs::write(&path, brain.to_bytes())
            .with_context(|| format!("Failed to write brain file: {}", path.display()))?;
        Ok(path)
    }

    /// Path of the newest brain file, if any.
    pub(crate) fn latest_path(&self) -> anyhow::Result<Option<PathBuf>> {
        let entries = fs::read_dir(&self.dir).with_context(|| {
            format!("Failed to read brain directory: {}", self.dir.display())
        })?;

        let mut latest: Option<PathBuf> = None;
        for entry in entries {
            let path = entry
                .with_context(|| format!("Failed to read entry in {}", self.dir.display()))?
                .path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != EXTENSION) {
                continue;
            }
            if latest
                .as_ref()
                .is_none_or(|current| path.file_name() > current.file_name())
            {
                latest = Some(path);
            }
        }
        Ok(latest)
    }

    pub(crate) fn load(path: &Path) -> anyhow::Result<Brain> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read brain file: {}", path.display()))?;
        let brain = Brain::from_bytes(&bytes)
            .with_context(|| format!("Failed to decode brain file: {}", path.display()))?;
        Ok(brain)
    }

    /// Loads the newest brain. Returns `None` if the store is empty.
    pub(crate) fn load_latest(&self) -> anyhow::Result<Option<(PathBuf, Brain)>> {
        let Some(path) = self.latest_path()? else {
            return Ok(None);
        };
        let brain = Self::load(&path)?;
        Ok(Some((path, brain)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn temp_store(name: &str) -> BrainStore {
        let dir = std::env::temp_dir().join(format!(
            "darwinwin-brain-store-{}-{name}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        BrainStore::open(dir).unwrap()
    }

    #[test]
    fn test_file_names_sort_by_time() {
        let earlier = Utc.with_ymd_and_hms(2024, 9, 30, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();
        let a = BrainStore::file_name(earlier);
        let b = BrainStore::file_name(later);
        assert_eq!(a, "20240930T235959.000000Z.brain");
        assert!(a < b);
    }

    #[test]
    fn test_empty_store_has_no_latest() {
        let store = temp_store("empty");
        assert!(store.load_latest().unwrap().is_none());
        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn test_load_latest_picks_newest_file() {
        let store = temp_store("latest");
        let mut rng = Pcg32::seed_from_u64(0);
        let old = Brain::random(&mut rng);
        let new = Brain::random(&mut rng);
        fs::write(store.dir().join("20200101T000000.000000Z.brain"), old.to_bytes()).unwrap();
        fs::write(store.dir().join("20210101T000000.000000Z.brain"), new.to_bytes()).unwrap();
        fs::write(store.dir().join("20300101T000000.000000Z.txt"), b"ignored").unwrap();

        let (path, brain) = store.load_latest().unwrap().unwrap();
        assert!(path.ends_with("20210101T000000.000000Z.brain"));
        assert_eq!(brain, new);

        let saved = store.save(&old).unwrap();
        assert_eq!(store.latest_path().unwrap(), Some(saved));
        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let store = temp_store("corrupt");
        fs::write(store.dir().join("20200101T000000.000000Z.brain"), [1, 2, 3]).unwrap();
        assert!(store.load_latest().is_err());
        fs::remove_dir_all(store.dir()).unwrap();
    }
}
