//! On-disk library of map configuration documents.

use crate::model::MapConfig;
use crate::{GemmazeError, GemmazeResult};
use std::fs;
use std::path::{Path, PathBuf};

/// A directory of numbered map documents (`NNN_config.toml`), addressed by
/// progression index modulo the library size.
pub struct MapLibrary {
    dir: PathBuf,
}

impl MapLibrary {
    /// Creates a library rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Library directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Sorted paths of all map documents in the library.
    pub fn document_paths(&self) -> GemmazeResult<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Number of documents in the library.
    pub fn count(&self) -> GemmazeResult<usize> {
        Ok(self.document_paths()?.len())
    }

    /// Loads the document at `index % count`, documents sorted by file
    /// name.
    ///
    /// Any failure (missing directory, empty library, unreadable or
    /// malformed document) is logged and reported as an absent
    /// configuration rather than escalated; callers treat `None` as
    /// "no reset possible".
    pub fn load_index(&self, index: u32) -> Option<MapConfig> {
        match self.try_load_index(index) {
            Ok(config) => Some(config),
            Err(err) => {
                log::error!("failed to load map configuration: {err}");
                None
            }
        }
    }

    fn try_load_index(&self, index: u32) -> GemmazeResult<MapConfig> {
        let paths = self.document_paths()?;
        if paths.is_empty() {
            return Err(GemmazeError::ConfigLoad(format!(
                "no map documents in {}",
                self.dir.display()
            )));
        }
        let path = &paths[index as usize % paths.len()];
        let text = fs::read_to_string(path)?;
        MapConfig::from_toml(&text)
            .map_err(|err| GemmazeError::ConfigLoad(format!("{}: {err}", path.display())))
    }

    /// Writes `config` as `{index:03}_config.toml`, creating the library
    /// directory if needed.
    ///
    /// Existing documents are left untouched; returns the path when a new
    /// document was written, `None` when one already existed.
    pub fn save_new(&self, index: u32, config: &MapConfig) -> GemmazeResult<Option<PathBuf>> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{index:03}_config.toml"));
        if path.exists() {
            return Ok(None);
        }
        fs::write(&path, config.to_toml()?)?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{utils, GenerationConfig, Generator, MapGenerator};

    fn generated_map(index: u32, seed: u64) -> MapConfig {
        let config = GenerationConfig::multi_level(seed);
        let mut rng = utils::create_rng(&config);
        MapGenerator::multi_level(index)
            .generate(&config, &mut rng)
            .unwrap()
    }

    #[test]
    fn test_empty_library_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let library = MapLibrary::new(dir.path());
        assert_eq!(library.count().unwrap(), 0);
        assert!(library.load_index(0).is_none());
    }

    #[test]
    fn test_missing_directory_loads_nothing() {
        let library = MapLibrary::new("/nonexistent/gemmaze-configs");
        assert!(library.load_index(0).is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let library = MapLibrary::new(dir.path());
        let map = generated_map(1, 31);

        let path = library.save_new(1, &map).unwrap().unwrap();
        assert_eq!(path.file_name().unwrap(), "001_config.toml");
        assert_eq!(library.load_index(0).unwrap(), map);
    }

    #[test]
    fn test_save_new_skips_existing_documents() {
        let dir = tempfile::tempdir().unwrap();
        let library = MapLibrary::new(dir.path());

        let first = generated_map(1, 1);
        let second = generated_map(1, 2);
        assert!(library.save_new(1, &first).unwrap().is_some());
        assert!(library.save_new(1, &second).unwrap().is_none());
        assert_eq!(library.load_index(0).unwrap(), first);
    }

    #[test]
    fn test_load_index_wraps_around() {
        let dir = tempfile::tempdir().unwrap();
        let library = MapLibrary::new(dir.path());

        let maps: Vec<MapConfig> = (1..=3).map(|i| generated_map(i, i as u64)).collect();
        for (i, map) in maps.iter().enumerate() {
            library.save_new(i as u32 + 1, map).unwrap();
        }

        assert_eq!(library.count().unwrap(), 3);
        assert_eq!(library.load_index(0).unwrap(), maps[0]);
        assert_eq!(library.load_index(4).unwrap(), maps[1]);
        assert_eq!(library.load_index(3).unwrap(), maps[0]);
    }

    #[test]
    fn test_malformed_document_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let library = MapLibrary::new(dir.path());
        fs::write(dir.path().join("001_config.toml"), "title = ").unwrap();
        assert!(library.load_index(0).is_none());
    }
}
