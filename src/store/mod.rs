//! Durable columnar storage for the pipeline's tabular artifacts.
//!
//! Artifacts are parquet files named `<name>.parquet` under one data
//! directory. There is no schema versioning: callers know the shape of what
//! they stored.

pub mod error;

use crate::store::error::StoreError;
use log::info;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tokio::{fs, task};

/// Artifact name of the station reference table.
pub const STATIONS_ARTIFACT: &str = "stations";
/// Artifact name of the UTM-projected station table.
pub const STATIONS_UTM_ARTIFACT: &str = "stations_utm";
/// Artifact name of the normalized observation table.
pub const OBSERVATIONS_ARTIFACT: &str = "observations";

/// Reads and writes named tabular artifacts under a fixed directory.
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::DirCreation(dir.clone(), e))?;
        Ok(Self { dir })
    }

    /// The directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.parquet"))
    }

    /// Persists a dataset under `name`, replacing any previous artifact with
    /// that name.
    pub async fn save(&self, name: &str, frame: DataFrame) -> Result<(), StoreError> {
        let path = self.path_for(name);
        info!("Persisting artifact '{}' to {:?}", name, path);
        task::spawn_blocking(move || {
            let mut df = frame;
            let file = std::fs::File::create(&path)
                .map_err(|e| StoreError::WriteIo(path.clone(), e))?;
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map_err(|e| StoreError::WritePolars(path, e))?;
            Ok::<(), StoreError>(())
        })
        .await??;
        Ok(())
    }

    /// Loads the dataset stored under `name`.
    ///
    /// Fails with [`StoreError::NotFound`] when no artifact with that name
    /// exists.
    pub async fn load(&self, name: &str) -> Result<DataFrame, StoreError> {
        let path = self.path_for(name);
        if fs::metadata(&path).await.is_err() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        info!("Loading artifact '{}' from {:?}", name, path);
        let frame = task::spawn_blocking(move || {
            LazyFrame::scan_parquet(&path, Default::default())
                .and_then(LazyFrame::collect)
                .map_err(|e| StoreError::ReadPolars(path.clone(), e))
        })
        .await??;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("id".into(), vec!["a", "b", "c"]),
            Column::new("value".into(), vec![1.5f64, -2.0, 0.25]),
            Column::new("count".into(), vec![3i32, 0, 7]),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = DataStore::new(dir.path()).await.unwrap();
        let frame = sample_frame();

        store.save("sample", frame.clone()).await.unwrap();
        let loaded = store.load("sample").await.unwrap();
        assert!(loaded.equals(&frame));
    }

    #[tokio::test]
    async fn load_of_absent_artifact_is_not_found() {
        let dir = tempdir().unwrap();
        let store = DataStore::new(dir.path()).await.unwrap();

        let err = store.load("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(name) if name == "nope"));
    }

    #[tokio::test]
    async fn save_overwrites_previous_artifact() {
        let dir = tempdir().unwrap();
        let store = DataStore::new(dir.path()).await.unwrap();

        store.save("sample", sample_frame()).await.unwrap();
        let replacement = DataFrame::new(vec![Column::new("id".into(), vec!["only"])]).unwrap();
        store.save("sample", replacement.clone()).await.unwrap();

        let loaded = store.load("sample").await.unwrap();
        assert!(loaded.equals(&replacement));
    }

    #[tokio::test]
    async fn store_creates_its_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("data").join("inner");
        let store = DataStore::new(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }
}
