use serde::de::DeserializeOwned;
use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};
use thiserror::Error;
use zip::ZipArchive;

mod config;
pub mod models;
pub use config::*;
pub use models::*;

use crate::{geometry, repository};

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Could not find file with name: {0}")]
    FileNotFound(String),
    #[error("Invalid time {value:?} for train {train_id}")]
    InvalidTime { train_id: String, value: String },
    #[error("Invalid flag {value:?} for train {train_id}")]
    InvalidFlag { train_id: String, value: String },
    #[error("Step references unknown train {0}")]
    UnknownTrain(String),
    #[error("Invalid route: {0}")]
    Geometry(#[from] geometry::Error),
    #[error("Invalid snapshot: {0}")]
    Repository(#[from] repository::Error),
}

#[derive(Default, Debug, Clone)]
pub enum StorageType {
    #[default]
    None,
    Zip(PathBuf),
    Directory(PathBuf),
}

/// Streams the CSV files of a schedule feed.
#[derive(Default)]
pub struct FeedReader {
    config: Config,
    storage: StorageType,
}

impl FeedReader {
    pub fn new(config: self::Config) -> Self {
        Self {
            config,
            storage: Default::default(),
        }
    }

    pub fn from_zip(mut self, path: PathBuf) -> Self {
        self.storage = StorageType::Zip(path);
        self
    }

    pub fn from_directory(mut self, path: PathBuf) -> Self {
        self.storage = StorageType::Directory(path);
        self
    }

    /// Picks zip or directory storage depending on what `path` points at.
    pub fn from_path(self, path: PathBuf) -> Self {
        if path.is_dir() {
            self.from_directory(path)
        } else {
            self.from_zip(path)
        }
    }

    pub fn stream_stations<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, FeedStation)),
    {
        self.stream(&self.config.stations_file_name, f)
    }

    pub fn stream_route_points<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, FeedRoutePoint)),
    {
        self.stream(&self.config.routes_file_name, f)
    }

    pub fn stream_trains<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, FeedTrain)),
    {
        self.stream(&self.config.trains_file_name, f)
    }

    pub fn stream_steps<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, FeedStep)),
    {
        self.stream(&self.config.steps_file_name, f)
    }

    fn stream<T, F>(&self, file_name: &str, f: F) -> Result<(), self::Error>
    where
        T: DeserializeOwned,
        F: FnMut((usize, T)),
    {
        match &self.storage {
            StorageType::None => Ok(()),
            StorageType::Zip(path) => stream_from_zip(path, file_name, f),
            StorageType::Directory(path) => stream_from_directory(path, file_name, f),
        }
    }
}

fn stream_from_zip<T, F>(zip_path: &Path, file_name: &str, f: F) -> Result<(), self::Error>
where
    T: DeserializeOwned,
    F: FnMut((usize, T)),
{
    let zip_file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(zip_file)?;
    let index = archive
        .index_for_name(file_name)
        .ok_or(self::Error::FileNotFound(file_name.to_string()))?;
    let file = archive.by_index(index)?;
    stream_csv(file, f)
}

fn stream_from_directory<T, F>(directory: &Path, file_name: &str, f: F) -> Result<(), self::Error>
where
    T: DeserializeOwned,
    F: FnMut((usize, T)),
{
    let path = directory.join(file_name);
    if !path.is_file() {
        return Err(self::Error::FileNotFound(file_name.to_string()));
    }
    stream_csv(File::open(path)?, f)
}

fn stream_csv<R, T, F>(reader: R, mut f: F) -> Result<(), self::Error>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut((usize, T)),
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    for (i, record) in reader.deserialize().enumerate() {
        f((i, record?));
    }
    Ok(())
}
