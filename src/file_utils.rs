use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::subtitle_processor::SubtitleFormat;

// @module: File and directory utilities

/// Name of the per-series metadata file copied next to the statistics
pub const SERIES_METADATA_FILE: &str = "metadata.json";

/// Name of the aggregated series statistics file
pub const SERIES_STATS_FILE: &str = "series.json";

// @struct: Subtitle file found in a series directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeFile {
    pub episode_number: u32,
    pub path: PathBuf,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Episode number of a subtitle file whose stem is all digits
    pub fn episode_number<P: AsRef<Path>>(path: P) -> Option<u32> {
        let stem = path.as_ref().file_stem()?.to_str()?;
        if stem.is_empty() || !stem.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        stem.parse().ok()
    }

    /// Immediate subdirectories, sorted by name
    pub fn list_subdirs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut dirs = Vec::new();
        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            if entry.file_type().is_dir() {
                dirs.push(entry.into_path());
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    /// Find files with a specific extension directly inside a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let extension = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(extension) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Subtitle files named by episode number, ordered by episode
    ///
    /// When one episode exists in several formats the first extension in
    /// `SubtitleFormat::EXTENSIONS` order wins.
    pub fn find_episode_files<P: AsRef<Path>>(dir: P) -> Result<Vec<EpisodeFile>> {
        let mut episodes: Vec<EpisodeFile> = Vec::new();
        for ext in SubtitleFormat::EXTENSIONS {
            for path in Self::find_files(dir.as_ref(), ext)? {
                let Some(episode_number) = Self::episode_number(&path) else {
                    continue;
                };
                if episodes.iter().any(|e| e.episode_number == episode_number) {
                    continue;
                }
                episodes.push(EpisodeFile { episode_number, path });
            }
        }
        episodes.sort_by_key(|e| e.episode_number);
        Ok(episodes)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Copy a file from one location to another, ensuring the target directory exists
    pub fn copy_file<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, to: P2) -> Result<()> {
        let from = from.as_ref();
        let to = to.as_ref();

        if !from.exists() {
            return Err(anyhow::anyhow!("Source file does not exist: {:?}", from));
        }

        if let Some(parent) = to.parent() {
            Self::ensure_dir(parent)?;
        }

        fs::copy(from, to).with_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;

        Ok(())
    }

    /// Serialize a value as pretty JSON
    pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
        Self::write_to_file(path, &json)
    }

    /// Deserialize a JSON file
    pub fn read_json<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> Result<T> {
        let content = Self::read_to_string(&path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON file: {:?}", path.as_ref()))
    }
}
