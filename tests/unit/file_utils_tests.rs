/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use kotoba_stats::file_utils::FileManager;
use kotoba_stats::stats::{EpisodeMeta, EpisodeStats};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));
    assert!(FileManager::dir_exists(temp_dir.path()));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

#[test]
fn test_episode_number_withVariousStems_shouldOnlyAcceptDigits() {
    assert_eq!(FileManager::episode_number(Path::new("raw/show/12.srt")), Some(12));
    assert_eq!(FileManager::episode_number(Path::new("007.ass")), Some(7));
    assert_eq!(FileManager::episode_number(Path::new("extra.srt")), None);
    assert_eq!(FileManager::episode_number(Path::new("1a.srt")), None);
    assert_eq!(FileManager::episode_number(Path::new("series.json")), None);
}

/// Episodes are found once each, in numeric order, with ASS preferred
#[test]
fn test_find_episode_files_withMixedFiles_shouldOrderByEpisode() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "10.srt", "x")?;
    common::create_test_file(dir, "2.srt", "x")?;
    common::create_test_file(dir, "2.ass", "x")?;
    common::create_test_file(dir, "1.vtt", "x")?;
    common::create_test_file(dir, "notes.txt", "x")?;
    common::create_test_file(dir, "ova.srt", "x")?;
    common::create_test_file(dir, "nested/3.srt", "x")?;

    let episodes = FileManager::find_episode_files(dir)?;
    let found: Vec<(u32, String)> = episodes
        .iter()
        .map(|e| (e.episode_number, e.path.file_name().unwrap().to_string_lossy().to_string()))
        .collect();

    assert_eq!(
        found,
        vec![
            (1, "1.vtt".to_string()),
            (2, "2.ass".to_string()),
            (10, "10.srt".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn test_list_subdirs_withFilesAndDirs_shouldListOnlyDirsSorted() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    fs::create_dir(temp_dir.path().join("b_series"))?;
    fs::create_dir(temp_dir.path().join("a_series"))?;
    common::create_test_file(temp_dir.path(), "readme.txt", "x")?;

    let dirs = FileManager::list_subdirs(temp_dir.path())?;
    let names: Vec<String> = dirs
        .iter()
        .map(|d| d.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a_series", "b_series"]);
    Ok(())
}

#[test]
fn test_write_and_read_json_withEpisodeStats_shouldRoundTripThroughDisk() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out/show/1.json");

    let stats = EpisodeStats {
        total_words: 42,
        meta: Some(EpisodeMeta {
            episode_number: 1,
            series_title: "show".to_string(),
            filename: "1.srt".to_string(),
        }),
        ..EpisodeStats::default()
    };
    FileManager::write_json(&path, &stats)?;

    assert!(FileManager::file_exists(&path));
    let loaded: EpisodeStats = FileManager::read_json(&path)?;
    assert_eq!(loaded, stats);
    Ok(())
}

#[test]
fn test_read_json_withInvalidContent_shouldFailWithPath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "bad.json", "not json")?;

    let error = FileManager::read_json::<_, EpisodeStats>(&path).unwrap_err();
    assert!(format!("{:#}", error).contains("bad.json"));
    Ok(())
}

#[test]
fn test_copy_file_withMissingSource_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let result = FileManager::copy_file(temp_dir.path().join("missing.json"), temp_dir.path().join("copy.json"));
    assert!(result.is_err());

    let source = common::create_test_file(temp_dir.path(), "metadata.json", "{}")?;
    FileManager::copy_file(&source, temp_dir.path().join("out/metadata.json"))?;
    assert_eq!(FileManager::read_to_string(temp_dir.path().join("out/metadata.json"))?, "{}");
    Ok(())
}
