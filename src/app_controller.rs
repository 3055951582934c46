use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::file_utils::{EpisodeFile, FileManager, SERIES_METADATA_FILE, SERIES_STATS_FILE};
use crate::pipeline::{EpisodeAnalyzer, SeriesAggregator};
use crate::stats::{EpisodeMeta, EpisodeStats, SeriesStats};
use crate::subtitle_processor::SubtitleParser;
use crate::tokenizer::Tokenizer;
use crate::vocabulary::VocabCorpus;

// @module: Application controller for batch statistics runs

/// Counts reported at the end of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub series_processed: usize,
    pub series_failed: usize,
    pub episodes_analyzed: usize,
    pub episodes_reused: usize,
    pub episodes_failed: usize,
}

impl BatchSummary {
    fn absorb(&mut self, other: &BatchSummary) {
        self.series_processed += other.series_processed;
        self.series_failed += other.series_failed;
        self.episodes_analyzed += other.episodes_analyzed;
        self.episodes_reused += other.episodes_reused;
        self.episodes_failed += other.episodes_failed;
    }
}

/// Outcome of one episode job
enum EpisodeOutcome {
    Analyzed(EpisodeStats),
    Reused(EpisodeStats),
    Empty,
    Failed,
}

/// Build the configured morphological analyzer
pub fn build_tokenizer(config: &Config) -> Result<Arc<dyn Tokenizer>> {
    #[cfg(feature = "vibrato")]
    {
        let tokenizer = crate::tokenizer::vibrato::VibratoTokenizer::from_path(
            &config.tokenizer.dictionary_path,
            config.tokenizer.feature_layout,
        )?;
        Ok(Arc::new(tokenizer))
    }

    #[cfg(not(feature = "vibrato"))]
    {
        Err(anyhow!(
            "No tokenizer backend compiled in (dictionary {}); rebuild with the `vibrato` feature",
            config.tokenizer.dictionary_path
        ))
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Shared per-episode pipeline
    analyzer: Arc<EpisodeAnalyzer>,

    // @field: Series fold
    aggregator: SeriesAggregator,
}

impl Controller {
    // @method: Create a controller, loading the corpus and dictionary named in the configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let corpus = VocabCorpus::load(&config.corpus_path)
            .with_context(|| format!("Failed to load vocabulary corpus: {}", config.corpus_path))?;
        let tokenizer = build_tokenizer(&config)?;
        Self::with_backends(config, tokenizer, Arc::new(corpus))
    }

    // @method: Create a controller around already constructed backends
    pub fn with_backends(config: Config, tokenizer: Arc<dyn Tokenizer>, corpus: Arc<VocabCorpus>) -> Result<Self> {
        let analyzer = EpisodeAnalyzer::from_config(&config, tokenizer, corpus)?;
        let aggregator = SeriesAggregator::new(analyzer.resolver().clone());
        Ok(Self {
            config,
            analyzer: Arc::new(analyzer),
            aggregator,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze a single subtitle file
    pub async fn analyze_file(&self, path: &Path) -> Result<Option<EpisodeStats>> {
        let analyzer = self.analyzer.clone();
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || -> Result<Option<EpisodeStats>> {
            let events = SubtitleParser::parse_file(&path)?;
            Ok(analyzer.analyze_events(&events))
        })
        .await
        .context("Analysis task panicked")?
    }

    /// Process every series directory under `raw_dir`
    ///
    /// Each subdirectory is a series; its subtitle files named by episode
    /// number are analyzed concurrently and written to `out_dir/<series>/`.
    /// A series failing does not stop the others.
    pub async fn run_folder(&self, raw_dir: &Path, out_dir: &Path, force_overwrite: bool, only_series: &[String]) -> Result<BatchSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(raw_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", raw_dir));
        }

        let series_dirs: Vec<PathBuf> = FileManager::list_subdirs(raw_dir)?
            .into_iter()
            .filter(|dir| {
                only_series.is_empty() || only_series.iter().any(|name| dir.file_name().is_some_and(|f| f == name.as_str()))
            })
            .collect();

        if series_dirs.is_empty() {
            return Err(anyhow!("No series directories found in: {:?}", raw_dir));
        }

        let multi_progress = MultiProgress::new();
        let mut summary = BatchSummary::default();

        for series_dir in &series_dirs {
            let series_name = Self::series_name(series_dir);
            let series_out = out_dir.join(&series_name);

            match self.run_series(series_dir, &series_out, force_overwrite, &multi_progress).await {
                Ok(series_summary) => summary.absorb(&series_summary),
                Err(e) => {
                    error!("Error processing series {}: {:#}", series_name, e);
                    summary.series_failed += 1;
                }
            }
        }

        info!(
            "Batch completed in {:.1}s: {} series ({} failed), {} episodes analyzed, {} reused, {} failed",
            start_time.elapsed().as_secs_f64(),
            summary.series_processed,
            summary.series_failed,
            summary.episodes_analyzed,
            summary.episodes_reused,
            summary.episodes_failed
        );

        Ok(summary)
    }

    /// Analyze one series directory and write its statistics
    pub async fn run_series(&self, series_dir: &Path, series_out: &Path, force_overwrite: bool, multi_progress: &MultiProgress) -> Result<BatchSummary> {
        let series_name = Self::series_name(series_dir);
        let episodes = FileManager::find_episode_files(series_dir)?;
        if episodes.is_empty() {
            return Err(anyhow!("No episode subtitle files in {:?}", series_dir));
        }

        FileManager::ensure_dir(series_out)?;
        let metadata_path = series_dir.join(SERIES_METADATA_FILE);
        let series_title = Self::series_title(&metadata_path).unwrap_or_else(|| series_name.clone());
        if FileManager::file_exists(&metadata_path) {
            FileManager::copy_file(&metadata_path, series_out.join(SERIES_METADATA_FILE))?;
        }

        let progress_bar = multi_progress.add(ProgressBar::new(episodes.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} episodes ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message(series_name.clone());

        let workers = self.config.batch.workers.max(1);
        let mut results: Vec<(u32, EpisodeOutcome)> = stream::iter(episodes)
            .map(|episode| {
                let analyzer = self.analyzer.clone();
                let output_path = series_out.join(format!("{}.json", episode.episode_number));
                let meta = EpisodeMeta {
                    episode_number: episode.episode_number,
                    series_title: series_title.clone(),
                    filename: episode
                        .path
                        .file_name()
                        .map(|f| f.to_string_lossy().to_string())
                        .unwrap_or_default(),
                };
                let progress_bar = progress_bar.clone();

                async move {
                    let number = episode.episode_number;
                    let outcome = Self::process_episode(analyzer, episode, output_path, meta, force_overwrite).await;
                    progress_bar.inc(1);
                    (number, outcome)
                }
            })
            .buffer_unordered(workers)
            .collect()
            .await;

        // Every episode future has finished; aggregate in episode order
        results.sort_by_key(|(number, _)| *number);
        progress_bar.finish_with_message(format!("{} done", series_name));

        let mut summary = BatchSummary {
            series_processed: 1,
            ..BatchSummary::default()
        };
        let mut episode_stats = Vec::with_capacity(results.len());
        for (_, outcome) in results {
            match outcome {
                EpisodeOutcome::Analyzed(stats) => {
                    summary.episodes_analyzed += 1;
                    episode_stats.push(stats);
                }
                EpisodeOutcome::Reused(stats) => {
                    summary.episodes_reused += 1;
                    episode_stats.push(stats);
                }
                EpisodeOutcome::Empty | EpisodeOutcome::Failed => summary.episodes_failed += 1,
            }
        }

        match self.aggregator.aggregate(&episode_stats) {
            Some(series_stats) => {
                FileManager::write_json(series_out.join(SERIES_STATS_FILE), &series_stats)?;
                info!(
                    "{}: {} episodes, {} unique words, jr difficulty {}",
                    series_name, series_stats.episode_count, series_stats.unique_words, series_stats.jr_difficulty
                );
            }
            None => warn!("{}: no episode produced statistics, skipping series aggregate", series_name),
        }

        Ok(summary)
    }

    async fn process_episode(
        analyzer: Arc<EpisodeAnalyzer>,
        episode: EpisodeFile,
        output_path: PathBuf,
        meta: EpisodeMeta,
        force_overwrite: bool,
    ) -> EpisodeOutcome {
        if FileManager::file_exists(&output_path) && !force_overwrite {
            match FileManager::read_json::<_, EpisodeStats>(&output_path) {
                Ok(stats) => {
                    debug!("Reusing existing statistics {:?} (use -f to recompute)", output_path);
                    return EpisodeOutcome::Reused(stats);
                }
                Err(e) => warn!("Recomputing unreadable statistics file {:?}: {:#}", output_path, e),
            }
        }

        let source = episode.path.clone();
        let result = tokio::task::spawn_blocking(move || -> Result<Option<EpisodeStats>> {
            let events = SubtitleParser::parse_file(&episode.path)?;
            Ok(analyzer.analyze_events(&events))
        })
        .await;

        match result {
            Ok(Ok(Some(mut stats))) => {
                stats.meta = Some(meta);
                if let Err(e) = FileManager::write_json(&output_path, &stats) {
                    error!("Failed to write {:?}: {:#}", output_path, e);
                    return EpisodeOutcome::Failed;
                }
                EpisodeOutcome::Analyzed(stats)
            }
            Ok(Ok(None)) => {
                warn!("No statistics for {:?}: no usable text", source);
                EpisodeOutcome::Empty
            }
            Ok(Err(e)) => {
                warn!("Skipping {:?}: {:#}", source, e);
                EpisodeOutcome::Failed
            }
            Err(e) => {
                error!("Analysis of {:?} panicked: {}", source, e);
                EpisodeOutcome::Failed
            }
        }
    }

    /// Rebuild `series.json` from episode files already in `stats_dir`
    ///
    /// Episodes carrying a raw ML prediction but no scaled ML difficulty are
    /// scaled and rewritten first.
    pub fn aggregate_dir(&self, stats_dir: &Path) -> Result<Option<SeriesStats>> {
        let mut episodes = Vec::new();
        for path in FileManager::find_files(stats_dir, "json")? {
            if FileManager::episode_number(&path).is_none() {
                continue;
            }
            let mut stats: EpisodeStats = FileManager::read_json(&path)?;
            if let Some(raw) = stats.raw_ml_difficulty {
                if stats.ml_difficulty == 0.0 {
                    stats.apply_ml_prediction(raw);
                    FileManager::write_json(&path, &stats)?;
                }
            }
            episodes.push(stats);
        }

        let series_stats = self.aggregator.aggregate(&episodes);
        if let Some(series_stats) = &series_stats {
            FileManager::write_json(stats_dir.join(SERIES_STATS_FILE), series_stats)?;
            info!("Aggregated {} episodes in {:?}", series_stats.episode_count, stats_dir);
        } else {
            warn!("No episode statistics found in {:?}", stats_dir);
        }
        Ok(series_stats)
    }

    fn series_name(series_dir: &Path) -> String {
        series_dir
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Japanese title from the series metadata file, then the plain title
    fn series_title(metadata_path: &Path) -> Option<String> {
        let metadata: serde_json::Value = FileManager::read_json(metadata_path).ok()?;
        ["title_jp", "title"]
            .iter()
            .find_map(|key| metadata.get(*key)?.as_str().map(str::to_string))
    }
}
