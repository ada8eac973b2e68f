//! Pipeline coordination.
//!
//! Sequences per-file processing through a fixed stage order — identity
//! assignment, classification, significance, metadata finalization,
//! validation — and aggregates statistics. Every stage except identity is
//! skippable; validation is fail-closed and rejects the whole file with
//! the full violation list.

mod stats;
pub mod validate;

pub use validate::validate_tree;

use crate::classify::{Classifier, ClassifierConfig};
use crate::error::{CanopyError, Result};
use crate::identity::{IdentityConfig, IdentityGenerator};
use crate::normalize::{NormalizationRegistry, NormalizeOptions, Normalizer};
use crate::significance::{FileContext, ScorerConfig, SignificanceScorer};
use canopy_api::models::{Language, ProcessedFile, RawNode};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, debug_span, warn};

/// Stage toggles and component configuration for one pipeline instance.
///
/// Identity assignment is not skippable: every output node needs an id
/// before validation.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub classification: bool,
    pub significance: bool,
    pub metadata: bool,
    pub validation: bool,
    pub max_depth: u32,
    pub keep_raw_type: bool,
    pub content_hashing: bool,
    pub identity: IdentityConfig,
    pub classifier: ClassifierConfig,
    pub scorer: ScorerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            classification: true,
            significance: true,
            metadata: true,
            validation: true,
            max_depth: 64,
            keep_raw_type: true,
            content_hashing: false,
            identity: IdentityConfig::default(),
            classifier: ClassifierConfig::default(),
            scorer: ScorerConfig::default(),
        }
    }
}

/// One file's worth of input for batch processing.
pub struct FileInput {
    pub raw: RawNode,
    pub language: Language,
    pub path: String,
    /// Export-aware context; inferred from the path when absent.
    pub context: Option<FileContext>,
}

/// The node processing pipeline: the core's single entry point.
///
/// Owns its component instances; independent pipelines never interfere.
pub struct Pipeline {
    identity: Arc<IdentityGenerator>,
    classifier: Arc<Classifier>,
    scorer: Arc<SignificanceScorer>,
    normalizer: Normalizer,
    options: NormalizeOptions,
    validation: bool,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let identity = Arc::new(IdentityGenerator::new(config.identity.clone()));
        let classifier = Arc::new(Classifier::new(config.classifier.clone()));
        let scorer = Arc::new(SignificanceScorer::new(config.scorer.clone()));
        Self::with_components(
            config,
            identity,
            classifier,
            scorer,
            NormalizationRegistry::builtin(),
        )
    }

    /// Build from caller-owned components, e.g. to share an identity
    /// generator or a custom language registry across pipelines.
    pub fn with_components(
        config: PipelineConfig,
        identity: Arc<IdentityGenerator>,
        classifier: Arc<Classifier>,
        scorer: Arc<SignificanceScorer>,
        registry: NormalizationRegistry,
    ) -> Self {
        let options = NormalizeOptions {
            max_depth: config.max_depth,
            keep_raw_type: config.keep_raw_type,
            content_hashing: config.content_hashing,
            classify: config.classification,
            score: config.significance,
            finalize_metadata: config.metadata,
        };
        let normalizer = Normalizer::new(
            identity.clone(),
            classifier.clone(),
            scorer.clone(),
            registry,
        );
        Self {
            identity,
            classifier,
            scorer,
            normalizer,
            options,
            validation: config.validation,
        }
    }

    /// Process one file, inferring file context from the path.
    pub fn process(
        &self,
        raw: &RawNode,
        language: &Language,
        file_path: &str,
    ) -> Result<ProcessedFile> {
        self.process_with_context(raw, language, file_path, &FileContext::for_path(file_path))
    }

    /// Process one file with caller-supplied context (e.g. export tables).
    pub fn process_with_context(
        &self,
        raw: &RawNode,
        language: &Language,
        file_path: &str,
        file: &FileContext,
    ) -> Result<ProcessedFile> {
        let _span = debug_span!("process_file", path = file_path, language = %language).entered();
        let started = Instant::now();

        let root = self
            .normalizer
            .normalize(raw, language, file_path, file, &self.options)?;
        debug!(nodes = root.node_count(), "normalization complete");

        if self.validation {
            let violations = validate_tree(&root);
            if !violations.is_empty() {
                warn!(count = violations.len(), "validation failed");
                return Err(CanopyError::Validation { violations });
            }
        }

        let stats = stats::collect(&root, started.elapsed());
        debug!(
            total = stats.total_nodes,
            max_depth = stats.max_depth,
            elapsed_ms = stats.duration_ms,
            "file processed"
        );
        Ok(ProcessedFile { root, stats })
    }

    /// Process many files with per-file isolation: one result per input,
    /// in input order; a failed file never aborts the rest.
    pub fn process_batch(&self, files: &[FileInput]) -> Vec<Result<ProcessedFile>> {
        files
            .par_iter()
            .map(|input| match &input.context {
                Some(context) => {
                    self.process_with_context(&input.raw, &input.language, &input.path, context)
                }
                None => self.process(&input.raw, &input.language, &input.path),
            })
            .collect()
    }

    pub fn identity(&self) -> &Arc<IdentityGenerator> {
        &self.identity
    }

    pub fn classifier(&self) -> &Arc<Classifier> {
        &self.classifier
    }

    pub fn scorer(&self) -> &Arc<SignificanceScorer> {
        &self.scorer
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
