//! PreselectionStage: focus and context ranking per dataset, then merge.
//!
//! Both rankers run concurrently on the rayon pool; neither depends on the
//! other until the merge. Candidate ids are canonicalized with the dataset's
//! [`IdScheme`] before the merge so padded and unpadded forms of one image
//! meet in the set operations.

use std::collections::HashMap;
use std::time::Instant;

use mmirs_core::config::PreselectionConfig;
use mmirs_core::errors::{ConfigError, MmirsError, MmirsResult, Stage};
use mmirs_core::models::{CandidateList, DocumentScoreMap, IdScheme, MergeOp};
use tracing::{debug, info};

use crate::context::ContextRanker;
use crate::focus::FocusRanker;
use crate::merge::PreselectionMerger;

/// The rankers serving one dataset.
pub struct DatasetRankers {
    pub focus: FocusRanker,
    pub context: ContextRanker,
    pub id_scheme: IdScheme,
}

impl DatasetRankers {
    /// Rankers using the dataset's built-in id scheme.
    pub fn new(dataset: &str, focus: FocusRanker, context: ContextRanker) -> Self {
        let id_scheme = IdScheme::for_dataset(dataset);
        Self {
            focus: focus.with_id_scheme(id_scheme),
            context,
            id_scheme,
        }
    }

    pub fn with_id_scheme(mut self, id_scheme: IdScheme) -> Self {
        self.focus = self.focus.with_id_scheme(id_scheme);
        self.id_scheme = id_scheme;
        self
    }
}

/// One preselection query. Unset knobs fall back to [`PreselectionConfig`].
#[derive(Debug, Clone, Default)]
pub struct PreselectionRequest {
    pub focus: String,
    pub context: String,
    pub dataset: String,
    pub merge_op: Option<MergeOp>,
    pub max_num_focus_relevant: Option<usize>,
    pub max_num_context_relevant: Option<usize>,
    pub max_num_relevant: Option<usize>,
    pub min_num_relevant: Option<usize>,
    pub focus_weight_by_sim: Option<bool>,
    pub exact_context_retrieval: Option<bool>,
}

impl PreselectionRequest {
    pub fn new(
        focus: impl Into<String>,
        context: impl Into<String>,
        dataset: impl Into<String>,
    ) -> Self {
        Self {
            focus: focus.into(),
            context: context.into(),
            dataset: dataset.into(),
            ..Default::default()
        }
    }

    pub fn with_merge_op(mut self, merge_op: MergeOp) -> Self {
        self.merge_op = Some(merge_op);
        self
    }

    pub fn with_bounds(mut self, max_num_relevant: usize, min_num_relevant: usize) -> Self {
        self.max_num_relevant = Some(max_num_relevant);
        self.min_num_relevant = Some(min_num_relevant);
        self
    }
}

/// Owns the per-dataset rankers and the merger.
pub struct PreselectionStage {
    rankers: HashMap<String, DatasetRankers>,
    merger: PreselectionMerger,
    config: PreselectionConfig,
}

impl PreselectionStage {
    pub fn new(config: PreselectionConfig) -> Self {
        info!(
            merge_op = %config.merge_op,
            max_num_relevant = config.max_num_relevant,
            min_num_relevant = config.min_num_relevant,
            seeded = config.shuffle_seed.is_some(),
            "PreselectionStage initialized"
        );
        Self {
            rankers: HashMap::new(),
            merger: PreselectionMerger::new(config.shuffle_seed),
            config,
        }
    }

    /// Register the rankers for a dataset, replacing any earlier entry.
    pub fn with_dataset(mut self, dataset: impl Into<String>, rankers: DatasetRankers) -> Self {
        self.rankers.insert(dataset.into(), rankers);
        self
    }

    /// Datasets with registered rankers, sorted.
    pub fn datasets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rankers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn config(&self) -> &PreselectionConfig {
        &self.config
    }

    /// Rankers for `dataset`. An unregistered dataset is reported as a
    /// failure of `stage`, the first stage that would have needed it.
    fn rankers_for(&self, dataset: &str, stage: Stage) -> MmirsResult<&DatasetRankers> {
        self.rankers.get(dataset).ok_or_else(|| {
            MmirsError::from(ConfigError::DatasetNotRegistered {
                dataset: dataset.to_string(),
            })
            .in_stage(stage)
        })
    }

    /// Top-k context matches for `dataset`, ids canonicalized.
    pub fn retrieve_top_k_context_relevant_images(
        &self,
        context: &str,
        dataset: &str,
        k: usize,
        exact: bool,
    ) -> MmirsResult<DocumentScoreMap> {
        let rankers = self.rankers_for(dataset, Stage::Context)?;
        context_scores(rankers, context, k, exact)
    }

    /// Top-k focus matches for `dataset`, ids canonicalized.
    pub fn retrieve_top_k_focus_relevant_images(
        &self,
        focus: &str,
        dataset: &str,
        k: usize,
        weight_by_sim: bool,
    ) -> MmirsResult<DocumentScoreMap> {
        let rankers = self.rankers_for(dataset, Stage::Focus)?;
        focus_scores(rankers, focus, k, weight_by_sim)
    }

    /// Full preselection: both rankers concurrently, then the bounded merge.
    pub fn retrieve_relevant_images(
        &self,
        request: &PreselectionRequest,
    ) -> MmirsResult<CandidateList> {
        let start = Instant::now();
        let c = &self.config;
        let rankers = self.rankers_for(&request.dataset, Stage::Focus)?;

        let merge_op = request.merge_op.unwrap_or(c.merge_op);
        let max_num_relevant = request.max_num_relevant.unwrap_or(c.max_num_relevant);
        let min_num_relevant = request.min_num_relevant.unwrap_or(c.min_num_relevant);
        let focus_k = request
            .max_num_focus_relevant
            .unwrap_or(c.max_num_focus_relevant);
        let context_k = request
            .max_num_context_relevant
            .unwrap_or(c.max_num_context_relevant);
        let weight_by_sim = request.focus_weight_by_sim.unwrap_or(c.weight_by_sim);
        let exact = request
            .exact_context_retrieval
            .unwrap_or(c.exact_context_retrieval);

        let (context, focus) = rayon::join(
            || context_scores(rankers, &request.context, context_k, exact),
            || focus_scores(rankers, &request.focus, focus_k, weight_by_sim),
        );
        let (context, focus) = (context?, focus?);

        let candidates = self
            .merger
            .merge(&focus, &context, merge_op, max_num_relevant, min_num_relevant)
            .map_err(|e| e.in_stage(Stage::Merge))?;

        info!(
            dataset = %request.dataset,
            %merge_op,
            focus = focus.len(),
            context = context.len(),
            candidates = candidates.len(),
            truncated = candidates.was_truncated(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "preselection complete"
        );
        Ok(candidates)
    }
}

fn context_scores(
    rankers: &DatasetRankers,
    context: &str,
    k: usize,
    exact: bool,
) -> MmirsResult<DocumentScoreMap> {
    let scores = rankers
        .context
        .rank(context, k, exact)
        .map_err(|e| e.in_stage(Stage::Context))?;
    let normalized = scores.normalized(&rankers.id_scheme);
    debug!(raw = scores.len(), normalized = normalized.len(), "context ids canonicalized");
    Ok(normalized)
}

fn focus_scores(
    rankers: &DatasetRankers,
    focus: &str,
    k: usize,
    weight_by_sim: bool,
) -> MmirsResult<DocumentScoreMap> {
    let scores = rankers
        .focus
        .rank(focus, k, weight_by_sim)
        .map_err(|e| e.in_stage(Stage::Focus))?;
    let normalized = scores.normalized(&rankers.id_scheme);
    debug!(raw = scores.len(), normalized = normalized.len(), "focus ids canonicalized");
    Ok(normalized)
}
