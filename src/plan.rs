//! Cleaning plans: an ordered sequence of steps loaded from YAML.
//!
//! A plan carries an optional classification map (column name to declared
//! kind) applied before any step, followed by the steps themselves. Steps
//! run in order against a [`DatasetSession`]; transform steps are
//! best-effort per column and merge their failures into one report, while
//! structural steps (column deletion) abort the plan on failure.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    classify::ColumnKind,
    error::BatchReport,
    session::DatasetSession,
    transform::ColumnRequest,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningPlan {
    /// Declared classifications applied before the first step.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub classify: BTreeMap<String, ColumnKind>,
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<PlanStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanStep {
    DeleteColumns { columns: Vec<String> },
    Transform { requests: Vec<ColumnRequest> },
}

impl CleaningPlan {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Reading cleaning plan {path:?}"))?;
        serde_yaml::from_str(&raw).with_context(|| format!("Parsing cleaning plan {path:?}"))
    }

    /// Runs the plan against the session's current dataset and returns the
    /// merged per-column failure report.
    pub fn execute(&self, session: &mut DatasetSession) -> Result<BatchReport> {
        if !self.classify.is_empty() {
            let assignments = self
                .classify
                .iter()
                .map(|(name, kind)| (name.clone(), *kind))
                .collect::<Vec<_>>();
            session.classify(&assignments).context("Classifying columns")?;
        }

        let mut report = BatchReport::default();
        for (idx, step) in self.steps.iter().enumerate() {
            match step {
                PlanStep::DeleteColumns { columns } => {
                    session
                        .delete_columns(columns)
                        .with_context(|| format!("Plan step {}: deleting columns", idx + 1))?;
                    info!("Deleted {} column(s)", columns.len());
                }
                PlanStep::Transform { requests } => {
                    let step_report = session
                        .apply(requests)
                        .with_context(|| format!("Plan step {}: applying transforms", idx + 1))?;
                    report.applied.extend(step_report.applied);
                    report.failures.extend(step_report.failures);
                }
            }
        }
        Ok(report)
    }
}
