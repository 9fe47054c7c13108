//! Saved scenarios and batch runs
//!
//! A scenario pairs a summary request with an optional year-by-year projection
//! request. Scenarios are stored as pretty-printed JSON documents, one file per
//! named save, and can be run many at a time across the rayon pool.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pension::calculate_pension;
use crate::projection::{
    calculate_retirement, ProjectionConfig, ProjectionEngine, ProjectionRequest, ProjectionResult,
    RetirementOutcome, RetirementRequest,
};

const SCENARIO_EXTENSION: &str = "json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenarioData {
    pub retirement: RetirementRequest,
    pub projection: Option<ProjectionRequest>,
}

/// A named what-if case
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scenario {
    pub id: u32,
    pub name: String,
    pub data: ScenarioData,
}

/// On-disk document shape: `{"scenarios": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioCollection {
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

/// Directory of scenario documents
#[derive(Debug, Clone)]
pub struct ScenarioStore {
    dir: PathBuf,
}

impl ScenarioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, SCENARIO_EXTENSION))
    }

    /// Write a named save, replacing any previous one
    pub fn save(&self, name: &str, scenarios: &[Scenario]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(name);
        let collection = ScenarioCollection {
            scenarios: scenarios.to_vec(),
        };
        fs::write(&path, serde_json::to_string_pretty(&collection)?)?;
        log::debug!("saved {} scenarios to {}", scenarios.len(), path.display());
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<Vec<Scenario>> {
        load_file(&self.path_for(name))
    }

    /// Names of saved documents, sorted; empty when the directory does not exist
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SCENARIO_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Read a scenario document from any path
pub fn load_file(path: &Path) -> Result<Vec<Scenario>> {
    let text = fs::read_to_string(path)?;
    let collection: ScenarioCollection = serde_json::from_str(&text)?;
    Ok(collection.scenarios)
}

/// Results of running one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub id: u32,
    pub name: String,
    pub summary: RetirementOutcome,
    pub projection: Option<ProjectionResult>,
}

/// Runs scenarios with a shared projection configuration
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: ProjectionConfig,
}

impl ScenarioRunner {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Year-by-year projection, deriving the pension from the request
    pub fn project(&self, request: &ProjectionRequest) -> Result<ProjectionResult> {
        let pension = calculate_pension(&request.pension);
        ProjectionEngine::new(self.config.clone()).project(request, &pension)
    }

    pub fn run(&self, scenario: &Scenario) -> Result<ScenarioResult> {
        log::info!("running scenario {} ({})", scenario.id, scenario.name);
        let summary = calculate_retirement(&scenario.data.retirement)?;
        let projection = scenario
            .data
            .projection
            .as_ref()
            .map(|request| self.project(request))
            .transpose()?;
        Ok(ScenarioResult {
            id: scenario.id,
            name: scenario.name.clone(),
            summary,
            projection,
        })
    }

    /// Run scenarios in parallel; results keep the input order
    pub fn run_batch(&self, scenarios: &[Scenario]) -> Vec<Result<ScenarioResult>> {
        scenarios.par_iter().map(|s| self.run(s)).collect()
    }
}
