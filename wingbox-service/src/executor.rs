use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::Instant;

use regex::Regex;
use uuid::Uuid;
use wingbox_core::model::StructuralModel;

use crate::config::SolverConfig;
use crate::generator::{write_atomic, GeneratorError};
use crate::models::{AnalysisResults, NodeDisplacement, SubcaseResults};

/// Deck and artifact stem inside every job directory
const JOB_STEM: &str = "wingbox";

/// Poll intervals to wait for a killed solver to exit
const REAP_POLLS: usize = 50;

/// Runs the external solver on a deck, one directory per job
pub struct SolverExecutor {
    config: SolverConfig,
}

impl SolverExecutor {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Create `work_dir/job_<id>` and write the deck into it
    pub fn prepare_job(&self, job_id: &Uuid, deck: &str) -> Result<PathBuf, ExecutorError> {
        let dir = self.config.work_dir.join(format!("job_{}", job_id));
        fs::create_dir_all(&dir)?;
        write_atomic(&dir.join(format!("{}.bdf", JOB_STEM)), deck)?;
        Ok(dir)
    }

    /// Write the deck, run the solver to completion and read its results.
    ///
    /// The job directory is removed after a successful run and kept for
    /// inspection on every failure.
    pub async fn execute(
        &self,
        job_id: &Uuid,
        deck: &str,
        model: &StructuralModel,
    ) -> Result<AnalysisResults, ExecutorError> {
        let dir = self.prepare_job(job_id, deck)?;
        tracing::info!("Starting job {} in {:?}", job_id, dir);

        let status = self.run_solver(&dir).await?;
        if !status.success() {
            tracing::error!("Solver exited with {} (job directory kept: {:?})", status, dir);
            return Err(ExecutorError::NonZeroExit { code: status.code(), dir });
        }

        let f06 = dir.join(format!("{}.f06", JOB_STEM));
        let pch = dir.join(format!("{}.pch", JOB_STEM));
        let missing: Vec<String> = [&f06, &pch]
            .iter()
            .filter(|p| !p.is_file())
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
            .collect();
        if !missing.is_empty() {
            tracing::error!("Solver left no {:?} (job directory kept: {:?})", missing, dir);
            return Err(ExecutorError::MissingArtifacts { missing, dir });
        }

        let f06_text = fs::read_to_string(&f06)?;
        if let Some(message) = fatal_message(&f06_text) {
            return Err(ExecutorError::SolverFatal { message, dir });
        }
        let pch_text = fs::read_to_string(&pch)?;
        let results = collect_results(model, &pch_text, &f06_text)?;

        if let Err(err) = fs::remove_dir_all(&dir) {
            tracing::warn!("Could not remove job directory {:?}: {}", dir, err);
        }
        tracing::info!(
            "Job {} finished: {} subcases, max displacement {:.4e} m",
            job_id,
            results.subcases.len(),
            results.max_displacement
        );
        Ok(results)
    }

    /// Spawn the solver and poll it until it exits or times out
    async fn run_solver(&self, dir: &Path) -> Result<ExitStatus, ExecutorError> {
        let deck_name = format!("{}.bdf", JOB_STEM);
        tracing::info!(
            "Running command: {:?} {} {}",
            self.config.executable,
            self.config.extra_args.join(" "),
            deck_name
        );

        let mut child = Command::new(&self.config.executable)
            .args(&self.config.extra_args)
            .arg(&deck_name)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ExecutorError::Spawn {
                executable: self.config.executable.clone(),
                source,
            })?;

        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                tracing::debug!("Solver finished after {:.1}s", started.elapsed().as_secs_f64());
                return Ok(status);
            }
            if let Some(limit) = self.config.timeout {
                if started.elapsed() >= limit {
                    tracing::error!("Solver exceeded {:?}, killing it", limit);
                    if let Err(err) = child.kill() {
                        tracing::warn!("Could not kill solver: {}", err);
                    }
                    self.reap(&mut child).await;
                    return Err(ExecutorError::Timeout {
                        seconds: limit.as_secs_f64(),
                        dir: dir.to_path_buf(),
                    });
                }
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    /// Collect the exit status of a killed solver without blocking the runtime
    async fn reap(&self, child: &mut Child) {
        for _ in 0..REAP_POLLS {
            match child.try_wait() {
                Ok(Some(status)) => {
                    tracing::debug!("Killed solver exited with {}", status);
                    return;
                }
                Ok(None) => tokio::time::sleep(self.config.poll_interval).await,
                Err(err) => {
                    tracing::warn!("Could not reap killed solver: {}", err);
                    return;
                }
            }
        }
        tracing::warn!("Killed solver (pid {}) has not exited yet", child.id());
    }
}

/// Match punch and f06 results to the model's subcases
pub fn collect_results(
    model: &StructuralModel,
    punch: &str,
    f06: &str,
) -> Result<AnalysisResults, ExecutorError> {
    let mut displacements = parse_punch_displacements(punch)?;
    let mut totals = parse_spc_totals(f06)?;

    let mut results = AnalysisResults::default();
    for subcase in &model.subcases {
        let disp = displacements.remove(&subcase.id).unwrap_or_default();
        if disp.is_empty() {
            tracing::warn!("No displacements punched for subcase {}", subcase.id);
        }
        let max_displacement = disp.iter().map(NodeDisplacement::magnitude).fold(0.0, f64::max);
        results.max_displacement = results.max_displacement.max(max_displacement);
        results.subcases.push(SubcaseResults {
            id: subcase.id,
            label: subcase.label.clone(),
            displacements: disp,
            reaction_totals: totals.remove(&subcase.id),
            max_displacement,
        });
    }
    Ok(results)
}

/// Displacements per subcase from a punch file.
///
/// Each grid takes a translation line followed by a `-CONT-` rotation line.
pub fn parse_punch_displacements(
    text: &str,
) -> Result<BTreeMap<usize, Vec<NodeDisplacement>>, ExecutorError> {
    let mut out: BTreeMap<usize, Vec<NodeDisplacement>> = BTreeMap::new();
    let mut subcase = 1;
    let mut in_displacements = false;

    for (line_no, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(header) = trimmed.strip_prefix('$') {
            let header = header.trim().to_ascii_uppercase();
            if let Some(rest) = header.strip_prefix("SUBCASE ID =") {
                // trailing column holds the punch line number
                let id = rest.split_whitespace().next().unwrap_or("");
                subcase = id.parse().map_err(|_| ExecutorError::Parse {
                    file: "punch",
                    line: line_no + 1,
                    message: format!("bad subcase id '{}'", id),
                })?;
            } else if !is_neutral_header(&header) {
                in_displacements = header.starts_with("DISPLACEMENTS");
            }
            continue;
        }
        if !in_displacements {
            continue;
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        let number = |i: usize| -> Result<f64, ExecutorError> {
            parts.get(i).and_then(|s| s.parse::<f64>().ok()).ok_or_else(|| ExecutorError::Parse {
                file: "punch",
                line: line_no + 1,
                message: format!("expected a number in field {}", i + 1),
            })
        };
        if parts.first() == Some(&"-CONT-") {
            let (rx, ry, rz) = (number(1)?, number(2)?, number(3)?);
            let last = out.get_mut(&subcase).and_then(|v| v.last_mut()).ok_or_else(|| {
                ExecutorError::Parse {
                    file: "punch",
                    line: line_no + 1,
                    message: "continuation without a grid line".to_string(),
                }
            })?;
            last.rx = rx;
            last.ry = ry;
            last.rz = rz;
        } else {
            let node_id = parts.first().and_then(|s| s.parse::<usize>().ok()).ok_or_else(|| {
                ExecutorError::Parse {
                    file: "punch",
                    line: line_no + 1,
                    message: format!("expected a grid id, found '{}'", trimmed),
                }
            })?;
            out.entry(subcase).or_default().push(NodeDisplacement {
                node_id,
                dx: number(2)?,
                dy: number(3)?,
                dz: number(4)?,
                ..Default::default()
            });
        }
    }
    Ok(out)
}

/// Headers that annotate a punch block without starting a new one
fn is_neutral_header(header: &str) -> bool {
    ["TITLE", "SUBTITLE", "LABEL", "REAL OUTPUT", "SUBCASE"]
        .iter()
        .any(|h| header.starts_with(h))
}

/// Summed constraint forces per subcase from the f06 `SPCFORCE RESULTANT`
/// tables (`TOTALS` row)
pub fn parse_spc_totals(text: &str) -> Result<BTreeMap<usize, [f64; 6]>, ExecutorError> {
    let subcase_row = Regex::new(r"^0?\s*(\d+)\s+FX\b").map_err(|e| ExecutorError::Parse {
        file: "f06",
        line: 0,
        message: e.to_string(),
    })?;
    let mut out = BTreeMap::new();
    let mut in_resultant = false;
    let mut subcase = None;

    for (line_no, line) in text.lines().enumerate() {
        if line.contains("RESULTANT") {
            in_resultant = line.contains("SPCFORCE RESULTANT");
            subcase = None;
            continue;
        }
        if !in_resultant {
            continue;
        }
        if let Some(caps) = subcase_row.captures(line) {
            subcase = caps[1].parse::<usize>().ok();
            continue;
        }
        let trimmed = line.trim_start_matches('0').trim();
        if let Some(rest) = trimmed.strip_prefix("TOTALS") {
            let values: Vec<f64> = rest
                .split_whitespace()
                .map(|s| s.parse::<f64>())
                .collect::<Result<_, _>>()
                .map_err(|e| ExecutorError::Parse {
                    file: "f06",
                    line: line_no + 1,
                    message: e.to_string(),
                })?;
            let id = subcase.ok_or_else(|| ExecutorError::Parse {
                file: "f06",
                line: line_no + 1,
                message: "TOTALS row outside a subcase".to_string(),
            })?;
            let row: [f64; 6] = values.try_into().map_err(|v: Vec<f64>| ExecutorError::Parse {
                file: "f06",
                line: line_no + 1,
                message: format!("expected 6 totals, found {}", v.len()),
            })?;
            out.insert(id, row);
            in_resultant = false;
        }
    }
    Ok(out)
}

/// First `FATAL MESSAGE` line of an f06, if any
pub fn fatal_message(f06: &str) -> Option<String> {
    f06.lines()
        .find(|l| l.contains("FATAL MESSAGE"))
        .map(|l| l.trim().to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("Failed to start solver {executable:?}: {source}")]
    Spawn {
        executable: PathBuf,
        source: std::io::Error,
    },
    #[error("Solver exited with code {code:?}; job files kept in {dir:?}")]
    NonZeroExit { code: Option<i32>, dir: PathBuf },
    #[error("Solver produced no {missing:?}; job files kept in {dir:?}")]
    MissingArtifacts { missing: Vec<String>, dir: PathBuf },
    #[error("Solver reported a fatal error: {message}; job files kept in {dir:?}")]
    SolverFatal { message: String, dir: PathBuf },
    #[error("Solver did not finish within {seconds:.1}s; job files kept in {dir:?}")]
    Timeout { seconds: f64, dir: PathBuf },
    #[error("Parsing error in {file} line {line}: {message}")]
    Parse {
        file: &'static str,
        line: usize,
        message: String,
    },
    #[error("Deck error: {0}")]
    Deck(#[from] GeneratorError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
