use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use wingbox_core::elements::MaterialResolver;
use wingbox_core::error::WingboxResult;

const DEFAULT_SOLVER: &str = "nastran";
const DEFAULT_POLL_MS: u64 = 500;
const DEFAULT_PORT: u16 = 8085;

/// How and where the external solver is run
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub executable: PathBuf,
    /// Parent of the per-job directories
    pub work_dir: PathBuf,
    pub poll_interval: Duration,
    /// Kill the solver after this long; `None` waits forever
    pub timeout: Option<Duration>,
    /// Passed before the deck name, e.g. `bat=no scr=yes`
    pub extra_args: Vec<String>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from(DEFAULT_SOLVER),
            work_dir: env::temp_dir().join("wingbox_work"),
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
            timeout: None,
            extra_args: Vec::new(),
        }
    }
}

impl SolverConfig {
    /// Whether the executable exists, searching `PATH` for a bare name
    pub fn is_available(&self) -> bool {
        if self.executable.components().count() > 1 {
            return self.executable.is_file();
        }
        env::var_os("PATH")
            .map(|paths| env::split_paths(&paths).any(|dir| dir.join(&self.executable).is_file()))
            .unwrap_or(false)
    }
}

/// Process-wide settings of the service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub solver: SolverConfig,
    /// Material table; the embedded table when unset
    pub materials: Option<PathBuf>,
    pub host: String,
    pub port: u16,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Malformed numbers fall back to defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = SolverConfig::default();

        let executable = get("WINGBOX_SOLVER_PATH")
            .map(PathBuf::from)
            .map(|p| absolute_if_exists(&p))
            .unwrap_or(defaults.executable);
        let work_dir = get("WINGBOX_WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.work_dir);
        let poll_interval = parse_or("WINGBOX_POLL_MS", get("WINGBOX_POLL_MS"), DEFAULT_POLL_MS)
            .max(1);
        let timeout = get("WINGBOX_SOLVER_TIMEOUT_S").and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
            _ => {
                tracing::warn!("Ignoring WINGBOX_SOLVER_TIMEOUT_S={:?}", raw);
                None
            }
        });
        let extra_args = get("WINGBOX_SOLVER_ARGS")
            .map(|raw| raw.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        Self {
            solver: SolverConfig {
                executable,
                work_dir,
                poll_interval: Duration::from_millis(poll_interval),
                timeout,
                extra_args,
            },
            materials: get("WINGBOX_MATERIALS").map(PathBuf::from),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", get("PORT"), DEFAULT_PORT),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn load_materials(&self) -> WingboxResult<MaterialResolver> {
        match &self.materials {
            Some(path) => MaterialResolver::load(path),
            None => MaterialResolver::embedded(),
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy + std::fmt::Debug>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring {}={:?}, using {:?}", key, raw, default);
            default
        }),
    }
}

/// The solver runs from the job directory, so relative paths are resolved
/// up front when they point at something
fn absolute_if_exists(path: &Path) -> PathBuf {
    if path.components().count() > 1 {
        std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    } else {
        path.to_path_buf()
    }
}
