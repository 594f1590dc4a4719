use crate::config::{LoggingConfig, Section};
use std::{
    collections::HashMap,
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::{level_filters::LevelFilter, Level, Metadata};
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;

/// `None` means the sink is switched off.
fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" | "" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// Returns true if target == prefix or target starts with "prefix::"
fn matches_target_prefix(target: &str, prefix: &str) -> bool {
    target
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

type BoxedPredicate = Box<dyn Fn(&Metadata<'_>) -> bool + Send + Sync + 'static>;

/// Accepts records that no explicit section claims, up to `max_level`.
fn unclaimed_targets_filter(claimed: &[String], max_level: Level) -> FilterFn<BoxedPredicate> {
    let claimed = claimed.to_vec();
    FilterFn::new(Box::new(move |meta: &Metadata<'_>| {
        let target = meta.target();
        !claimed.iter().any(|p| matches_target_prefix(target, p)) && *meta.level() <= max_level
    }))
}

// -------- rotating file sinks --------

type SharedRotate = Arc<Mutex<FileRotate<AppendTimestamp>>>;

#[derive(Clone)]
struct RotatingFile(SharedRotate);

impl RotatingFile {
    fn lock(&self) -> MutexGuard<'_, FileRotate<AppendTimestamp>> {
        // A panic while writing a log line must not silence logging for good.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Writer handed to the fmt layer; `None` drops the record.
struct SinkHandle(Option<RotatingFile>);

impl Write for SinkHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &self.0 {
            Some(file) => file.lock().write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &self.0 {
            Some(file) => file.lock().flush(),
            None => Ok(()),
        }
    }
}

/// Sends each record to the file of the longest matching section prefix,
/// or to the default file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<RotatingFile>,
    by_prefix: HashMap<String, RotatingFile>,
}

impl FileRouter {
    fn route(&self, target: &str) -> Option<RotatingFile> {
        self.by_prefix
            .iter()
            .filter(|(prefix, _)| matches_target_prefix(target, prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, file)| file.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = SinkHandle;

    fn make_writer(&'a self) -> Self::Writer {
        SinkHandle(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        SinkHandle(self.route(meta.target()))
    }
}

/// Relative log paths live under `base_dir` (the server home directory).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating_file(log_path: &Path, max_bytes: usize) -> std::io::Result<RotatingFile> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(FileLimit::Age(chrono::Duration::days(1))),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    );

    Ok(RotatingFile(Arc::new(Mutex::new(rot))))
}

fn open_section_file(name: &str, section: &Section, base_dir: &Path) -> Option<RotatingFile> {
    if section.file.trim().is_empty() {
        return None;
    }
    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let path = resolve_log_path(&section.file, base_dir);

    match open_rotating_file(&path, max_bytes as usize) {
        Ok(file) => Some(file),
        Err(e) => {
            // The subscriber is not installed yet, so stderr is the only channel.
            eprintln!(
                "Failed to open log file for section '{name}': {} ({e})",
                path.display()
            );
            None
        }
    }
}

// -------- plan --------

/// Everything needed to build the subscriber, derived from the config.
struct LoggingPlan<'a> {
    default_section: Option<&'a Section>,
    sections: Vec<(String, &'a Section)>,
}

impl<'a> LoggingPlan<'a> {
    fn from_config(cfg: &'a LoggingConfig) -> Self {
        let mut sections: Vec<(String, &Section)> = cfg
            .iter()
            .filter(|(k, _)| k.as_str() != DEFAULT_SECTION)
            .map(|(k, v)| (k.clone(), v))
            .collect();
        sections.sort_by(|a, b| a.0.cmp(&b.0));

        Self {
            default_section: cfg.get(DEFAULT_SECTION),
            sections,
        }
    }

    fn claimed_prefixes(&self) -> Vec<String> {
        self.sections.iter().map(|(n, _)| n.clone()).collect()
    }

    fn console_targets(&self) -> Targets {
        self.sections
            .iter()
            .filter_map(|(name, s)| {
                parse_tracing_level(&s.console_level).map(|l| (name.clone(), LevelFilter::from_level(l)))
            })
            .fold(Targets::new().with_default(LevelFilter::OFF), |t, (name, level)| {
                t.with_target(name, level)
            })
    }

    fn file_targets(&self) -> Targets {
        self.sections
            .iter()
            .filter(|(_, s)| !s.file.trim().is_empty())
            .filter_map(|(name, s)| {
                parse_tracing_level(&s.file_level).map(|l| (name.clone(), LevelFilter::from_level(l)))
            })
            .fold(Targets::new().with_default(LevelFilter::OFF), |t, (name, level)| {
                t.with_target(name, level)
            })
    }

    fn file_router(&self, base_dir: &Path) -> FileRouter {
        let mut router = FileRouter {
            default: self
                .default_section
                .and_then(|s| open_section_file(DEFAULT_SECTION, s, base_dir)),
            by_prefix: HashMap::new(),
        };
        for (name, section) in &self.sections {
            if let Some(file) = open_section_file(name, section, base_dir) {
                router.by_prefix.insert(name.clone(), file);
            }
        }
        router
    }
}

// -------- public init --------

/// Install the global subscriber.
///
/// Each non-default section names a target prefix (e.g. `recipes` or
/// `tower_http`) with its own console and file levels. The `default` section
/// covers every target no other section claims. Console output is human
/// readable; file output is JSON, rotated by size. Relative file paths are
/// resolved against `base_dir`.
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` records before the subscriber goes in.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    let plan = LoggingPlan::from_config(cfg);
    let claimed = plan.claimed_prefixes();
    let router = plan.file_router(base_dir);
    let ansi = std::io::stdout().is_terminal();

    let console_sections = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(plan.console_targets());

    let file_sections = (!router.by_prefix.is_empty()).then(|| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(router.clone())
            .with_filter(plan.file_targets())
    });

    let console_default = plan
        .default_section
        .and_then(|s| parse_tracing_level(&s.console_level))
        .map(|level| {
            fmt::layer()
                .with_ansi(ansi)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(unclaimed_targets_filter(&claimed, level))
        });

    let file_default = plan
        .default_section
        .filter(|_| router.default.is_some())
        .and_then(|s| parse_tracing_level(&s.file_level))
        .map(|level| {
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(router.clone())
                .with_filter(unclaimed_targets_filter(&claimed, level))
        });

    let _ = Registry::default()
        .with(console_sections)
        .with(file_sections)
        .with(console_default)
        .with(file_default)
        .try_init();

    if router.is_empty() {
        tracing::debug!("file logging disabled: no section configures a file");
    }
}

fn init_default_logging() {
    let _ = tracing_subscriber::fmt()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_logging_config, AppConfig};
    use std::fs;
    use tempfile::tempdir;

    fn section(console: &str, file: &str, file_level: &str) -> Section {
        Section {
            console_level: console.into(),
            file: file.into(),
            file_level: file_level.into(),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn test_logging_level_parsing() {
        assert_eq!(parse_tracing_level("trace"), Some(Level::TRACE));
        assert_eq!(parse_tracing_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_tracing_level("Info"), Some(Level::INFO));
        assert_eq!(parse_tracing_level("warning"), Some(Level::WARN));
        assert_eq!(parse_tracing_level("ERROR"), Some(Level::ERROR));
        assert_eq!(parse_tracing_level("off"), None);
        assert_eq!(parse_tracing_level("none"), None);
        assert_eq!(parse_tracing_level(""), Some(Level::INFO));
        assert_eq!(parse_tracing_level("bogus"), Some(Level::INFO));
    }

    #[test]
    fn test_target_prefix_matching() {
        assert!(matches_target_prefix("recipes", "recipes"));
        assert!(matches_target_prefix("recipes::domain::service", "recipes"));
        assert!(!matches_target_prefix("recipes_extra", "recipes"));
        assert!(!matches_target_prefix("tower_http", "recipes"));
    }

    #[test]
    fn test_plan_separates_default_from_sections() {
        let mut cfg = default_logging_config();
        cfg.insert("recipes".into(), section("debug", "logs/recipes.log", "trace"));
        cfg.insert("sqlx".into(), section("off", "", "off"));

        let plan = LoggingPlan::from_config(&cfg);

        assert!(plan.default_section.is_some());
        assert_eq!(plan.claimed_prefixes(), vec!["recipes".to_string(), "sqlx".to_string()]);
    }

    #[test]
    fn test_router_picks_longest_prefix_then_default() {
        let tmp = tempdir().unwrap();
        let mut cfg = LoggingConfig::new();
        cfg.insert("default".into(), section("info", "logs/all.log", "debug"));
        cfg.insert("recipes".into(), section("info", "logs/recipes.log", "debug"));
        cfg.insert("recipes::api".into(), section("info", "logs/api.log", "debug"));

        let plan = LoggingPlan::from_config(&cfg);
        let router = plan.file_router(tmp.path());

        let api = router.route("recipes::api::rest").unwrap();
        let expected = router.by_prefix.get("recipes::api").unwrap();
        assert!(Arc::ptr_eq(&api.0, &expected.0));

        let domain = router.route("recipes::domain").unwrap();
        let expected = router.by_prefix.get("recipes").unwrap();
        assert!(Arc::ptr_eq(&domain.0, &expected.0));

        let other = router.route("hyper::proto").unwrap();
        assert!(Arc::ptr_eq(&other.0, &router.default.as_ref().unwrap().0));
    }

    #[test]
    fn test_empty_file_disables_sink() {
        let tmp = tempdir().unwrap();
        let mut cfg = LoggingConfig::new();
        cfg.insert("default".into(), section("info", "  ", "debug"));

        let router = LoggingPlan::from_config(&cfg).file_router(tmp.path());
        assert!(router.is_empty());
        assert!(router.route("anything").is_none());
    }

    #[test]
    fn test_open_rotating_file_creates_parent() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("nested/dir/app.log");

        let file = open_rotating_file(&p, 128 * 1024).unwrap();
        SinkHandle(Some(file)).write_all(b"{\"msg\":\"hi\"}\n").unwrap();

        assert!(p.parent().unwrap().is_dir());
    }

    #[test]
    fn test_log_paths_resolve_under_home_dir() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("test_config.yaml");
        let home = temp_dir.path().join("home").to_string_lossy().replace('\\', "/");

        let yaml_content = format!(
            r#"
server:
  home_dir: "{home}"
  host: "127.0.0.1"
  port: 8088

logging:
  default:
    console_level: info
    file: ""
    file_level: debug
  recipes:
    console_level: debug
    file: "logs/recipes.log"
    file_level: warn
"#
        );
        fs::write(&config_path, yaml_content).unwrap();

        let config = AppConfig::load_layered(&config_path).unwrap();
        let abs = resolve_log_path("logs/recipes.log", Path::new(&config.server.home_dir));
        assert!(abs.starts_with(&config.server.home_dir));
        assert!(abs.ends_with("logs/recipes.log"));

        let absolute = temp_dir.path().join("elsewhere.log");
        assert_eq!(
            resolve_log_path(&absolute.to_string_lossy(), Path::new("/ignored")),
            absolute
        );
    }
}
