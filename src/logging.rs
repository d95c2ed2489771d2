use log::{Level, LevelFilter};
use std::fmt::{Arguments, Display};
use std::str::FromStr;

const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

/// Install the global logger. Output goes to stderr so that command results
/// printed on stdout stay machine readable.
pub fn setup_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    let mut cfg = fern::Dispatch::new()
        .level(settings.root_level)
        .format(|out, message, record| {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            out.finish(format_args!("{}", log_line(timestamp, record.level(), message)))
        })
        .chain(std::io::stderr());

    for (target, level) in &settings.target_levels {
        cfg = cfg.level_for(target.clone(), *level);
    }
    cfg.apply()?;
    Ok(())
}

fn log_line(timestamp: impl Display, level: Level, message: &Arguments) -> String {
    format!("{timestamp} [{level}] {message}")
}

/// Root log level plus optional per-target overrides, written as a comma
/// separated list where the first entry is the root level.
///
/// Examples:
///   - `info`
///   - `off,arrkit=debug,reqwest=info`
///   - `warn,arrkit::http=debug`
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub root_level: LevelFilter,
    pub target_levels: Vec<(String, LevelFilter)>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            root_level: DEFAULT_LEVEL,
            target_levels: Vec::new(),
        }
    }
}

impl FromStr for LoggingSettings {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut entries = s.split(',').map(str::trim);
        let root_level = match entries.next() {
            Some(level) if !level.is_empty() => LevelFilter::from_str(level)
                .map_err(|_| anyhow::anyhow!("invalid log level \"{level}\""))?,
            _ => DEFAULT_LEVEL,
        };

        let mut target_levels = Vec::new();
        for entry in entries.filter(|e| !e.is_empty()) {
            let Some((target, level)) = entry.split_once('=') else {
                anyhow::bail!("expected \"target=level\", got \"{entry}\"");
            };
            let level = LevelFilter::from_str(level.trim())
                .map_err(|_| anyhow::anyhow!("invalid log level \"{level}\" for {target}"))?;
            target_levels.push((target.trim().to_owned(), level));
        }

        Ok(Self {
            root_level,
            target_levels,
        })
    }
}
