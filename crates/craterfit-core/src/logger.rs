//! Process-wide log output for the craterfit tools.
//!
//! Lines look like `    0.012s DEBUG craterfit_filter: mask 3: radius 12.0 out of range`.
//! The requested level applies to the craterfit crates; everything else is
//! capped at `warn`. `init_tracing` applies the same policy through an
//! `EnvFilter` unless `RUST_LOG` overrides it.

use std::fmt;
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::EnvFilter;

const OWN_CRATES: [&str; 3] = ["craterfit", "craterfit_core", "craterfit_filter"];

fn crate_of(target: &str) -> &str {
    target.split("::").next().unwrap_or(target)
}

fn level_cap(target: &str, requested: LevelFilter) -> LevelFilter {
    if OWN_CRATES.contains(&crate_of(target)) {
        requested
    } else {
        requested.min(LevelFilter::Warn)
    }
}

fn format_line(elapsed: f64, level: Level, target: &str, args: &fmt::Arguments<'_>) -> String {
    format!("{elapsed:>9.3}s {:<5} {}: {args}", level, crate_of(target))
}

/// `EnvFilter` directive equivalent to the stderr logger's policy.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
fn filter_directive(level: LevelFilter) -> String {
    if level == LevelFilter::Off {
        return "off".to_string();
    }
    let own = level.as_str().to_ascii_lowercase();
    let others = level.min(LevelFilter::Warn).as_str().to_ascii_lowercase();
    let mut directive = others;
    for name in OWN_CRATES {
        directive.push_str(&format!(",{name}={own}"));
    }
    directive
}

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= level_cap(metadata.target(), self.level)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.started.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            record.args(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger. Later calls keep the first level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| StderrLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing` fmt subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise `level` is applied to the craterfit
/// crates as in [`init_with_level`]. Span close events carry stage timings.
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(tracing_subscriber::fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_crates_are_capped_at_warn() {
        assert_eq!(
            level_cap("craterfit_filter::candidate", LevelFilter::Debug),
            LevelFilter::Debug
        );
        assert_eq!(level_cap("craterfit", LevelFilter::Trace), LevelFilter::Trace);
        assert_eq!(level_cap("serde_json::de", LevelFilter::Debug), LevelFilter::Warn);
        assert_eq!(level_cap("image", LevelFilter::Error), LevelFilter::Error);
    }

    #[test]
    fn line_shows_elapsed_level_and_crate() {
        let line = format_line(
            1.5,
            Level::Debug,
            "craterfit_filter::dedup",
            &format_args!("mask {} suppressed", 4),
        );
        assert_eq!(line, "    1.500s DEBUG craterfit_filter: mask 4 suppressed");
    }

    #[test]
    fn directive_follows_requested_level() {
        assert_eq!(
            filter_directive(LevelFilter::Debug),
            "warn,craterfit=debug,craterfit_core=debug,craterfit_filter=debug"
        );
        assert_eq!(
            filter_directive(LevelFilter::Error),
            "error,craterfit=error,craterfit_core=error,craterfit_filter=error"
        );
        assert_eq!(filter_directive(LevelFilter::Off), "off");
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn directive_parses_as_env_filter() {
        for level in [LevelFilter::Trace, LevelFilter::Info, LevelFilter::Off] {
            assert!(EnvFilter::try_new(filter_directive(level)).is_ok());
        }
    }
}
