//! Diagnostic output for the client
// (c) 2026 ftpc contributors
//!
//! Events go to stderr, so they never interleave with command results on stdout.
//! A copy can also go to a log file.
//!
//! Unless the user overrides it, we log only our own events: `ftpc=info` by default,
//! `ftpc=debug` with `--debug`, `ftpc=error` with `--quiet`.
//!
//! | Variable | Overrides the filter for |
//! |----------|--------------------------|
//! | `RUST_LOG` | stderr, and the log file unless the next one is set |
//! | `RUST_LOG_FILE_DETAIL` | the log file |

use std::{
    fs::File,
    sync::atomic::{AtomicBool, Ordering},
    sync::Arc,
};

use anyhow::Context as _;
use serde::{de, Deserialize, Serialize};
use strum::VariantNames as _;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{
        format::Writer,
        time::{ChronoLocal, ChronoUtc, FormatTime},
        MakeWriter,
    },
    prelude::*,
    EnvFilter, Layer, Registry,
};

use crate::client::Parameters;

const CONSOLE_FILTER_VAR: &str = "RUST_LOG";
const FILE_FILTER_VAR: &str = "RUST_LOG_FILE_DETAIL";

static INSTALLED: AtomicBool = AtomicBool::new(false);

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Selects the format of time stamps in output messages
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Eq,
    PartialEq,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
    clap::ValueEnum,
    Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "kebab-case")]
pub enum TimeFormat {
    /// Local time, as "year-month-day HH:MM:SS"
    #[default]
    Local,
    /// UTC, as "year-month-day HH:MM:SS"
    Utc,
    /// UTC, as [RFC 3339](https://datatracker.ietf.org/doc/html/rfc3339)
    Rfc3339,
}

impl<'de> Deserialize<'de> for TimeFormat {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.to_ascii_lowercase()
            .parse()
            .map_err(|_| de::Error::unknown_variant(&s, TimeFormat::VARIANTS))
    }
}

/// The timer behind each [`TimeFormat`]
enum Timestamp {
    Local(ChronoLocal),
    Utc(ChronoUtc),
}

impl From<TimeFormat> for Timestamp {
    fn from(format: TimeFormat) -> Self {
        match format {
            TimeFormat::Local => Self::Local(ChronoLocal::new("%Y-%m-%d %H:%M:%SL".into())),
            TimeFormat::Utc => Self::Utc(ChronoUtc::new("%Y-%m-%d %H:%M:%SZ".into())),
            TimeFormat::Rfc3339 => Self::Utc(ChronoUtc::rfc_3339()),
        }
    }
}

impl FormatTime for Timestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        match self {
            Timestamp::Local(t) => t.format_time(w),
            Timestamp::Utc(t) => t.format_time(w),
        }
    }
}

/// What to log, and where
#[derive(Debug, Clone)]
pub(crate) struct LogSettings<'a> {
    /// Level for our own events, when not overridden from the environment
    pub(crate) level: LevelFilter,
    /// Optional second destination
    pub(crate) log_file: Option<&'a str>,
    pub(crate) time_format: TimeFormat,
    /// Colour on stderr. Never applied to the log file.
    pub(crate) ansi: bool,
}

impl<'a> LogSettings<'a> {
    /// Settings for a client session
    pub(crate) fn for_client(parameters: &'a Parameters, time_format: TimeFormat, ansi: bool) -> Self {
        let level = match (parameters.debug, parameters.quiet) {
            (true, _) => LevelFilter::DEBUG,
            (false, true) => LevelFilter::ERROR,
            (false, false) => LevelFilter::INFO,
        };
        Self {
            level,
            log_file: parameters.log_file.as_deref(),
            time_format,
            ansi,
        }
    }
}

/// Reads a filter from `var` if it is set, otherwise logs our own events at `level`.
///
/// The flag is true if the filter came from the environment.
fn filter_from(var: &str, level: LevelFilter) -> anyhow::Result<(EnvFilter, bool)> {
    if let Ok(directives) = std::env::var(var) {
        let filter = EnvFilter::try_new(&directives)
            .with_context(|| format!("{var}={directives:?} (set in environment) was not understood"))?;
        return Ok((filter, true));
    }
    Ok((EnvFilter::try_new(format!("ftpc={level}"))?, false))
}

fn fmt_layer<W>(
    writer: W,
    filter: EnvFilter,
    time_format: TimeFormat,
    show_target: bool,
    ansi: bool,
) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer::<Registry>()
        .compact()
        .with_target(show_target)
        .with_ansi(ansi)
        .with_timer(Timestamp::from(time_format))
        .with_writer(writer)
        .with_filter(filter)
        .boxed()
}

/// Builds the stderr layer, plus a file layer if one was asked for.
///
/// Targets are shown only when the user wrote the filter, as then they asked about other crates.
pub(crate) fn layers(settings: &LogSettings<'_>) -> anyhow::Result<Vec<BoxedLayer>> {
    let (filter, from_env) = filter_from(CONSOLE_FILTER_VAR, settings.level)?;
    let mut layers = vec![fmt_layer(
        std::io::stderr,
        filter,
        settings.time_format,
        from_env,
        settings.ansi,
    )];

    if let Some(path) = settings.log_file {
        let file = File::create(path).with_context(|| format!("could not create log file {path}"))?;
        let var = if std::env::var_os(FILE_FILTER_VAR).is_some() {
            FILE_FILTER_VAR
        } else {
            CONSOLE_FILTER_VAR
        };
        let (filter, from_env) = filter_from(var, settings.level)?;
        layers.push(fmt_layer(
            Arc::new(file),
            filter,
            settings.time_format,
            from_env,
            false,
        ));
    }
    Ok(layers)
}

/// Installs the global subscriber. Only the first call in a process has any effect.
///
/// **CAUTION:** If this fails, nothing is logged; the caller must report the error some other way.
pub(crate) fn install(settings: &LogSettings<'_>) -> anyhow::Result<()> {
    if INSTALLED.swap(true, Ordering::Relaxed) {
        tracing::warn!("logging was already set up; ignoring the second attempt");
        return Ok(());
    }
    tracing_subscriber::registry().with(layers(settings)?).init();
    Ok(())
}

/// Has [`install`] been called?
pub(crate) fn is_installed() -> bool {
    INSTALLED.load(Ordering::Relaxed)
}

/// Collects our events emitted on the current thread, for tests
#[cfg(test)]
pub(crate) mod capture {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use tracing::subscriber::DefaultGuard;
    use tracing_subscriber::{filter::LevelFilter, prelude::*, EnvFilter};

    use super::{fmt_layer, TimeFormat};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Events are collected while this lives
    pub(crate) struct Captured {
        buffer: SharedBuffer,
        _guard: DefaultGuard,
    }

    impl Captured {
        pub(crate) fn text(&self) -> String {
            String::from_utf8_lossy(&self.buffer.0.lock().unwrap()).into_owned()
        }
    }

    pub(crate) fn capture(level: LevelFilter) -> Captured {
        let buffer = SharedBuffer::default();
        let writer = {
            let buffer = buffer.clone();
            move || buffer.clone()
        };
        let filter = EnvFilter::new(format!("ftpc={level}"));
        let subscriber =
            tracing_subscriber::registry().with(fmt_layer(writer, filter, TimeFormat::Utc, false, false));
        Captured {
            buffer,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }
}
