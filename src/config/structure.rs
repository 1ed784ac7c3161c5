//! Configuration structure
// (c) 2026 ftpc contributors

use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use figment::{providers::Serialized, Metadata, Provider};
use serde::{Deserialize, Serialize};

use crate::{cli::styles::ColourMode, protocol::Encoding, util::TimeFormat};

/// The set of configurable options supported by ftpc.
///
/// There is no `default()`.
/// You can access the hard-wired defaults through [`Configuration::system_default()`].
/// Each field may also be set by an environment variable (`FTPC_HOST`, `FTPC_ENCODING`, ...)
/// or by the corresponding command-line option; see [`ConfigurationOverrides`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Configuration {
    /// The server to connect to
    pub host: String,

    /// Text encoding used on the wire, for command lines and file frames
    pub encoding: Encoding,

    /// Connection timeout for the control and ephemeral channels, in seconds.
    /// 0 means wait as long as the operating system does.
    pub connect_timeout: u64,

    /// Time format to use when printing messages to the console or to file
    pub time_format: TimeFormat,

    /// Colour mode for console output
    pub color: ColourMode,
}

/// Names of the fields of [`Configuration`], in display order
pub(crate) const FIELD_NAMES: &[&str] = &[
    "host",
    "encoding",
    "connect_timeout",
    "time_format",
    "color",
];

static SYSTEM_DEFAULT_CONFIG: LazyLock<Configuration> = LazyLock::new(|| Configuration {
    host: "localhost".into(),
    encoding: Encoding::Utf32,
    connect_timeout: 0,
    time_format: TimeFormat::Local,
    color: ColourMode::Auto,
});

impl Configuration {
    /// Hard-wired configuration defaults
    #[must_use]
    pub fn system_default() -> &'static Self {
        &SYSTEM_DEFAULT_CONFIG
    }

    /// The connect timeout, if there is one
    #[must_use]
    pub fn connect_timeout_duration(&self) -> Option<Duration> {
        (self.connect_timeout != 0).then(|| Duration::from_secs(self.connect_timeout))
    }

    /// Performs additional validation checks on the configuration.
    pub fn validate(self) -> Result<Self> {
        if self.host.trim().is_empty() {
            anyhow::bail!("host must not be empty");
        }
        if self.host.chars().any(char::is_whitespace) {
            anyhow::bail!("host {:?} must not contain whitespace", self.host);
        }
        Ok(self)
    }
}

/// Command-line options that override the configuration.
///
/// Every member is optional; where the user does not provide a value, values from
/// lower priority sources (environment, then system defaults) obtain.
#[derive(Debug, Clone, Default, PartialEq, Args, Serialize)]
pub struct ConfigurationOverrides {
    /// The server to connect to [default: localhost]
    #[arg(short = 'H', long, value_name("HOST"), help_heading("Connection"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Text encoding used on the wire [default: utf-32]
    ///
    /// `binary` sends file contents verbatim. It is only useful if the server does the same.
    #[arg(short, long, value_name("ENCODING"), help_heading("Connection"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,

    /// Connection timeout in seconds; 0 for none [default: 0]
    #[arg(long, value_name("SECONDS"), help_heading("Connection"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<u64>,

    /// Time format to use when printing messages to the console or to file [default: local]
    #[arg(short = 'T', long, value_name("FORMAT"), help_heading("Output"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_format: Option<TimeFormat>,

    /// Colour mode for console output [default: auto]
    ///
    /// Passing `--color` without a value is equivalent to `--color always`.
    /// ftpc also supports the `CLICOLOR_FORCE` and `NO_COLOR` environment variables.
    #[arg(
        long,
        alias("colour"),
        default_missing_value("always"),
        num_args(0..=1),
        value_name("mode"),
        help_heading("Output")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColourMode>,
}

impl ConfigurationOverrides {
    const META_NAME: &str = "command line";
}

impl Provider for ConfigurationOverrides {
    fn metadata(&self) -> Metadata {
        Metadata::named(Self::META_NAME)
    }

    fn data(
        &self,
    ) -> std::result::Result<
        figment::value::Map<figment::Profile, figment::value::Dict>,
        figment::Error,
    > {
        Serialized::defaults(self).data()
    }
}
