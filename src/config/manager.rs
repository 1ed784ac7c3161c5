//! Configuration source wrangling
// (c) 2026 ftpc contributors

use std::fmt::Write as _;

use anyhow::{Context as _, Result};
use figment::{providers::Env, value::Value, Figment, Metadata, Provider};
use serde::Deserialize;

use super::{structure::FIELD_NAMES, Configuration};

/// Prefix for environment variables that set configuration fields
pub const ENV_PREFIX: &str = "FTPC_";

/// Processes and merges all possible configuration sources.
///
/// In increasing order of priority: system defaults, environment variables, command line.
#[derive(Debug, Clone)]
pub struct Manager {
    data: Figment,
}

impl Manager {
    fn new(apply_env: bool) -> Self {
        let mut new1 = Self {
            data: Figment::new(),
        };
        new1.apply_system_default();
        if apply_env {
            new1.merge_provider(Env::prefixed(ENV_PREFIX));
        }
        new1
    }

    /// General constructor for production use.
    ///
    /// Applies the system defaults, then any `FTPC_*` environment variables.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(true)
    }

    /// Testing constructor, does not apply the environment
    #[must_use]
    #[cfg(test)]
    pub(crate) fn without_env() -> Self {
        Self::new(false)
    }

    /// Merges in a data set, which is some sort of [figment::Provider](https://docs.rs/figment/latest/figment/trait.Provider.html).
    /// This uses figment's `merge` operation, which prefers to _replace_ existing items.
    pub fn merge_provider<T>(&mut self, provider: T)
    where
        T: Provider,
    {
        let f = std::mem::take(&mut self.data);
        self.data = f.merge(provider);
    }

    /// Applies the system default settings, at a lower priority than everything else
    pub fn apply_system_default(&mut self) {
        let f = std::mem::take(&mut self.data);
        self.data = f.join(super::SystemDefault {});
    }

    /// Attempts to extract a particular struct from the data.
    pub fn get<'de, T>(&self) -> Result<T>
    where
        T: Deserialize<'de>,
    {
        self.data
            .extract::<T>()
            .context("could not assemble configuration")
    }

    /// Extracts and validates the working [`Configuration`]
    pub fn configuration(&self) -> Result<Configuration> {
        self.get::<Configuration>()?.validate()
    }

    /// Renders the configuration as a table showing where each value came from
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:<16} {:<16} {}", "FIELD", "VALUE", "SOURCE");
        for field in FIELD_NAMES {
            let value = self
                .data
                .find_value(field)
                .map(|v| render_value(&v))
                .unwrap_or_default();
            let source = render_source(self.data.find_metadata(field));
            let _ = writeln!(out, "{field:<16} {value:<16} {source}");
        }
        out
    }
}

fn render_source(meta: Option<&Metadata>) -> String {
    if let Some(m) = meta {
        m.source
            .as_ref()
            .map_or_else(|| m.name.to_string(), figment::Source::to_string)
    } else {
        String::new()
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(_tag, s) => s.to_string(),
        Value::Char(_tag, c) => c.to_string(),
        Value::Bool(_tag, b) => b.to_string(),
        Value::Num(_tag, num) => {
            if let Some(i) = num.to_i128() {
                i.to_string()
            } else if let Some(u) = num.to_u128() {
                u.to_string()
            } else if let Some(ff) = num.to_f64() {
                ff.to_string()
            } else {
                String::from("?")
            }
        }
        Value::Empty(_tag, _) => "<empty>".into(),
        Value::Dict(_tag, _dict) => "<dict>".into(),
        Value::Array(_tag, vec) => format!(
            "[{}]",
            vec.iter().map(render_value).collect::<Vec<_>>().join(",")
        ),
    }
}

#[cfg(test)]
mod test {
    use super::Manager;
    use crate::config::{Configuration, ConfigurationOverrides};
    use crate::protocol::Encoding;
    use crate::util::TimeFormat;
    use assertables::assert_contains;
    use pretty_assertions::assert_eq;
    use rusty_fork::rusty_fork_test;

    #[test]
    fn defaults() {
        let mgr = Manager::without_env();
        let result = mgr.configuration().unwrap();
        assert_eq!(&result, Configuration::system_default());
    }

    #[test]
    fn cli_merge() {
        let entered = ConfigurationOverrides {
            host: Some("files.example.com".into()),
            connect_timeout: Some(10),
            ..Default::default()
        };
        let expected = Configuration {
            host: "files.example.com".into(),
            connect_timeout: 10,
            ..Configuration::system_default().clone()
        };
        let mut mgr = Manager::without_env();
        mgr.merge_provider(entered);
        assert_eq!(mgr.configuration().unwrap(), expected);
    }

    #[test]
    fn empty_host_is_invalid() {
        let mut mgr = Manager::without_env();
        mgr.merge_provider(ConfigurationOverrides {
            host: Some(String::new()),
            ..Default::default()
        });
        let e = mgr.configuration().unwrap_err();
        assert_contains!(e.to_string(), "host");
    }

    #[test]
    fn describe_shows_sources() {
        let mut mgr = Manager::without_env();
        mgr.merge_provider(ConfigurationOverrides {
            encoding: Some(Encoding::Latin1),
            ..Default::default()
        });
        let text = mgr.describe();
        assert_contains!(text, "latin-1");
        assert_contains!(text, "command line");
        assert_contains!(text, "localhost");
        assert_contains!(text, "default");
    }

    // these tests modify the process environment, so need to run in forks
    rusty_fork_test! {
        #[test]
        fn environment_overrides_defaults() {
            std::env::set_var("FTPC_ENCODING", "latin-1");
            std::env::set_var("FTPC_CONNECT_TIMEOUT", "5");
            std::env::set_var("FTPC_TIME_FORMAT", "UTC");
            let mgr = Manager::standard();
            let cfg = mgr.configuration().unwrap();
            assert_eq!(cfg.encoding, Encoding::Latin1);
            assert_eq!(cfg.connect_timeout, 5);
            assert_eq!(cfg.time_format, TimeFormat::Utc);
            assert_eq!(cfg.host, "localhost");
            assert_contains!(mgr.describe(), "environment");
        }

        #[test]
        fn command_line_overrides_environment() {
            std::env::set_var("FTPC_HOST", "from-env");
            std::env::set_var("FTPC_ENCODING", "binary");
            let mut mgr = Manager::standard();
            mgr.merge_provider(ConfigurationOverrides {
                host: Some("from-cli".into()),
                ..Default::default()
            });
            let cfg = mgr.configuration().unwrap();
            assert_eq!(cfg.host, "from-cli");
            assert_eq!(cfg.encoding, Encoding::Binary);
        }

        #[test]
        fn bad_environment_value() {
            std::env::set_var("FTPC_ENCODING", "ebcdic");
            let mgr = Manager::standard();
            let _ = mgr.configuration().unwrap_err();
        }
    }
}
