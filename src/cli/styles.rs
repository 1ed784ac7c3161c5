// (c) 2026 ftpc contributors
//! CLI output styling
//!
//! Console output goes through anstream's `println!` / `eprintln!` macros, which strip
//! styling when colours are disabled.

use anstream::ColorChoice;
#[allow(clippy::enum_glob_use)]
use anstyle::AnsiColor::*;
use anstyle::Color::Ansi;
use clap::builder::styling::Styles;
use serde::{de, Deserialize, Serialize};
use std::io::IsTerminal;
use strum::VariantNames as _;

// RAW STYLE DEFINITIONS //////////////////////////////////////////////////////////////////

const _ERROR: anstyle::Style = anstyle::Style::new().bold().fg_color(Some(Ansi(Red)));
const _WARNING: anstyle::Style = anstyle::Style::new().bold().fg_color(Some(Ansi(Yellow)));
const _INFO: anstyle::Style = anstyle::Style::new().fg_color(Some(Ansi(Cyan)));
const _SUCCESS: anstyle::Style = anstyle::Style::new().fg_color(Some(Ansi(Green)));
const _HEADER: anstyle::Style = anstyle::Style::new()
    .underline()
    .fg_color(Some(Ansi(Yellow)));

/// Resets styling to default. This is a re-export of [`anstyle::Reset`].
pub use anstyle::Reset as RESET;

// COMPOSITE STYLES //////////////////////////////////////////////////////////////////////

pub(crate) const CLAP_STYLES: Styles = Styles::styled()
    .usage(_HEADER)
    .header(_HEADER)
    .literal(anstyle::Style::new().bold())
    .invalid(_WARNING)
    .error(_ERROR)
    .valid(_INFO.bold().underline())
    .placeholder(_INFO);

// CONDITIONAL STYLES ////////////////////////////////////////////////////////////////////

/// Wrap a constant in a function that returns the style if colours are enabled.
macro_rules! wrap {
    ($func:ident, $def:ident) => {
        #[allow(dead_code)]
        #[must_use]
        /// Conditional styling accessor for
        #[doc = stringify!($func)]
        /// messages
        pub fn $func() -> anstyle::Style {
            if use_colours() {
                $def
            } else {
                anstyle::Style::new()
            }
        }
    };
}

wrap!(error, _ERROR);
wrap!(warning, _WARNING);
wrap!(info, _INFO);
wrap!(success, _SUCCESS);
wrap!(header, _HEADER);

// CONDITIONALITY & CLI //////////////////////////////////////////////////////////

/// Are we configured to use terminal colours?
#[must_use]
pub fn use_colours() -> bool {
    console::colors_enabled()
}

/// The available terminal colour modes
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    clap::ValueEnum,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "lowercase")]
pub enum ColourMode {
    #[value(alias = "on", alias = "yes")]
    /// Forces colours on, whatever is happening
    /// (aliases: `on`, `yes`)
    Always,
    #[value(alias = "off", alias = "no", alias = "none")]
    /// (aliases: `off`, `no`, `none`)
    Never,
    /// Use colours only when writing to a terminal. This is the default behaviour.
    #[default]
    Auto,
}

impl<'de> Deserialize<'de> for ColourMode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        <Self as clap::ValueEnum>::from_str(&s, true)
            .map_err(|_| de::Error::unknown_variant(&s, ColourMode::VARIANTS))
    }
}

/// Detect the desired colour mode from the environment variables
///
/// See [https://bixense.com/clicolors/](https://bixense.com/clicolors/) for more information.
pub(crate) fn autodetect_colour() -> bool {
    let clicolor_force = std::env::var("CLICOLOR_FORCE").unwrap_or_default();
    let no_color = std::env::var("NO_COLOR").unwrap_or_default();

    if !no_color.is_empty() {
        false
    } else if !clicolor_force.is_empty() {
        true
    } else {
        std::io::stdout().is_terminal()
    }
}

/// Set up the terminal colour mode.
///
/// If `mode` is `None` or `Auto`, we use the quasi-standard `CLICOLOR_FORCE` and `NO_COLOR`
/// environment variables, then whether stdout is a terminal.
pub fn configure_colours(mode: Option<ColourMode>) {
    let state = match mode {
        Some(ColourMode::Always) => true,
        Some(ColourMode::Never) => false,
        None | Some(ColourMode::Auto) => autodetect_colour(),
    };
    console::set_colors_enabled(state);
    console::set_colors_enabled_stderr(state);
    if state {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    }
    .write_global();
}

#[cfg(test)]
mod test {
    use super::ColourMode;
    use pretty_assertions::assert_eq;
    use rusty_fork::rusty_fork_test;

    #[test]
    fn deserialize_aliases() {
        #[derive(serde::Deserialize)]
        struct Test {
            c: ColourMode,
        }
        for (input, expected) in [
            ("always", ColourMode::Always),
            ("NEVER", ColourMode::Never),
            ("off", ColourMode::Never),
            ("Auto", ColourMode::Auto),
        ] {
            let t: Test = figment::Figment::new()
                .merge(figment::providers::Serialized::default("c", input))
                .extract()
                .unwrap();
            assert_eq!(t.c, expected, "{input}");
        }
    }

    rusty_fork_test! {
        #[test]
        fn forced_on_and_off() {
            super::configure_colours(Some(ColourMode::Always));
            assert!(super::use_colours());
            assert_eq!(super::error(), super::_ERROR);
            super::configure_colours(Some(ColourMode::Never));
            assert!(!super::use_colours());
            assert_eq!(super::success(), anstyle::Style::new());
        }
    }
}
