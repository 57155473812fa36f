//! Terminal preferences for the tables `evdash show` and the listing
//! commands print.
//!
//! Resolved once at startup from `--color`, `--format`, whether stdout is a
//! terminal, `NO_COLOR` and `COLUMNS`. Every table render reads the result.

use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat};
use crate::output::table::TableOptions;

/// Narrower `COLUMNS` values are ignored; tables are not wrapped below this.
const MIN_TABLE_WIDTH: usize = 40;

const PLAIN: TableOptions = TableOptions {
    max_width: None,
    color: false,
};

static TABLE_OPTIONS: OnceLock<TableOptions> = OnceLock::new();

/// What the process knows about its terminal.
#[derive(Clone, Debug, Default)]
struct Terminal {
    is_tty: bool,
    no_color: bool,
    columns: Option<String>,
}

impl Terminal {
    fn current() -> Self {
        Self {
            is_tty: std::io::stdout().is_terminal(),
            no_color: std::env::var_os("NO_COLOR").is_some(),
            columns: std::env::var("COLUMNS").ok(),
        }
    }
}

fn resolve(flags: &GlobalFlags, terminal: &Terminal) -> TableOptions {
    let tables = flags.format == OutputFormat::Table;
    let color = tables
        && match flags.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => terminal.is_tty && !terminal.no_color,
        };
    let max_width = terminal
        .columns
        .as_deref()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|width| *width >= MIN_TABLE_WIDTH);
    TableOptions { max_width, color }
}

pub fn init(flags: &GlobalFlags) {
    let options = resolve(flags, &Terminal::current());
    tracing::debug!(color = options.color, width = ?options.max_width, "terminal preferences");
    let _ = TABLE_OPTIONS.set(options);
}

/// Options for terminal tables; plain and unbounded before [`init`].
#[must_use]
pub fn table_options() -> TableOptions {
    TABLE_OPTIONS.get().copied().unwrap_or(PLAIN)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn flags(format: OutputFormat, color: ColorMode) -> GlobalFlags {
        GlobalFlags {
            format,
            color,
            quiet: false,
            base_url: None,
        }
    }

    fn tty() -> Terminal {
        Terminal {
            is_tty: true,
            ..Terminal::default()
        }
    }

    #[rstest]
    #[case::auto_on_a_terminal(OutputFormat::Table, ColorMode::Auto, tty(), true)]
    #[case::auto_piped(OutputFormat::Table, ColorMode::Auto, Terminal::default(), false)]
    #[case::no_color_wins_over_auto(
        OutputFormat::Table,
        ColorMode::Auto,
        Terminal { no_color: true, ..tty() },
        false
    )]
    #[case::always_when_piped(OutputFormat::Table, ColorMode::Always, Terminal::default(), true)]
    #[case::never_on_a_terminal(OutputFormat::Table, ColorMode::Never, tty(), false)]
    #[case::json_is_never_colored(OutputFormat::Json, ColorMode::Always, tty(), false)]
    fn color_follows_flag_and_terminal(
        #[case] format: OutputFormat,
        #[case] color: ColorMode,
        #[case] terminal: Terminal,
        #[case] expected: bool,
    ) {
        assert_eq!(resolve(&flags(format, color), &terminal).color, expected);
    }

    #[test]
    fn narrow_or_garbage_columns_are_ignored() {
        let width = |columns: &str| {
            let terminal = Terminal {
                columns: Some(columns.to_string()),
                ..Terminal::default()
            };
            resolve(&flags(OutputFormat::Table, ColorMode::Never), &terminal).max_width
        };
        assert_eq!(width("120"), Some(120));
        assert_eq!(width("39"), None);
        assert_eq!(width("wide"), None);
    }
}
