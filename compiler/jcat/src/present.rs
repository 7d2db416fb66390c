//! Catalog rendering.
//!
//! Text output lists one `fn` line per signature with its dotted path, the
//! final segment in bold when colors are on. JSON output is the whole
//! catalog tree.

use std::io::{self, Write};

use jcat_resolve::CatalogValue;

/// ANSI codes for terminal output.
mod colors {
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    /// Colors when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a boolean. `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `fn a.b(x, y)` lines.
    #[default]
    Text,
    /// The catalog tree as JSON.
    Json,
}

/// Options for text rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PresentOptions {
    pub colors: bool,
    /// Also print `name: Tag` lines for opaque values.
    pub show_opaque: bool,
}

/// Write the entries of `catalog` as text lines, sorted by path.
///
/// Absent entries are never printed. A catalog that is not a namespace
/// prints nothing.
pub fn render_text(
    catalog: &CatalogValue,
    options: PresentOptions,
    out: &mut dyn Write,
) -> io::Result<()> {
    TextRenderer { options, out }.namespace(catalog, "")
}

/// Write `catalog` as pretty-printed JSON followed by a newline.
pub fn render_json(catalog: &CatalogValue, out: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, catalog)?;
    writeln!(out)
}

struct TextRenderer<'a> {
    options: PresentOptions,
    out: &'a mut dyn Write,
}

impl TextRenderer<'_> {
    fn namespace(&mut self, value: &CatalogValue, prefix: &str) -> io::Result<()> {
        let Some(entries) = value.as_namespace() else {
            return Ok(());
        };
        for (name, value) in entries {
            match value {
                CatalogValue::Signature { params } => {
                    writeln!(
                        self.out,
                        "fn {prefix}{}({})",
                        self.emphasize(name),
                        params.join(", ")
                    )?;
                }
                CatalogValue::Namespace(_) => self.namespace(value, &format!("{prefix}{name}."))?,
                CatalogValue::Opaque { tag } if self.options.show_opaque => {
                    let tag = self.dim(tag);
                    writeln!(self.out, "{prefix}{}: {tag}", self.emphasize(name))?;
                }
                CatalogValue::Opaque { .. } | CatalogValue::Absent => {}
            }
        }
        Ok(())
    }

    fn emphasize(&self, text: &str) -> String {
        self.paint(colors::BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(colors::DIM, text)
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.options.colors {
            format!("{code}{text}{}", colors::RESET)
        } else {
            text.to_owned()
        }
    }
}
