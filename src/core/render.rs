//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md

use crate::core::model::{Kind, ResultItem, ResultSet};
use clap::ValueEnum;
use std::io::Write;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    #[value(name = "md", alias = "markdown")]
    Markdown,
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
        }
    }

    /// Render to a writer, followed by a newline
    pub fn render_to<W: Write>(
        &self,
        result_set: &ResultSet,
        mut writer: W,
    ) -> std::io::Result<()> {
        let output = self.render(result_set);
        if output.is_empty() {
            return Ok(());
        }
        writeln!(writer, "{}", output)
    }

    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut libraries = Vec::new();
        let mut units = Vec::new();
        let mut paths = Vec::new();
        let mut errors = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Library => libraries.push(item),
                Kind::Unit => units.push(item),
                Kind::Path => paths.push(item),
                Kind::Error => errors.push(item),
            }
        }

        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}\n", error.code, error.message));
                }
            }
            output.push('\n');
        }

        if !libraries.is_empty() {
            output.push_str("## Libraries\n\n");
            for item in libraries {
                self.render_library_md(&mut output, item);
            }
            output.push('\n');
        }

        if !units.is_empty() {
            output.push_str("## Units\n\n");
            for item in units {
                self.render_unit_md(&mut output, item);
            }
            output.push('\n');
        }

        if !paths.is_empty() {
            output.push_str("## Paths\n\n");
            for item in paths {
                if let Some(path) = &item.path {
                    output.push_str(&format!("- `{}`\n", path));
                }
            }
            output.push('\n');
        }

        output
    }

    fn render_library_md(&self, output: &mut String, item: &ResultItem) {
        let name = item.name.as_deref().unwrap_or("?");
        output.push_str(&format!("- **{}**", name));
        match item.path.as_deref() {
            Some(path) if !item.meta.temporary => output.push_str(&format!(" `{}`", path)),
            _ => output.push_str(" (temporary)"),
        }
        if let Some(units) = item.meta.units {
            output.push_str(&format!(", {} unit(s)", units));
        }
        output.push('\n');
    }

    fn render_unit_md(&self, output: &mut String, item: &ResultItem) {
        let name = item.name.as_deref().unwrap_or("?");
        output.push_str(&format!("### `{}`", name));
        if item.meta.dirty == Some(true) {
            output.push_str(" (unsaved)");
        }
        output.push('\n');

        if let Some(data) = &item.data {
            let body = serde_json::to_string_pretty(data).unwrap_or_default();
            output.push_str("\n```json\n");
            output.push_str(&body);
            output.push_str("\n```\n");
        }
        output.push('\n');
    }
}
