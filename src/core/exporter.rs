use crate::core::config::ExportOptions;
use crate::core::datamodel::AssemblyDiff;
use crate::core::errors::ApiDiffError;
use crate::core::output::{OutputWriterFactory, assembly_title, report_file_name};
use crate::core::renderer::MarkdownRenderer;
use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;

pub const FORMATS: &[&str] = &[MarkdownExporter::FORMAT, JsonExporter::FORMAT];

pub trait Exporter {
    fn format(&self) -> &'static str;

    /// Writes the report for `assembly_name` and returns the file it created.
    fn export(&self, diff: &AssemblyDiff, assembly_name: &str, factory: &OutputWriterFactory) -> Result<PathBuf>;
}

pub fn exporter_for(format: &str, options: ExportOptions) -> Result<Box<dyn Exporter>, ApiDiffError> {
    match format {
        MarkdownExporter::FORMAT => Ok(Box::new(MarkdownExporter { options })),
        JsonExporter::FORMAT => Ok(Box::new(JsonExporter)),
        other => Err(ApiDiffError::UnknownFormat(other.to_string())),
    }
}

/// Colored, indented Markdown.
pub struct MarkdownExporter {
    pub options: ExportOptions,
}

impl MarkdownExporter {
    pub const FORMAT: &'static str = "markdown+";
}

impl Exporter for MarkdownExporter {
    fn format(&self) -> &'static str {
        Self::FORMAT
    }

    fn export(&self, diff: &AssemblyDiff, assembly_name: &str, factory: &OutputWriterFactory) -> Result<PathBuf> {
        let mut writer = factory.create(&report_file_name(assembly_name, "md"))?;
        MarkdownRenderer::new(&self.options)
            .render(diff, &assembly_title(assembly_name), &mut writer)
            .with_context(|| format!("Failed to export {:?}", writer.path()))?;
        writer.finish()
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug)]
pub struct JsonReport {
    pub schema_version: String,
    pub format: String,
    pub generated_at: String,
    pub assembly: String,
    pub diff: AssemblyDiff,
}

/// The loaded diff tree as pretty-printed JSON.
pub struct JsonExporter;

impl JsonExporter {
    pub const FORMAT: &'static str = "json";
}

impl Exporter for JsonExporter {
    fn format(&self) -> &'static str {
        Self::FORMAT
    }

    fn export(&self, diff: &AssemblyDiff, assembly_name: &str, factory: &OutputWriterFactory) -> Result<PathBuf> {
        let report = JsonReport {
            schema_version: "1.0".to_string(),
            format: Self::FORMAT.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            assembly: assembly_title(assembly_name),
            diff: diff.clone(),
        };

        let mut writer = factory.create(&report_file_name(assembly_name, "json"))?;
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writeln!(writer)?;
        writer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::load_diff;
    use std::fs;

    const SAMPLE: &str = r#"<Assembly Name="Game.dll" DiffType="Modified">
        <Module Name="Game.dll" DiffType="Modified">
          <Type Name="Game.Player" DiffType="New" />
          <Type Name="Game.Broken" DiffType="Renamed" />
        </Module></Assembly>"#;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("apidiff-md-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_exporter_lookup() {
        let md = exporter_for("markdown+", ExportOptions::default()).unwrap();
        assert_eq!(md.format(), "markdown+");
        assert_eq!(exporter_for("json", ExportOptions::default()).unwrap().format(), "json");
        assert!(matches!(
            exporter_for("html", ExportOptions::default()),
            Err(ApiDiffError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_markdown_export_keeps_partial_report_on_abort() {
        let dir = scratch_dir("partial");
        let diff = load_diff(SAMPLE).unwrap();
        let exporter = MarkdownExporter { options: ExportOptions::default() };

        let err = exporter
            .export(&diff, "Game.dll", &OutputWriterFactory::new(&dir))
            .unwrap_err();
        assert!(err.chain().any(|e| matches!(
            e.downcast_ref::<ApiDiffError>(),
            Some(ApiDiffError::UnknownDiffType { .. })
        )));

        let written = fs::read_to_string(dir.join("Game.md")).unwrap();
        assert!(written.starts_with("## API Changes: `Game`\n\n"));
        assert!(written.contains("Game.**Player**"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_json_export() {
        let dir = scratch_dir("json");
        let diff = load_diff(SAMPLE).unwrap();
        let path = JsonExporter
            .export(&diff, "Game.dll", &OutputWriterFactory::new(&dir))
            .unwrap();
        assert_eq!(path, dir.join("Game.json"));

        let report: JsonReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(report.assembly, "Game");
        assert_eq!(report.diff.module.types.len(), 2);
        let _ = fs::remove_dir_all(&dir);
    }
}
