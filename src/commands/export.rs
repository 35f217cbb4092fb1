use crate::core::config::{ExportOptions, apply_preset};
use crate::core::errors::ApiDiffError;
use crate::core::exporter::exporter_for;
use crate::core::loader::load_diff_file;
use crate::core::output::OutputWriterFactory;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

pub struct ExportArgs {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub format: String,
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub exclude: Vec<String>,
    pub assembly_name: Option<String>,
}

pub fn resolve_options(args: &ExportArgs) -> Result<ExportOptions> {
    let cwd = std::env::current_dir()?;
    let mut options = ExportOptions::load(args.config.as_deref(), &cwd)?;
    if let Some(p) = &args.preset {
        apply_preset(&mut options, p)?;
    }
    options.excluded_types.extend(args.exclude.iter().cloned());
    Ok(options)
}

/// Diff documents under `input`: the file itself, or every `*.xml` below a directory.
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|e| e == "xml") {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(anyhow::anyhow!("No .xml diff documents found in {:?}", input));
    }
    Ok(files)
}

pub fn export_diffs(args: ExportArgs) -> Result<Vec<PathBuf>> {
    let inputs = collect_inputs(&args.input)?;
    if args.assembly_name.is_some() && inputs.len() > 1 {
        return Err(ApiDiffError::ConfigError(
            "--assembly-name cannot be used with several input documents".to_string(),
        )
        .into());
    }

    let options = resolve_options(&args)?;
    let exporter = exporter_for(&args.format, options)?;
    let factory = OutputWriterFactory::new(&args.out_dir);

    let mut written = Vec::new();
    let mut sources: HashMap<PathBuf, PathBuf> = HashMap::new();
    for input in inputs {
        let diff = load_diff_file(&input)?;
        let assembly_name = args
            .assembly_name
            .clone()
            .or_else(|| diff.name.clone())
            .or_else(|| input.file_stem().map(|s| s.to_string_lossy().to_string()))
            .with_context(|| format!("Cannot determine assembly name for {:?}", input))?;

        info!(input = ?input, assembly = %assembly_name, format = exporter.format(), "Exporting");
        let path = exporter.export(&diff, &assembly_name, &factory)?;
        println!("{}", path.display());
        match sources.insert(path.clone(), input.clone()) {
            Some(previous) => warn!(
                report = ?path,
                previous = ?previous,
                input = ?input,
                "Report overwritten by a later document with the same assembly name"
            ),
            None => written.push(path),
        }
    }

    info!(count = written.len(), dir = ?factory.dir(), "Export completed");
    Ok(written)
}
