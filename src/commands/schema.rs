use crate::core::exporter::JsonReport;
use anyhow::Result;
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

pub fn generate_schemas(out_dir: &Path) -> Result<PathBuf> {
    if !out_dir.exists() {
        fs::create_dir_all(out_dir)?;
    }

    let diff_schema = schema_for!(JsonReport);
    let path = out_dir.join("diff.schema.json");
    fs::write(&path, serde_json::to_string_pretty(&diff_schema)?)?;

    println!("Schema written to {}", path.display());
    Ok(path)
}
