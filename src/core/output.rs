use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Opens report files inside one output directory.
pub struct OutputWriterFactory {
    dir: PathBuf,
}

impl OutputWriterFactory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        OutputWriterFactory { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn create(&self, file_name: &Path) -> Result<OutputWriter> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("Failed to create output directory {:?}", self.dir))?;
        }
        let path = self.dir.join(file_name);
        let file = File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
        Ok(OutputWriter {
            path,
            inner: BufWriter::new(file),
        })
    }
}

/// Buffered report file. Dropping it closes the file; `finish` also
/// surfaces flush errors.
pub struct OutputWriter {
    path: PathBuf,
    inner: BufWriter<File>,
}

impl OutputWriter {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn finish(mut self) -> Result<PathBuf> {
        self.inner
            .flush()
            .with_context(|| format!("Failed to write {:?}", self.path))?;
        Ok(self.path)
    }
}

impl Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

const FALLBACK_NAME: &str = "report";

/// Last component of an assembly name, with either separator style.
/// Reports always land directly in the output directory.
fn base_name(assembly_name: &str) -> &str {
    match assembly_name.rsplit(['/', '\\']).next() {
        Some(name) if !name.is_empty() && name != "." && name != ".." => name,
        _ => FALLBACK_NAME,
    }
}

/// Report file name for an assembly: same base name, new extension.
pub fn report_file_name(assembly_name: &str, extension: &str) -> PathBuf {
    Path::new(base_name(assembly_name)).with_extension(extension)
}

/// Assembly name without directory or extension, as shown in report titles.
pub fn assembly_title(assembly_name: &str) -> String {
    let name = base_name(assembly_name);
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| name.to_string())
}
