use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::processor::{DomainCount, ProcessorError, Result};

pub const OUTPUT_HEADER: &str = "Domain,Count";
pub const OUTPUT_DIR: &str = "outcomes";
const OUTPUT_SUFFIX: &str = "_output";
const WRITE_BUFFER: usize = 1024 * 1024;

/// Where the ranked result for `input` is written by default
///
/// `data/customers.csv` becomes `data/outcomes/customers_output.csv`.
pub fn output_path_for(input: &Path) -> PathBuf {
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();

    let mut name = format!("{stem}{OUTPUT_SUFFIX}");
    if let Some(ext) = input.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }

    dir.join(OUTPUT_DIR).join(name)
}

/// Writes the header and one `domain,count` line per entry
pub fn write_ranked<W: Write>(writer: &mut W, ranked: &[DomainCount]) -> std::io::Result<()> {
    writeln!(writer, "{OUTPUT_HEADER}")?;
    for entry in ranked {
        writeln!(writer, "{},{}", entry.domain, entry.count)?;
    }
    Ok(())
}

/// Writes the ranked result to `path`, creating missing parent directories
///
/// The file is overwritten in place; after an error its contents are not
/// reliable.
pub fn write_results(path: &Path, ranked: &[DomainCount]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| ProcessorError::io("create directory", parent, e))?;
    }

    let file = File::create(path).map_err(|e| ProcessorError::io("create", path, e))?;
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER, file);

    write_ranked(&mut writer, ranked).map_err(|e| ProcessorError::io("write", path, e))?;
    writer
        .flush()
        .map_err(|e| ProcessorError::io("flush", path, e))?;

    Ok(())
}
