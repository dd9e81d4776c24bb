use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use super::generator::ResultSet;

pub const CSV_HEADER: &str = "Phone Number";

/// Base name of every download; the extension follows the format.
const FILE_STEM: &str = "phone-numbers";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Txt,
    Csv,
    Json,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl Format {
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "txt" => Ok(Format::Txt),
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            _ => bail!("invalid format: {} (expected txt, csv or json)", s),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Txt => "txt",
            Format::Csv => "csv",
            Format::Json => "json",
        }
    }

    /// Fixed download name for this format, e.g. `phone-numbers.csv`.
    pub fn file_name(self) -> String {
        format!("{}.{}", FILE_STEM, self.extension())
    }
}

#[derive(Serialize)]
struct JsonRow {
    number: String,
    digits: String,
}

/// Serialize a result set in the given format.
pub fn render(set: &ResultSet, format: Format) -> Result<String> {
    let out = match format {
        Format::Txt => lines(set, None),
        Format::Csv => lines(set, Some(CSV_HEADER)),
        Format::Json => {
            let rows: Vec<JsonRow> = set
                .numbers()
                .map(|n| JsonRow {
                    number: n.to_string(),
                    digits: n.digits(),
                })
                .collect();
            let mut s = serde_json::to_string_pretty(&rows).context("failed to encode JSON")?;
            s.push('\n');
            s
        }
    };
    Ok(out)
}

fn lines(set: &ResultSet, header: Option<&str>) -> String {
    // "0301-123-4567\n" is 14 bytes
    let mut out = String::with_capacity(set.len() * 14 + 16);
    if let Some(h) = header {
        out.push_str(h);
        out.push('\n');
    }
    for n in set.numbers() {
        out.push_str(&n.to_string());
        out.push('\n');
    }
    out
}

/// Write `phone-numbers.<ext>` into `dir` and return its path.
pub fn download(set: &ResultSet, format: Format, dir: &Path) -> Result<PathBuf> {
    if set.is_empty() {
        bail!("nothing to export: generate some numbers first");
    }
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let path = dir.join(format.file_name());
    let content = render(set, format)?;
    std::fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;

    log::info!("exported {} numbers to {}", set.len(), path.display());
    Ok(path)
}
