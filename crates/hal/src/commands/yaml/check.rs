use clap::Args;
use hal_xdata::header::{XDataVersion, XDATA_MAGIC};
use hal_yaml::{document::YAML_MAGIC, Yaml};
use itertools::Itertools;
use miette::{miette, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const BYTES_PER_LINE: usize = 16;

#[derive(Args)]
pub struct CheckArgs {
    /// A YAML file or a directory to search for them
    #[arg(short, long, value_name = "PATH")]
    path: PathBuf,
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Skipped,
    Identical,
    Mismatch(String),
}

/// Whether `data` looks like an XData file holding a YAML tree
fn is_yaml(data: &[u8]) -> bool {
    if !data.starts_with(XDATA_MAGIC) || data.len() < 8 {
        return false;
    }

    let start = if XDataVersion::new(data[6], data[7]).has_footer() {
        20
    } else {
        16
    };
    data.get(start..start + 4) == Some(YAML_MAGIC.as_slice())
}

fn hex_dump(data: &[u8]) -> String {
    data.chunks(BYTES_PER_LINE)
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "{:08x}  {}",
                i * BYTES_PER_LINE,
                chunk.iter().map(|b| format!("{b:02x}")).join(" ")
            )
        })
        .join("\n")
}

/// Render the first differing region of two hex dumps
fn first_difference(expected: &[u8], actual: &[u8]) -> String {
    let expected = hex_dump(expected);
    let actual = hex_dump(actual);
    let diff = TextDiff::from_lines(&expected, &actual);

    let mut lines = Vec::new();
    if let Some(group) = diff.grouped_ops(2).first() {
        for op in group {
            for change in diff.iter_changes(op) {
                let line = change.value().trim_end();
                lines.push(match change.tag() {
                    ChangeTag::Delete => format!("- {}", line.red()),
                    ChangeTag::Insert => format!("+ {}", line.green()),
                    ChangeTag::Equal => format!("  {}", line.dimmed()),
                });
            }
        }
    }

    lines.join("\n")
}

fn check_file(path: &Path) -> Result<Outcome> {
    let data = std::fs::read(path).into_diagnostic()?;
    if !is_yaml(&data) {
        debug!("skipping {}", path.display());
        return Ok(Outcome::Skipped);
    }

    let yaml = Yaml::read(&data)?;
    let encoded = yaml.to_bytes()?;

    if encoded == data {
        Ok(Outcome::Identical)
    } else {
        Ok(Outcome::Mismatch(first_difference(&data, &encoded)))
    }
}

impl CheckArgs {
    pub fn handle(&self) -> Result<()> {
        let mut checked = 0;
        let mut failed = Vec::new();

        for entry in WalkDir::new(&self.path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            match check_file(path) {
                Ok(Outcome::Skipped) => continue,
                Ok(Outcome::Identical) => {
                    info!("{} {}", "ok".green(), path.display());
                }
                Ok(Outcome::Mismatch(diff)) => {
                    warn!("{} {}", "mismatch".red(), path.display());
                    println!("{}\n{}", path.display().bold(), diff);
                    failed.push(path.to_owned());
                }
                Err(error) => {
                    warn!("{} {}: {:?}", "error".red(), path.display(), error);
                    failed.push(path.to_owned());
                }
            }
            checked += 1;
        }

        println!(
            "checked {} files, {} passed, {} failed",
            checked,
            (checked - failed.len()).green(),
            failed.len().red()
        );

        if failed.is_empty() {
            Ok(())
        } else {
            Err(miette!(
                "{} files did not round trip:\n{}",
                failed.len(),
                failed.iter().map(|p| p.display()).join("\n")
            ))
        }
    }
}
