use clap::{Args, ValueEnum};
use hal_yaml::{Node, Yaml};
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use std::{fs::File, path::PathBuf};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct ShowArgs {
    /// An input YAML file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn render(lines: &mut Vec<String>, label: &str, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);

    match node {
        Node::Hash(hash) => {
            lines.push(format!(
                "{indent}{} {}",
                label.cyan(),
                format!("({} entries)", hash.len()).dimmed()
            ));
            for (key, value) in hash {
                render(lines, &format!("{key}:"), value, depth + 1);
            }
        }
        Node::Array(array) => {
            lines.push(format!(
                "{indent}{} {}",
                label.cyan(),
                format!("({} items)", array.len()).dimmed()
            ));
            for (i, value) in array.iter().enumerate() {
                render(lines, &format!("[{i}]"), value, depth + 1);
            }
        }
        Node::String(value) => {
            lines.push(format!("{indent}{} {}", label.cyan(), format!("{value:?}").green()));
        }
        Node::Invalid => {
            lines.push(format!("{indent}{} {}", label.cyan(), node.red()));
        }
        _ => {
            lines.push(format!("{indent}{} {}", label.cyan(), node.yellow()));
        }
    }
}

impl ShowArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let yaml = Yaml::read_from(f).context(format!("reading {}", &self.file.display()))?;

        match self.format {
            Format::Text => {
                println!(
                    "{}: {:?} endian, xdata {}, yaml version {}",
                    self.file.display().bold(),
                    yaml.xdata.endian,
                    yaml.xdata.version,
                    yaml.version
                );

                let mut lines = Vec::new();
                render(&mut lines, "root:", &yaml.root, 0);
                for line in lines {
                    println!("{line}");
                }
            }
            Format::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&yaml.root).into_diagnostic()?
                );
            }
        }

        Ok(())
    }
}
