pub mod yaml;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle YAML files
    Yaml {
        #[command(subcommand)]
        command: yaml::YamlCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Yaml { command } => command.handle(),
        }
    }
}
