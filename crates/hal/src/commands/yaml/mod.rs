pub mod check;
pub mod show;

#[derive(clap::Subcommand)]
pub enum YamlCommands {
    /// Print the contents of a YAML file
    Show(show::ShowArgs),
    /// Verify that YAML files survive a decode and encode unchanged
    Check(check::CheckArgs),
}

impl YamlCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            YamlCommands::Show(show) => show.handle(),
            YamlCommands::Check(check) => check.handle(),
        }
    }
}
