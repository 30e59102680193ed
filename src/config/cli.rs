use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

use crate::application::controller::UserAction;

/// Command-line arguments for the postpager binary.
#[derive(Debug, Parser)]
#[command(
    name = "postpager",
    version,
    about = "Year filter and pagination for blog post lists"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "POSTPAGER_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Apply filter and pagination to a page and print the resulting markup.
    Render(RenderArgs),
    /// Print the discovered list, year catalog and pagination state as JSON.
    Inspect(InspectArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the number of posts per page.
    #[arg(long = "page-size", value_name = "COUNT", global = true)]
    pub page_size: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Clone)]
pub struct PageArgs {
    /// Rendered page containing the post list.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    /// URL the page is served at, including any `#page=<n>` fragment.
    #[arg(long, value_name = "URL", value_hint = ValueHint::Url)]
    pub url: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// User action to replay after initialization: `year:<value>`, `clear`,
    /// `prev` or `next`. Repeatable; applied in order.
    #[arg(long = "step", value_name = "ACTION")]
    pub steps: Vec<UserAction>,

    /// Write the markup here instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub page: PageArgs,
}
