use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "catalog", about = "Catalog store inspection tool", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML settings file; `CATALOG__*` environment variables override it.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check core linkage and print its version
    Ping,
    /// List one page of categories, top-level first
    Categories(CategoriesArgs),
    /// Print the nested category hierarchy
    Tree(TreeArgs),
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum SortArg {
    #[default]
    Asc,
    Desc,
}

impl SortArg {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Args)]
pub struct CategoriesArgs {
    /// Zero-based page index
    #[arg(long)]
    pub page: Option<u32>,
    /// Page size; falls back to the configured default
    #[arg(long)]
    pub size: Option<u32>,
    #[arg(long, value_enum, default_value_t = SortArg::Asc)]
    pub sort: SortArg,
}

#[derive(Args)]
pub struct TreeArgs {
    #[arg(long, value_enum, default_value_t = SortArg::Asc)]
    pub sort: SortArg,
    /// Print JSON instead of indented text
    #[arg(long)]
    pub json: bool,
}
