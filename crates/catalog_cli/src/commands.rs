use crate::cli::{CategoriesArgs, Cli, Command, TreeArgs};
use anyhow::Context;
use catalog_core::{
    core_version, init_logging, open_db, ping, CatalogConfig, CategoryService, FsAssetStore,
    SortDirection, SqliteCategoryRepository, SqliteProductRepository,
};
use log::info;
use rusqlite::Connection;
use std::path::Path;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Ping => {
            println!("catalog_core ping={}", ping());
            println!("catalog_core version={}", core_version());
            Ok(())
        }
        Command::Categories(args) => {
            let runtime = Runtime::start(cli.config.as_deref())?;
            cmd_categories(&runtime, args)
        }
        Command::Tree(args) => {
            let runtime = Runtime::start(cli.config.as_deref())?;
            cmd_tree(&runtime, args)
        }
    }
}

/// Opened store plus the settings it was opened with.
struct Runtime {
    config: CatalogConfig,
    conn: Connection,
    assets: FsAssetStore,
}

impl Runtime {
    fn start(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let config = CatalogConfig::load(config_path).context("failed to load catalog settings")?;
        if let Some(log_dir) = config.log_dir.as_ref() {
            init_logging(&config.log_level, log_dir).context("failed to start logging")?;
        }

        let conn = open_db(&config.database_path).with_context(|| {
            format!("failed to open `{}`", config.database_path.display())
        })?;
        let assets = FsAssetStore::open(&config.asset_root, config.asset_url_prefix.clone())
            .context("failed to open asset store")?;
        info!(
            "event=cli_start module=cli status=ok db={}",
            config.database_path.display()
        );
        Ok(Self {
            config,
            conn,
            assets,
        })
    }

    fn categories(
        &self,
    ) -> anyhow::Result<
        CategoryService<SqliteCategoryRepository<'_>, SqliteProductRepository<'_>, &FsAssetStore>,
    > {
        Ok(CategoryService::new(
            SqliteCategoryRepository::try_new(&self.conn)?,
            SqliteProductRepository::try_new(&self.conn)?,
            &self.assets,
        )
        .with_default_page_size(self.config.default_page_size))
    }
}

fn cmd_categories(runtime: &Runtime, args: CategoriesArgs) -> anyhow::Result<()> {
    let service = runtime.categories()?;
    let page = service.list_page(args.page, args.size, args.sort.as_str())?;
    let views = page.map(|category| service.view(&category));
    println!("{}", serde_json::to_string_pretty(&views)?);
    Ok(())
}

fn cmd_tree(runtime: &Runtime, args: TreeArgs) -> anyhow::Result<()> {
    let service = runtime.categories()?;
    let direction = SortDirection::parse(args.sort.as_str());
    if args.json {
        let tree = service.tree(direction)?;
        println!(
            "{}",
            serde_json::to_string_pretty(&service.tree_view(&tree))?
        );
    } else {
        println!("{}", service.hierarchy_text(direction)?);
    }
    Ok(())
}
