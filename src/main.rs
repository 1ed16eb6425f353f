// main.rs — 程序入口
// 负责初始化异步运行时、解析命令行参数、分发子命令

mod cache; // 声明 cache 模块，对应 src/cache.rs
mod catalog; // 声明 catalog 模块，对应 src/catalog.rs
mod cli; // 声明 cli 模块，对应 src/cli.rs
mod config; // 声明 config 模块，对应 src/config.rs
mod crawler;
mod source;

// 初始化多语言支持，嵌入 locales 目录下的所有翻译
rust_i18n::i18n!("locales");

use cache::ResourceCache;
use clap::{CommandFactory, Parser}; // 引入 Parser trait 的 parse() 方法; CommandFactory 用于生成补全脚本
use clap_complete::generate; // 引入补全脚本生成函数
use cli::{Cli, Commands};
use config::AppConfig;
use rust_i18n::t; // 引入翻译宏
use std::path::Path;

/// `#[tokio::main]` 宏将 async main 转换为同步 main + tokio 运行时
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 自动检测系统语言并设置
    let locale = std::env::var("LANG").unwrap_or_else(|_| "en".to_string());
    if locale.starts_with("zh") {
        rust_i18n::set_locale("zh-CN");
    } else {
        rust_i18n::set_locale("en");
    }

    // 解析命令行参数
    let cli = Cli::parse();

    // 创建应用配置（读取配置文件、设置路径）
    let mut config = AppConfig::new();

    // 确保数据目录与缓存目录存在
    config.ensure_dirs()?;

    // 根据子命令分发执行逻辑
    match &cli.command {
        Commands::Crawl => {
            handle_crawl(&config).await?;
        }

        Commands::List => {
            handle_list(&config);
        }

        Commands::Download { url } => {
            handle_download(&config, url).await?;
        }

        Commands::Cache { path } => {
            handle_cache(&config, path)?;
        }

        Commands::Completions { shell } => {
            generate(
                *shell,
                &mut Cli::command(),
                "wallcrawl",
                &mut std::io::stdout(),
            );
        }

        Commands::Config { action } => {
            handle_config(&mut config, action)?;
        }
    }

    Ok(())
}

/// 处理 crawl 子命令：串行抓取所有源并更新目录文件
async fn handle_crawl(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", t!("crawl_start"));

    let report = crawler::run(config).await?;

    for source in &report.sources {
        match &source.error {
            Some(reason) => println!(
                "{}",
                t!("crawl_report_error", name => source.name, count => source.count, reason => reason)
            ),
            None => println!(
                "{}",
                t!("crawl_report_line", name => source.name, count => source.count)
            ),
        }
    }

    println!("{}", t!("crawl_done", total => report.total));
    Ok(())
}

/// 处理 list 子命令：打印本地目录的全部条目
fn handle_list(config: &AppConfig) {
    let items = catalog::load(&config.catalog_path);

    if items.is_empty() {
        println!("{}", t!("list_empty"));
        return;
    }

    println!("{}", t!("list_title", count => items.len()));
    for item in &items {
        println!("  [{}] {} ({})", item.kind.as_str(), item.title, item.category);
        println!("      {}", item.url);
    }
}

/// 处理 download 子命令：按需下载单张壁纸
/// 与批量抓取不同，这里的失败直接上抛，让用户看到明确的错误
async fn handle_download(config: &AppConfig, url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let cache = ResourceCache::new(config.cache_dir.clone(), config.download_timeout())?;

    println!("{}", t!("download_start", url => url));
    let path = cache.download(url).await?;
    println!("{}", t!("save_path", path => path.display()));

    Ok(())
}

/// 处理 cache 子命令：收纳本地文件，尽力而为、从不失败
fn handle_cache(config: &AppConfig, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let cache = ResourceCache::new(config.cache_dir.clone(), config.download_timeout())?;

    let managed = cache.cache(Path::new(path));
    println!("{}", t!("save_path", path => managed.display()));

    Ok(())
}

/// 处理 config 子命令：查看或修改配置
fn handle_config(
    config: &mut AppConfig,
    action: &cli::ConfigAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        cli::ConfigAction::Show => {
            println!("{}", t!("config_title"));
            println!(
                "{}",
                t!("config_path", path => config.config_path.display())
            );
            println!(
                "{}",
                t!("config_data_dir", path => config.data_dir.display())
            );
            println!(
                "{}",
                t!("config_catalog", path => config.catalog_path.display())
            );
            println!(
                "{}",
                t!("config_cache_dir", path => config.cache_dir.display())
            );
            println!("{}", t!("config_keyword", keyword => config.crawl.keyword));
            println!(
                "{}",
                t!("config_page_size", size => config.crawl.page_size)
            );
            println!(
                "{}",
                t!("config_max_pages", pages => config.crawl.max_pages)
            );
        }
        cli::ConfigAction::Schema => {
            println!("{}", AppConfig::get_schema());
        }
        cli::ConfigAction::Dump => {
            println!("{}", config.to_toml());
        }
        cli::ConfigAction::Set { key, value } => {
            match key.as_str() {
                "keyword" => config.crawl.keyword = value.clone(),
                "page-size" | "page_size" => {
                    config.crawl.page_size = value
                        .parse()
                        .map_err(|_| t!("config_error_invalid_number", value => value))?;
                }
                "max-pages" | "max_pages" => {
                    config.crawl.max_pages = value
                        .parse()
                        .map_err(|_| t!("config_error_invalid_number", value => value))?;
                }
                _ => return Err(t!("config_error_unknown_key", key => key).into()),
            }
            config.save()?;
            println!("{}", t!("config_updated", key => key, value => value));
        }
    }
    Ok(())
}
