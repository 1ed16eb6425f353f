// crawler.rs — 抓取流水线编排模块
// 串行遍历所有注册源：一次一个源、一次一页，源间固定延时。
// 刻意不做并发扇出，限速是对第三方接口的承诺，不是性能取舍。

use crate::catalog;
use crate::config::AppConfig;
use crate::source::kuro;
use crate::source::miyoushe::{FetchOptions, MiyousheClient, SearchApi, fetch_source};
use crate::source::{SOURCES, Source};
use rust_i18n::t;
use std::time::Duration;

/// 单个源的抓取摘要
#[derive(Debug)]
pub struct SourceReport {
    pub name: String,
    /// 该源本次贡献的条目数（单次运行内去重后）
    pub count: usize,
    /// 翻页因错误提前终止时的描述
    pub error: Option<String>,
}

/// 一次完整抓取的结果报告
/// 显式返回统计结果，调用方不需要依赖进程退出码判断成败
#[derive(Debug)]
pub struct CrawlReport {
    /// 合并去重后持久化的条目总数
    pub total: usize,
    pub sources: Vec<SourceReport>,
}

/// 串行抓取全部在线源并追加静态补充源，返回条目与各源摘要
pub async fn collect(
    api: &dyn SearchApi,
    sources: &[Source],
    options: &FetchOptions,
    source_delay: Duration,
) -> (Vec<catalog::WallpaperItem>, Vec<SourceReport>) {
    let mut all = Vec::new();
    let mut reports = Vec::new();

    for source in sources {
        let outcome = fetch_source(api, source, options).await;
        reports.push(SourceReport {
            name: source.name.to_string(),
            count: outcome.items.len(),
            error: outcome.error,
        });
        all.extend(outcome.items);

        tokio::time::sleep(source_delay).await;
    }

    // 无法在线查询的源以静态条目补充
    let supplement = kuro::builtin_items();
    reports.push(SourceReport {
        name: kuro::NAME.to_string(),
        count: supplement.len(),
        error: None,
    });
    all.extend(supplement);

    (all, reports)
}

/// 执行一次完整的抓取：在线收集、与既有目录合并、整体写回
///
/// 单个源整体失败只会让它贡献零条，不会中断其余源；
/// 只有目录文件写回失败才会向上抛错。
pub async fn run(config: &AppConfig) -> Result<CrawlReport, Box<dyn std::error::Error>> {
    let api = MiyousheClient::new(
        config.crawl.keyword.clone(),
        config.crawl.page_size,
        config.fetch_timeout(),
    )?;
    let options = FetchOptions {
        max_pages: config.crawl.max_pages,
        page_delay: config.page_delay(),
    };

    let (fresh, sources) = collect(&api, SOURCES, &options, config.source_delay()).await;

    let existing = catalog::load(&config.catalog_path);
    let merged = catalog::merge(existing, fresh);
    catalog::save(&config.catalog_path, &merged)?;

    println!(
        "{}",
        t!("crawl_saved", count => merged.len(), path => config.catalog_path.display())
    );

    Ok(CrawlReport {
        total: merged.len(),
        sources,
    })
}
