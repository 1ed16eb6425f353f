// miyoushe.rs — 米游社搜索接口异步客户端与翻页抓取逻辑
// 负责按游标翻页搜索帖子，把帖子里的图片地址整理成目录条目

use super::{Source, USER_AGENT};
use crate::catalog::{WallpaperItem, WallpaperKind};
use async_trait::async_trait;
use rust_i18n::t;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

/// 搜索接口必须携带的 Referer，缺失时部分接口返回拒绝
const REFERER: &str = "https://www.miyoushe.com/";

/// 缩略图的固定缩放参数，直接追加在原图 URL 之后
const THUMBNAIL_SUFFIX: &str = "?x-oss-process=image/resize,m_fixed,h_300";

/// 接口层面的失败（传输错误、非 2xx 状态、业务码非 0）
pub type ApiError = Box<dyn std::error::Error + Send + Sync>;

/// 搜索接口响应的顶层结构
#[derive(Deserialize, Debug)]
struct SearchResponse {
    /// 业务状态码，0 表示成功
    retcode: i32,
    #[serde(default)]
    message: String,
    data: Option<SearchData>,
}

#[derive(Deserialize, Debug, Default)]
struct SearchData {
    #[serde(default)]
    posts: Vec<PostEntry>,
    /// 下一页游标；缺失时无法继续翻页，视同末页
    #[serde(default)]
    last_id: Option<String>,
    #[serde(default)]
    is_last: bool,
}

/// 搜索结果中的单条记录
///
/// 接口在不同版本下可能返回 { post: {...}, user: {...} } 的包装结构，
/// 也可能直接返回扁平结构，因此所有字段都设为可选，由 normalize 统一。
#[derive(Deserialize, Debug, Default)]
pub struct PostEntry {
    #[serde(default)]
    pub post: Option<PostBody>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

/// 记录的有效载荷：帖子标题与图片地址列表
#[derive(Deserialize, Debug, Default)]
pub struct PostBody {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// 归一化一条搜索记录：存在内层 post 则取内层，否则按扁平结构处理
pub fn normalize(entry: PostEntry) -> PostBody {
    match entry.post {
        Some(body) => body,
        None => PostBody {
            subject: entry.subject.unwrap_or_default(),
            images: entry.images.unwrap_or_default(),
        },
    }
}

/// 归一化后的一页搜索结果
#[derive(Debug, Default)]
pub struct SearchPage {
    pub posts: Vec<PostEntry>,
    pub last_id: Option<String>,
    pub is_last: bool,
}

/// 上游搜索接口的抽象：按游标取一页结果
/// 抽出 trait 是为了让翻页逻辑可以脱离真实网络做测试
#[async_trait]
pub trait SearchApi {
    async fn search_page(&self, gid: u32, last_id: &str) -> Result<SearchPage, ApiError>;
}

/// 米游社搜索接口异步客户端
pub struct MiyousheClient {
    /// HTTP 客户端（内部有连接池，应复用），请求超时在构造时固定
    client: reqwest::Client,
    base_url: String,
    /// 固定搜索关键词
    keyword: String,
    /// 单页结果数
    page_size: u32,
}

impl MiyousheClient {
    pub fn new(keyword: String, page_size: u32, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: String::from("https://bbs-api.mihoyo.com"),
            keyword,
            page_size,
        })
    }
}

#[async_trait]
impl SearchApi for MiyousheClient {
    async fn search_page(&self, gid: u32, last_id: &str) -> Result<SearchPage, ApiError> {
        let url = format!("{}/post/wapi/searchPosts", self.base_url);
        let gids = gid.to_string();
        let size = self.page_size.to_string();

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Referer", REFERER)
            .query(&[
                ("keyword", self.keyword.as_str()),
                ("gids", gids.as_str()),
                ("size", size.as_str()),
                ("last_id", last_id),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: SearchResponse = response.json().await?;
        if body.retcode != 0 {
            return Err(format!("retcode {}: {}", body.retcode, body.message).into());
        }

        let data = body.data.unwrap_or_default();
        Ok(SearchPage {
            posts: data.posts,
            last_id: data.last_id,
            is_last: data.is_last,
        })
    }
}

/// 翻页抓取的运行参数，来自配置文件
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// 单个源最多翻页数
    pub max_pages: u32,
    /// 页间固定延时，对第三方接口的礼貌性限速
    pub page_delay: Duration,
}

/// 单个源的抓取结果
#[derive(Debug, Default)]
pub struct SourceOutcome {
    pub items: Vec<WallpaperItem>,
    /// 翻页因错误提前终止时的描述；正常耗尽则为 None
    pub error: Option<String>,
}

/// 翻页抓取单个源的全部壁纸条目
///
/// 任何失败（超时、非 2xx、业务码非 0）都只终止当前源的翻页，
/// 已累积的条目原样返回，绝不向调用方抛错；跨源去重由合并阶段负责，
/// 这里只做单次运行内的 URL 去重。
pub async fn fetch_source(
    api: &dyn SearchApi,
    source: &Source,
    options: &FetchOptions,
) -> SourceOutcome {
    let mut outcome = SourceOutcome::default();
    let mut seen = HashSet::new();
    let mut last_id = String::from("0");

    println!("{}", t!("crawl_source_start", name => source.name));

    for page in 0..options.max_pages {
        let result = match api.search_page(source.gid, &last_id).await {
            Ok(p) => p,
            Err(e) => {
                let reason = e.to_string();
                eprintln!("{}", t!("crawl_source_error", name => source.name, reason => reason));
                outcome.error = Some(reason);
                break;
            }
        };

        // 空页即自然耗尽
        if result.posts.is_empty() {
            println!("{}", t!("crawl_source_exhausted", name => source.name));
            break;
        }

        let post_count = result.posts.len();
        for entry in result.posts {
            let body = normalize(entry);
            let numbered = body.images.len() > 1;

            for (index, image_url) in body.images.into_iter().enumerate() {
                if !seen.insert(image_url.clone()) {
                    continue;
                }

                // 同一帖子出多张图时按原始顺序从 1 编号
                let title = if numbered {
                    format!("{} ({})", body.subject, index + 1)
                } else {
                    body.subject.clone()
                };

                outcome.items.push(WallpaperItem {
                    title,
                    kind: WallpaperKind::Image,
                    url: image_url.clone(),
                    category: source.category.to_string(),
                    thumbnail: Some(format!("{image_url}{THUMBNAIL_SUFFIX}")),
                });
            }
        }

        println!(
            "{}",
            t!("crawl_page_fetched", count => post_count, page => page, name => source.name)
        );

        // 服务端声明末页、或未返回可用游标时停止，否则推进游标
        match result.last_id {
            Some(next) if !next.is_empty() && !result.is_last => last_id = next,
            _ => break,
        }

        tokio::time::sleep(options.page_delay).await;
    }

    println!(
        "{}",
        t!("crawl_source_total", name => source.name, count => outcome.items.len())
    );
    outcome
}
