// config.rs — 配置管理模块
// 遵循 Unix 风格：优先从 ~/.config/wallcrawl/config.toml 读取配置

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shellexpand::tilde; // 用于展开 ~ 和环境变量
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 展开路径中的 ~ 和环境变量 ($HOME, $XDG_CONFIG_HOME 等)
fn expand_path(path_str: &str) -> PathBuf {
    let expanded = tilde(path_str).into_owned();
    PathBuf::from(expanded)
}

/// 映射 config.toml 文件内容的嵌套结构体
#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct ConfigFile {
    #[serde(default)]
    common: CommonConfig,
    #[serde(default)]
    crawl: CrawlSettings,
}

#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct CommonConfig {
    /// 受管数据根目录 (支持 ~、$HOME 等环境变量，相对路径则相对于 $HOME)
    /// 目录文件与下载缓存都放在它下面，不配置则默认 $HOME/Pictures/wallcrawl
    data_dir: Option<String>,
}

/// 抓取与下载参数
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CrawlSettings {
    /// 搜索关键词
    #[serde(default = "default_keyword")]
    pub keyword: String,
    /// 单页结果数
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// 单个源最多翻页数
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// 页间延时（毫秒）
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    /// 源间延时（毫秒）
    #[serde(default = "default_source_delay_ms")]
    pub source_delay_ms: u64,
    /// 搜索请求超时（秒）
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// 下载请求超时（秒），下载体量更大，要比搜索宽松
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            keyword: default_keyword(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            page_delay_ms: default_page_delay_ms(),
            source_delay_ms: default_source_delay_ms(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}

fn default_keyword() -> String {
    "壁纸".to_string()
}
fn default_page_size() -> u32 {
    20
}
fn default_max_pages() -> u32 {
    3
}
fn default_page_delay_ms() -> u64 {
    500
}
fn default_source_delay_ms() -> u64 {
    500
}
fn default_fetch_timeout_secs() -> u64 {
    10
}
fn default_download_timeout_secs() -> u64 {
    30
}

/// 应用全局配置项
pub struct AppConfig {
    /// 受管数据根目录
    pub data_dir: PathBuf,
    /// 目录文件路径（data_dir/online-wallpapers.json）
    pub catalog_path: PathBuf,
    /// 受管缓存目录（data_dir/cache）
    pub cache_dir: PathBuf,
    /// 配置文件所在路径
    pub config_path: PathBuf,
    /// 抓取与下载参数
    pub crawl: CrawlSettings,
}

impl AppConfig {
    /// 初始化配置
    pub fn new() -> Self {
        let home = env::var("HOME").expect("无法获取 $HOME 环境变量");
        let home_path = PathBuf::from(&home);
        let config_dir = home_path.join(".config").join("wallcrawl");
        let config_path = config_dir.join("config.toml");

        let config_file = Self::load_config_from_file(&config_path).unwrap_or_default();

        // 数据目录：
        // 1. 如果配置了路径：展开 ~ 和环境变量，然后检查是否为绝对路径
        // 2. 相对路径则相对于 $HOME
        // 3. 如果未配置：默认使用 $HOME/Pictures/wallcrawl
        let data_dir = if let Some(dir_str) = config_file.common.data_dir {
            let p = expand_path(&dir_str);
            if p.is_absolute() { p } else { home_path.join(p) }
        } else {
            home_path.join("Pictures").join("wallcrawl")
        };

        let catalog_path = data_dir.join("online-wallpapers.json");
        let cache_dir = data_dir.join("cache");

        Self {
            data_dir,
            catalog_path,
            cache_dir,
            config_path,
            crawl: config_file.crawl,
        }
    }

    /// 辅助函数：解析 TOML 配置文件
    fn load_config_from_file(path: &Path) -> Option<ConfigFile> {
        fs::read_to_string(path)
            .ok()
            .and_then(|content| toml::from_str(&content).ok())
    }

    /// 确保所有必要的目录都存在
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::create_dir_all(&self.data_dir)?;
        fs::create_dir_all(&self.cache_dir)
    }

    /// 将配置保存回文件
    pub fn save(&self) -> std::io::Result<()> {
        let config_file = ConfigFile {
            common: CommonConfig {
                data_dir: Some(self.data_dir.to_string_lossy().to_string()),
            },
            crawl: self.crawl.clone(),
        };

        let toml_str = toml::to_string_pretty(&config_file)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        fs::write(&self.config_path, toml_str)
    }

    /// 获取配置文件的 JSON Schema
    pub fn get_schema() -> String {
        let schema = schemars::schema_for!(ConfigFile);
        serde_json::to_string_pretty(&schema).unwrap()
    }

    /// 将当前配置转换为 TOML 字符串
    pub fn to_toml(&self) -> String {
        let config_file = ConfigFile {
            common: CommonConfig {
                data_dir: Some(self.data_dir.to_string_lossy().to_string()),
            },
            crawl: self.crawl.clone(),
        };

        let toml_str = toml::to_string_pretty(&config_file)
            .unwrap_or_else(|_| "# Error serializing config".to_string());

        // toml 库不支持带注释序列化，所以手动插入
        toml_str.replace(
            "[crawl]",
            "# 抓取参数\n# keyword 为搜索关键词，max_pages 为单个源的最大翻页数\n[crawl]",
        )
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.crawl.page_delay_ms)
    }

    pub fn source_delay(&self) -> Duration {
        Duration::from_millis(self.crawl.source_delay_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.crawl.fetch_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.crawl.download_timeout_secs)
    }
}
