// cli.rs — 命令行接口定义模块
// 使用 clap 的 derive 模式定义所有子命令和参数

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// 壁纸目录抓取与缓存工具
///
/// 从游戏社区搜索接口批量收集壁纸地址生成本地目录文件，
/// 供桌面壁纸程序的画廊界面只读消费；单张壁纸按需下载到受管缓存目录。
#[derive(Parser)]
#[command(name = "wallcrawl")]
#[command(version)]
#[command(about = "壁纸目录抓取与缓存工具 — 从游戏社区接口收集壁纸地址，按需下载到受管缓存目录")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 抓取所有注册源并更新本地壁纸目录
    ///
    /// 用法示例:
    ///   wallcrawl crawl
    Crawl,

    /// 列出本地壁纸目录的全部条目
    ///
    /// 用法示例:
    ///   wallcrawl list
    List,

    /// 下载单张壁纸到受管缓存目录
    ///
    /// 用法示例:
    ///   wallcrawl download https://example.com/a.png
    Download {
        /// 壁纸的原始来源 URL
        url: String,
    },

    /// 将本地文件收纳进受管缓存目录
    ///
    /// 用法示例:
    ///   wallcrawl cache ~/Downloads/some.png
    Cache {
        /// 文件的本地路径
        path: String,
    },

    /// 生成 shell 补全脚本（支持 bash, zsh, fish, elvish, powershell）
    ///
    /// 用法示例：
    ///   wallcrawl completions zsh > ~/.zsh/completions/_wallcrawl
    ///   wallcrawl completions fish > ~/.config/fish/completions/wallcrawl.fish
    Completions {
        /// 目标 shell 类型
        shell: Shell,
    },

    /// 配置管理操作
    ///
    /// 用法示例:
    ///   wallcrawl config show
    ///   wallcrawl config dump
    ///   wallcrawl config set keyword "壁纸"
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// 配置管理操作
#[derive(Subcommand)]
pub enum ConfigAction {
    /// 查看当前所有配置简报
    Show,
    /// 生成配置文件对应的 JSON Schema
    Schema,
    /// 以 TOML 格式打印当前完整配置内容
    Dump,
    /// 设置配置项的值 (支持: keyword, page-size, max-pages)
    Set {
        /// 要设置的键 (keyword, page-size, max-pages)
        key: String,
        /// 要设置的值
        value: String,
    },
}
