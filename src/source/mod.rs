// source/mod.rs — 上游壁纸源模块入口
pub mod kuro;
pub mod miyoushe;

/// 所有对外 HTTP 请求统一使用的 User-Agent
/// 部分上游接口对默认的程序化 UA 直接拒绝访问
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 一个可通过搜索接口在线查询的上游社区源
#[derive(Debug, Clone)]
pub struct Source {
    /// 展示名称
    pub name: &'static str,
    /// 目录条目的分组标签
    pub category: &'static str,
    /// 搜索接口的游戏社区编号
    pub gid: u32,
}

/// 内置源注册表
/// gid 对应米游社分区编号：2 = 原神，6 = 崩坏：星穹铁道，8 = 绝区零
pub const SOURCES: &[Source] = &[
    Source {
        name: "Genshin Impact",
        category: "Genshin Impact",
        gid: 2,
    },
    Source {
        name: "Honkai: Star Rail",
        category: "Honkai: Star Rail",
        gid: 6,
    },
    Source {
        name: "Zenless Zone Zero",
        category: "Zenless Zone Zero",
        gid: 8,
    },
];
