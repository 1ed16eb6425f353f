// kuro.rs — 库洛游戏（鸣潮）静态补充源
// 官方接口对程序化访问封锁严格，无法在线搜索，改为内置一组手工挑选的条目。
// 后续再有无法在线查询的源，在此模块追加即可，不需要改动翻页抓取逻辑。

use crate::catalog::{WallpaperItem, WallpaperKind};

/// 补充源在报告与目录里使用的展示名
pub const NAME: &str = "Wuthering Waves";

/// 返回鸣潮的内置壁纸条目
pub fn builtin_items() -> Vec<WallpaperItem> {
    vec![
        WallpaperItem {
            title: "Wuthering Waves - Jinhsi".to_string(),
            kind: WallpaperKind::Image,
            url: "https://prod-all-slug-api.kurobbs.com/backend/cdn/image/2024/06/25/e4e082f0-32d7-4c07-88d4-539655f448c2.png".to_string(),
            category: NAME.to_string(),
            thumbnail: Some("https://prod-all-slug-api.kurobbs.com/backend/cdn/image/2024/06/25/e4e082f0-32d7-4c07-88d4-539655f448c2.png?x-oss-process=image/resize,h_300".to_string()),
        },
        WallpaperItem {
            title: "Wuthering Waves - Changli".to_string(),
            kind: WallpaperKind::Image,
            url: "https://prod-all-slug-api.kurobbs.com/backend/cdn/image/2024/07/16/aaa6612b-3e5e-4458-9411-4643ba30284e.jpg".to_string(),
            category: NAME.to_string(),
            thumbnail: Some("https://prod-all-slug-api.kurobbs.com/backend/cdn/image/2024/07/16/aaa6612b-3e5e-4458-9411-4643ba30284e.jpg?x-oss-process=image/resize,h_300".to_string()),
        },
    ]
}
