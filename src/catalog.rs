// catalog.rs — 壁纸目录数据模型、合并与持久化模块
// 目录文件是一个 JSON 数组，供外层展示界面只读消费

use rust_i18n::t;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// 壁纸条目的媒体类型
/// 爬虫只会产出 Image；Video / Html 条目来自用户手工添加
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallpaperKind {
    Image,
    Video,
    Html,
}

impl WallpaperKind {
    /// 爬虫是否可能产出该类型，合并时据此决定既有条目的保留策略
    pub fn is_crawlable(self) -> bool {
        matches!(self, WallpaperKind::Image)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WallpaperKind::Image => "image",
            WallpaperKind::Video => "video",
            WallpaperKind::Html => "html",
        }
    }
}

/// 单条壁纸目录条目
/// 字段名与目录文件格式保持一致（kind 序列化为 "type"）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallpaperItem {
    /// 展示标题；同一帖子含多张图时会追加序号，如 "标题 (2)"
    pub title: String,
    #[serde(rename = "type")]
    pub kind: WallpaperKind,
    /// 原始来源 URL，整个目录内的去重主键
    pub url: String,
    /// 分组标签，取来源的展示名称
    pub category: String,
    /// 预览图 URL（可带缩放参数），缺省时消费方回退到 url
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// 合并既有目录与本次抓取结果
///
/// 既有条目只保留爬虫不会产出的类型（目前是 video），其余整体被
/// 新抓取结果替换。保留集排在前、新条目在后，按 url 去重并保留
/// 先出现者，因此 url 碰撞时旧的保留条目优先，规则确定且可预期。
pub fn merge(existing: Vec<WallpaperItem>, fresh: Vec<WallpaperItem>) -> Vec<WallpaperItem> {
    let preserved = existing.into_iter().filter(|i| !i.kind.is_crawlable());

    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for item in preserved.chain(fresh) {
        if seen.insert(item.url.clone()) {
            merged.push(item);
        }
    }
    merged
}

/// 从目录文件读取条目列表
/// 文件不存在、读取失败或内容损坏时按空目录处理（打印警告后继续），
/// 绝不让一次损坏的落盘数据中断整个抓取流程
pub fn load(path: &Path) -> Vec<WallpaperItem> {
    if !path.exists() {
        return Vec::new();
    }

    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(items) => items,
            Err(_) => {
                eprintln!("{}", t!("catalog_corrupt", path => path.display()));
                Vec::new()
            }
        },
        Err(_) => {
            eprintln!("{}", t!("catalog_unreadable", path => path.display()));
            Vec::new()
        }
    }
}

/// 将条目列表整体写回目录文件（全量替换，而非增量更新）
pub fn save(path: &Path, items: &[WallpaperItem]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(items)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: WallpaperKind, url: &str) -> WallpaperItem {
        WallpaperItem {
            title: format!("item {url}"),
            kind,
            url: url.to_string(),
            category: "Test".to_string(),
            thumbnail: None,
        }
    }

    #[test]
    fn merge_dedups_by_url() {
        let fresh = vec![
            item(WallpaperKind::Image, "https://a/1.png"),
            item(WallpaperKind::Image, "https://a/1.png"),
            item(WallpaperKind::Image, "https://a/2.png"),
        ];
        let merged = merge(Vec::new(), fresh);

        let urls: Vec<&str> = merged.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, ["https://a/1.png", "https://a/2.png"]);
    }

    #[test]
    fn merge_preserves_videos_and_replaces_crawled_kinds() {
        let existing = vec![
            item(WallpaperKind::Video, "https://a/clip.mp4"),
            item(WallpaperKind::Image, "https://a/stale.png"),
        ];
        let fresh = vec![item(WallpaperKind::Image, "https://a/new.png")];

        let merged = merge(existing, fresh);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].kind, WallpaperKind::Video);
        assert_eq!(merged[0].url, "https://a/clip.mp4");
        // 爬虫可产出的旧条目被整体替换，不做增量保留
        assert!(merged.iter().all(|i| i.url != "https://a/stale.png"));
        assert_eq!(merged[1].url, "https://a/new.png");
    }

    #[test]
    fn merge_keeps_preserved_entry_on_url_collision() {
        let existing = vec![item(WallpaperKind::Video, "https://a/same")];
        let fresh = vec![item(WallpaperKind::Image, "https://a/same")];

        let merged = merge(existing, fresh);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].kind, WallpaperKind::Video);
    }

    #[test]
    fn merge_with_empty_fresh_is_idempotent() {
        let existing = vec![
            item(WallpaperKind::Video, "https://a/clip.mp4"),
            item(WallpaperKind::Video, "https://a/clip2.mp4"),
        ];
        let urls_before: Vec<String> = existing.iter().map(|i| i.url.clone()).collect();

        let merged = merge(existing, Vec::new());
        let remerged = merge(merged, Vec::new());

        let urls_after: Vec<String> = remerged.iter().map(|i| i.url.clone()).collect();
        assert_eq!(urls_before, urls_after);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("nope.json")).is_empty());
    }

    #[test]
    fn load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("online-wallpapers.json");
        fs::write(&path, "definitely { not json").unwrap();

        assert!(load(&path).is_empty());
    }

    #[test]
    fn save_then_load_round_trips_with_type_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("online-wallpapers.json");

        let items = vec![WallpaperItem {
            title: "神里绫华 (1)".to_string(),
            kind: WallpaperKind::Image,
            url: "https://a/1.png".to_string(),
            category: "Genshin Impact".to_string(),
            thumbnail: Some("https://a/1.png?x-oss-process=image/resize,m_fixed,h_300".to_string()),
        }];
        save(&path, &items).unwrap();

        // 落盘格式必须使用 "type" 字段名，旧的消费方依赖它
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"type\": \"image\""));

        let loaded = load(&path);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].kind, WallpaperKind::Image);
        assert_eq!(loaded[0].title, items[0].title);
    }
}
