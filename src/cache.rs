// cache.rs — 受管缓存目录模块
// 负责两件事：把外部本地文件收纳进受管目录（尽力而为），
// 以及按需下载远程资源落盘（失败必须如实上抛）。
// 文件名统一加毫秒时间戳前缀，同名文件互不覆盖，因此无需加锁。

use crate::source::USER_AGENT;
use rust_i18n::t;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// 按需下载的失败原因
/// 下载由用户显式触发，只有一个等待结果的调用方，
/// 失败必须带着可区分的原因上抛，而不是像批量抓取那样就地吞掉
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// 受管缓存目录
pub struct ResourceCache {
    dir: PathBuf,
    /// HTTP 客户端（内部有连接池，应复用），下载超时在构造时固定
    client: reqwest::Client,
}

impl ResourceCache {
    /// 创建缓存目录句柄，目录不存在时先建好
    pub fn new(dir: PathBuf, download_timeout: Duration) -> Result<Self, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(&dir)?;
        let client = reqwest::Client::builder().timeout(download_timeout).build()?;
        Ok(Self { dir, client })
    }

    /// 将外部文件收纳进受管目录，返回受管路径
    ///
    /// 尽力而为：源文件不存在或复制失败时原样返回传入路径，
    /// 调用方传来的路径本身可能就是可用的引用；
    /// 已位于受管目录内的路径直接返回，不重复复制。
    pub fn cache(&self, source: &Path) -> PathBuf {
        if source.starts_with(&self.dir) {
            return source.to_path_buf();
        }
        if !source.exists() {
            return source.to_path_buf();
        }

        let basename = source
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resource");
        let dest = self.dir.join(managed_filename(now_millis(), basename));

        match std::fs::copy(source, &dest) {
            Ok(_) => dest,
            Err(e) => {
                eprintln!("{}", t!("cache_copy_failed", reason => e));
                source.to_path_buf()
            }
        }
    }

    /// 下载 url 指向的资源到受管目录，返回落盘路径
    pub async fn download(&self, url: &str) -> Result<PathBuf, DownloadError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status(status));
        }

        let bytes = response.bytes().await?;
        let dest = self.dir.join(managed_filename(now_millis(), url_basename(url)));

        let mut file = File::create(&dest).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;

        Ok(dest)
    }
}

/// 受管文件名：毫秒时间戳 + 下划线 + 净化后的原文件名
/// 时间戳前缀保证同名文件落盘时互不覆盖
fn managed_filename(millis: u128, basename: &str) -> String {
    let safe = sanitize_basename(basename);
    if safe.is_empty() {
        format!("{millis}_download.jpg")
    } else {
        format!("{millis}_{safe}")
    }
}

/// 将 [A-Za-z0-9.-] 之外的字符全部替换为下划线
fn sanitize_basename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// 从 URL 提取文件名：去掉查询串与锚点后取最后一段路径
fn url_basename(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn test_cache(dir: &Path) -> ResourceCache {
        ResourceCache::new(dir.to_path_buf(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn sanitize_replaces_everything_outside_allowlist() {
        assert_eq!(
            sanitize_basename("my wallpaper (1).png"),
            "my_wallpaper__1_.png"
        );
        assert_eq!(sanitize_basename("壁纸.jpg"), "__.jpg");
        assert_eq!(sanitize_basename("ok-file.2.png"), "ok-file.2.png");
    }

    #[test]
    fn managed_filenames_differ_across_timestamps() {
        let a = managed_filename(1_700_000_000_000, "wall.png");
        let b = managed_filename(1_700_000_000_001, "wall.png");
        assert_ne!(a, b);
        assert_eq!(a, "1700000000000_wall.png");
    }

    #[test]
    fn managed_filename_falls_back_when_sanitized_away() {
        assert_eq!(managed_filename(42, ""), "42_download.jpg");
    }

    #[test]
    fn url_basename_strips_query_and_fragment() {
        assert_eq!(
            url_basename("https://cdn/img/a.png?x-oss-process=image/resize,h_300"),
            "a.png"
        );
        assert_eq!(url_basename("https://cdn/img/b.jpg#top"), "b.jpg");
    }

    #[test]
    fn cache_returns_missing_path_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let cache = test_cache(dir.path());

        let missing = Path::new("/no/such/file.png");
        assert_eq!(cache.cache(missing), missing);
    }

    #[test]
    fn cache_is_idempotent_for_managed_paths() {
        let dir = tempfile::tempdir().unwrap();
        let cache = test_cache(dir.path());

        let inside = dir.path().join("123_already.png");
        fs::write(&inside, b"x").unwrap();

        assert_eq!(cache.cache(&inside), inside);
        // 没有复制出第二份
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn cache_copies_external_file_into_managed_dir() {
        let cache_dir = tempfile::tempdir().unwrap();
        let src_dir = tempfile::tempdir().unwrap();
        let cache = test_cache(cache_dir.path());

        let source = src_dir.path().join("my wallpaper.png");
        fs::write(&source, b"pixels").unwrap();

        let managed = cache.cache(&source);

        assert!(managed.starts_with(cache_dir.path()));
        assert!(
            managed
                .file_name()
                .unwrap()
                .to_str()
                .unwrap()
                .ends_with("_my_wallpaper.png")
        );
        assert_eq!(fs::read(&managed).unwrap(), b"pixels");
        // 原文件保持不动
        assert!(source.exists());
    }

    /// 起一个只响应一次的本地 HTTP 端点
    async fn one_shot_server(response: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf).await;
                let _ = stream.write_all(response).await;
                let _ = stream.shutdown().await;
            }
        });
        format!("http://{addr}/wall%20paper.png")
    }

    #[tokio::test]
    async fn download_surfaces_http_failure() {
        let url = one_shot_server(
            b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;

        let dir = tempfile::tempdir().unwrap();
        let cache = test_cache(dir.path());

        match cache.download(&url).await {
            Err(DownloadError::Status(status)) => assert_eq!(status.as_u16(), 404),
            other => panic!("expected status error, got {other:?}"),
        }
        // 失败时不留半成品文件
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn download_writes_body_under_managed_dir() {
        let url = one_shot_server(
            b"HTTP/1.1 200 OK\r\ncontent-length: 6\r\nconnection: close\r\n\r\npixels",
        )
        .await;

        let dir = tempfile::tempdir().unwrap();
        let cache = test_cache(dir.path());

        let path = cache.download(&url).await.unwrap();

        assert!(path.starts_with(dir.path()));
        assert!(
            path.file_name()
                .unwrap()
                .to_str()
                .unwrap()
                .ends_with("_wall_20paper.png")
        );
        assert_eq!(fs::read(&path).unwrap(), b"pixels");
    }
}
