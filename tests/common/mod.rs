//! Common test utilities for asset-dl integration tests

use asset_dl::Config;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use tempfile::TempDir;

/// Write a SQLite index with table `a (n, h, m)` into `dir/meta`
pub async fn write_index(dir: &TempDir, rows: &[(&str, &str, &str)]) -> PathBuf {
    let path = dir.path().join("meta");
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
        .unwrap()
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await.unwrap();

    sqlx::query("CREATE TABLE a (n TEXT, h TEXT, m TEXT)")
        .execute(&pool)
        .await
        .unwrap();
    for (n, h, m) in rows {
        sqlx::query("INSERT INTO a (n, h, m) VALUES (?, ?, ?)")
            .bind(*n)
            .bind(*h)
            .bind(*m)
            .execute(&pool)
            .await
            .unwrap();
    }
    pool.close().await;
    path
}

/// Validated config pointing at `base_url`, saving under `dir/dat`
pub fn create_test_config(dir: &TempDir, index_path: PathBuf, base_url: &str) -> Config {
    let mut config = Config {
        save_root: dir.path().join("dat"),
        index_path,
        base_url: base_url.to_string(),
        timeout_minutes: 1,
        ..Config::default()
    };
    config.validate().unwrap();
    config
}

/// LZ4 frame-encode `data`
pub fn lz4_frame(data: &[u8]) -> Vec<u8> {
    let mut encoder = lz4_flex::frame::FrameEncoder::new(Vec::new());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}
