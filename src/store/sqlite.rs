//! SQLite 电影库（rusqlite）
//!
//! movies 表：id 自增主键，title 唯一。标题重复的插入以 INSERT OR IGNORE
//! 跳过，导入层据此统计跳过数。

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};
use tracing::info;

use super::{MovieRecord, MovieStore};
use crate::error::RecError;

/// movies 表的 SQLite 实现。Connection 不是 Sync，用 Mutex 包装
/// 以便与后台构建任务共享。
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// 打开（或创建）数据库文件并确保 movies 表存在
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecError> {
        let conn = Connection::open(path.as_ref())?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_table()?;
        info!(path = %path.as_ref().display(), "电影库已打开");
        Ok(store)
    }

    /// 内存数据库（测试用）
    pub fn open_in_memory() -> Result<Self, RecError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_table()?;
        Ok(store)
    }

    fn create_table(&self) -> Result<(), RecError> {
        self.conn.lock().unwrap().execute(
            "CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL UNIQUE,
                rating REAL NOT NULL,
                category TEXT NOT NULL,
                comments TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// 清空电影库：删除所有记录并重置自增计数，id 从 1 重新开始。
    /// 效果等同删掉数据库文件后重建 movies 表。
    pub fn reset(&self) -> Result<(), RecError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM movies", [])?;
        // sqlite_sequence 在首次 AUTOINCREMENT 插入前不存在，需先探测
        let has_sequence: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'sqlite_sequence'",
            [],
            |row| row.get(0),
        )?;
        if has_sequence > 0 {
            conn.execute("DELETE FROM sqlite_sequence WHERE name = 'movies'", [])?;
        }
        Ok(())
    }

    /// 插入一部电影；标题重复时忽略并返回 false
    pub fn insert_movie(
        &self,
        title: &str,
        rating: f64,
        category: &str,
        comments: &str,
    ) -> Result<bool, RecError> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute(
            "INSERT OR IGNORE INTO movies (title, rating, category, comments)
             VALUES (?1, ?2, ?3, ?4)",
            params![title, rating, category, comments],
        )?;
        Ok(n > 0)
    }

    pub fn count(&self) -> Result<usize, RecError> {
        let conn = self.conn.lock().unwrap();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// 分页读取（浏览用），页码从 1 开始；返回 (本页记录, 总页数)
    pub fn fetch_page(
        &self,
        page: usize,
        page_size: usize,
    ) -> Result<(Vec<MovieRecord>, usize), RecError> {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total = self.count()?;
        let total_pages = (total + page_size - 1) / page_size;
        let offset = (page - 1) * page_size;

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, title, rating, category, comments FROM movies
             ORDER BY id LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt
            .query_map(params![page_size as i64, offset as i64], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok((rows, total_pages))
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<MovieRecord> {
    Ok(MovieRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        rating: row.get(2)?,
        category: row.get(3)?,
        comments: row.get(4)?,
    })
}

impl MovieStore for SqliteStore {
    /// 按 id 升序取回全量记录；行序即模型的矩阵行序
    fn fetch_all(&self) -> Result<Vec<MovieRecord>, RecError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT id, title, rating, category, comments FROM movies ORDER BY id")?;
        let rows = stmt
            .query_map([], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
