//! cinerec - 电影智能推荐系统 CLI
//!
//! 入口：初始化日志与配置，打开 SQLite 电影库，进入菜单循环。
//! 推荐模型在进入推荐功能时于后台线程构建，构建期间界面保持响应。

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cinerec::config::load_config;
use cinerec::engine::{Candidate, ModelConfig, Selection};
use cinerec::service::{Outcome, Recommender};
use cinerec::store::{import_from_csv, MovieStore, SqliteStore};
use cinerec::Recommendation;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 日志：默认 info，可通过 RUST_LOG 覆盖
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with(fmt::layer())
        .init();

    let config = load_config(None).context("Failed to load config")?;
    let store = Arc::new(
        SqliteStore::open(&config.store.db_path).context("Failed to open movie database")?,
    );
    let recommender = Arc::new(Recommender::new(ModelConfig {
        max_features: config.model.max_features,
        category_weight: config.model.category_weight,
    }));
    let top_n = config.model.default_top_n;

    let stdin = io::stdin();
    loop {
        println!("\n--- 电影智能推荐系统 ---");
        println!("  1. 初始化/重置数据库");
        println!("  2. 从 CSV 导入电影");
        println!("  3. 浏览电影库");
        println!("  4. 相似电影推荐");
        println!("  q. 退出");
        match prompt(&stdin, "请选择: ")?.as_str() {
            "1" => reset_database(&store, &stdin)?,
            "2" => {
                if let Err(e) = run_import(&store, &stdin) {
                    println!("导入失败: {e}");
                }
            }
            "3" => browse(&store, &stdin)?,
            "4" => run_recommender(&recommender, store.clone(), &stdin, top_n).await?,
            "q" | "Q" => break,
            _ => println!("无效的选项，请重新输入。"),
        }
    }
    Ok(())
}

fn prompt(stdin: &io::Stdin, message: &str) -> anyhow::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn reset_database(store: &SqliteStore, stdin: &io::Stdin) -> anyhow::Result<()> {
    let confirm = prompt(stdin, "此操作将清空电影库中的全部数据，确认请输入 y: ")?;
    if !confirm.eq_ignore_ascii_case("y") {
        println!("已取消。");
        return Ok(());
    }
    store.reset()?;
    println!("旧数据已清空，movies 表已重新就绪。");
    Ok(())
}

fn run_import(store: &SqliteStore, stdin: &io::Stdin) -> anyhow::Result<()> {
    let path = prompt(stdin, "请输入 CSV 文件路径: ")?;
    if path.is_empty() {
        return Ok(());
    }
    let mut report = |done: usize, total: usize| {
        if done % 100 == 0 || done == total {
            println!("  已处理 {done}/{total} 行");
        }
    };
    let summary = import_from_csv(store, &path, Some(&mut report))?;
    println!(
        "导入完成：共 {} 行，新增 {} 部，跳过 {} 行。",
        summary.total_rows, summary.inserted, summary.skipped
    );
    Ok(())
}

fn browse(store: &SqliteStore, stdin: &io::Stdin) -> anyhow::Result<()> {
    let page_size = 15;
    let mut page = 1;
    loop {
        let (movies, total_pages) = store.fetch_page(page, page_size)?;
        if movies.is_empty() {
            println!("电影库是空的，请先导入数据。");
            return Ok(());
        }
        println!("\n--- 第 {page}/{total_pages} 页 ---");
        for m in &movies {
            println!("  [{}] {}  评分 {:.1}  {}", m.id, m.title, m.rating, m.category);
        }
        match prompt(stdin, "n 下一页 / p 上一页 / q 返回: ")?.as_str() {
            "n" => {
                if page < total_pages {
                    page += 1;
                }
            }
            "p" => page = page.saturating_sub(1).max(1),
            "q" => return Ok(()),
            _ => {}
        }
    }
}

async fn run_recommender(
    recommender: &Arc<Recommender>,
    store: Arc<dyn MovieStore>,
    stdin: &io::Stdin,
    top_n: usize,
) -> anyhow::Result<()> {
    println!("正在构建推荐模型...");
    match recommender.rebuild_in_background(store).await {
        Ok(Ok(stats)) => println!("模型构建完毕，共 {} 部电影。", stats.movies),
        Ok(Err(e)) => {
            println!("无法启动推荐服务: {e}");
            return Ok(());
        }
        Err(_) => {
            println!("构建任务异常退出。");
            return Ok(());
        }
    }

    loop {
        let query = prompt(stdin, "\n请输入一部你喜欢的电影名称 (输入 'q' 退出): ")?;
        if query.eq_ignore_ascii_case("q") {
            break;
        }
        if query.is_empty() {
            continue;
        }

        match recommender.get_recommendations(&query, top_n) {
            Ok(Outcome::Ranked(recs)) => print_recommendations(&query, &recs),
            Ok(Outcome::NeedsChoice(candidates)) => {
                disambiguate(recommender, stdin, &query, candidates, top_n)?
            }
            Ok(Outcome::Cancelled) => {}
            Err(e) => println!("{e}"),
        }
    }
    Ok(())
}

/// 消歧提示循环：越界序号重新提示，直到有效选择或取消
fn disambiguate(
    recommender: &Recommender,
    stdin: &io::Stdin,
    query: &str,
    mut candidates: Vec<Candidate>,
    top_n: usize,
) -> anyhow::Result<()> {
    println!("找到多部包含 '{query}' 的电影，请选择一部：");
    for c in &candidates {
        println!("  {}. {}", c.display_index, c.title);
    }
    loop {
        let line = prompt(
            stdin,
            &format!("请输入序号 [1-{}] (或输入 'q' 取消): ", candidates.len()),
        )?;
        let selection = if line.eq_ignore_ascii_case("q") {
            Selection::Cancel
        } else if let Ok(i) = line.parse::<usize>() {
            Selection::Index(i)
        } else {
            println!("请输入一个有效的数字。");
            continue;
        };
        match recommender.select_candidate(&candidates, selection, top_n)? {
            Outcome::Ranked(recs) => {
                print_recommendations(query, &recs);
                return Ok(());
            }
            Outcome::Cancelled => {
                println!("操作已取消。");
                return Ok(());
            }
            Outcome::NeedsChoice(c) => {
                candidates = c;
                println!("无效的序号，请重新输入。");
            }
        }
    }
}

fn print_recommendations(query: &str, recs: &[Recommendation]) {
    if recs.is_empty() {
        println!("没有可推荐的其他电影。");
        return;
    }
    println!("\n为你推荐与《{query}》相似的电影：");
    for (i, r) in recs.iter().enumerate() {
        println!(
            "  {}. {}  评分 {:.1}  [{}]  相似度 {:.3}",
            i + 1,
            r.title,
            r.rating,
            r.category,
            r.score
        );
    }
}
