//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `CINEREC__*` 覆盖
//! （双下划线表示嵌套，如 `CINEREC__MODEL__MAX_FEATURES=2000`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub model: ModelSection,
}

/// [store] 段：SQLite 数据库路径
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("movies.db")
}

/// [model] 段：词表上限、类别权重、默认推荐数
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSection {
    /// 词表上限，超出时按词频截断（并列按词典序，保证确定性）
    #[serde(default = "default_max_features")]
    pub max_features: usize,
    /// 类别相对简介的权重（内容串中类别的重复次数）
    #[serde(default = "default_category_weight")]
    pub category_weight: usize,
    /// 每次推荐返回的电影数
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            max_features: default_max_features(),
            category_weight: default_category_weight(),
            default_top_n: default_top_n(),
        }
    }
}

fn default_max_features() -> usize {
    5000
}

fn default_category_weight() -> usize {
    3
}

fn default_top_n() -> usize {
    5
}

/// 从 config 目录加载配置，环境变量 CINEREC__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 CINEREC__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("CINEREC")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
