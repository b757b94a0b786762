//! 配置模块，负责加载JSON配置文件

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::value::QuoteEscaping;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "filter_sql.json";

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("配置文件不存在: {0}")]
    NotFound(String),

    #[error("无法读取配置文件 {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("无法解析JSON配置文件 {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 编译器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// 过滤条件的最大嵌套深度
    pub max_depth: usize,
    /// 字符串中单引号的处理方式
    pub quote_escaping: QuoteEscaping,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            quote_escaping: QuoteEscaping::Verbatim,
        }
    }
}

impl CompilerConfig {
    /// 从JSON文件加载配置, 缺少的字段使用默认值
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let display = path_ref.display().to_string();

        // 检查文件是否存在
        if !path_ref.exists() {
            return Err(ConfigError::NotFound(display));
        }

        let content = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_valid_json_config() {
        let temp_file = "test_filter_sql_config.json";
        let mut file = fs::File::create(temp_file).unwrap();
        writeln!(file, r#"{{ "max_depth": 4, "quote_escaping": "doubled" }}"#).unwrap();

        let config = CompilerConfig::from_json_file(temp_file).unwrap();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.quote_escaping, QuoteEscaping::Doubled);

        fs::remove_file(temp_file).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_file = "test_filter_sql_partial.json";
        let mut file = fs::File::create(temp_file).unwrap();
        writeln!(file, r#"{{ "max_depth": 8 }}"#).unwrap();

        let config = CompilerConfig::from_json_file(temp_file).unwrap();
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.quote_escaping, QuoteEscaping::Verbatim);

        fs::remove_file(temp_file).ok();
    }

    #[test]
    fn test_invalid_json_config() {
        let temp_file = "test_filter_sql_invalid.json";
        let mut file = fs::File::create(temp_file).unwrap();
        writeln!(file, "invalid json").unwrap();

        let result = CompilerConfig::from_json_file(temp_file);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));

        fs::remove_file(temp_file).ok();
    }

    #[test]
    fn test_missing_file() {
        let result = CompilerConfig::from_json_file("non_existent_file.json");
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_default_config() {
        let config = CompilerConfig::default();
        assert_eq!(config.max_depth, 32);
        assert_eq!(config.quote_escaping, QuoteEscaping::Verbatim);
    }
}
