use serde::{Deserialize, Serialize};

use crate::controller::RefreshOrdering;
use crate::highlight::Emphasis;
use crate::models::{DeleteFlags, PreviewMergePolicy};

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - api: 远端 Terse 服务地址与超时
/// - table: 表格刷新与删除行为
/// - preview: 社交媒体预览合并策略
/// - export: 导出文件目录
/// - display: 搜索结果高亮方式
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：TERSE，分隔符：__
    /// 示例：TERSE__API__BASE_URL=http://10.0.0.2:30000
    pub fn load() -> Self {
        Self::load_from(None)
    }

    /// Same as [`StaticConfig::load`] with an explicit file path.
    /// An explicitly given file must exist.
    pub fn load_from(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let (path, required) = match path {
            Some(p) => (p, true),
            None => ("config.toml", false),
        };

        let builder = Config::builder()
            // 1. 从 TOML 文件加载
            .add_source(File::with_name(path).required(required))
            // 2. 从环境变量覆盖，前缀 TERSE，分隔符 __
            .add_source(
                Environment::with_prefix("TERSE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 远端 API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// 表格行为配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default)]
    pub refresh_ordering: RefreshOrdering,
    #[serde(default = "default_true")]
    pub delete_terse: bool,
    #[serde(default = "default_true")]
    pub delete_visits: bool,
}

impl TableConfig {
    pub fn delete_flags(&self) -> DeleteFlags {
        DeleteFlags {
            terse: self.delete_terse,
            visits: self.delete_visits,
        }
    }
}

/// 预览合并配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default)]
    pub merge_policy: PreviewMergePolicy,
    #[serde(default = "default_true")]
    pub fetch_on_write: bool,
}

/// 导出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub dir: String,
}

/// 显示配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_emphasis")]
    pub emphasis: Emphasis,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_true")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_base_url() -> String {
    "http://127.0.0.1:30000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_export_dir() -> String {
    ".".to_string()
}

fn default_emphasis() -> Emphasis {
    Emphasis::Ansi
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            refresh_ordering: RefreshOrdering::default(),
            delete_terse: true,
            delete_visits: true,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            merge_policy: PreviewMergePolicy::default(),
            fetch_on_write: true,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            emphasis: default_emphasis(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_round_trips() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[api]"));
        assert!(sample.contains("base_url"));
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.api.base_url, default_base_url());
        assert_eq!(parsed.table.refresh_ordering, RefreshOrdering::LastIssuedWins);
        assert_eq!(parsed.display.emphasis, Emphasis::Ansi);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: StaticConfig = toml::from_str(
            r#"
            [table]
            refresh_ordering = "last_resolved_wins"
            delete_visits = false

            [preview]
            merge_policy = "all_or_nothing"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.table.refresh_ordering, RefreshOrdering::LastResolvedWins);
        assert_eq!(
            parsed.table.delete_flags(),
            DeleteFlags {
                terse: true,
                visits: false
            }
        );
        assert_eq!(parsed.preview.merge_policy, PreviewMergePolicy::AllOrNothing);
        assert!(parsed.preview.fetch_on_write);
        assert_eq!(parsed.api.timeout_secs, 10);
    }
}
