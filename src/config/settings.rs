// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含爬取目标、重试、导出和数据集查询等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 爬取配置
    pub crawl: CrawlSettings,
    /// 重试配置
    pub retry: RetrySettings,
    /// 导出配置
    pub export: ExportSettings,
    /// 数据集查询配置
    pub dashboard: DashboardSettings,
}

/// 爬取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSettings {
    /// 搜索页URL
    pub base_url: String,
    /// 按顺序处理的搜索关键词
    pub keywords: Vec<String>,
    /// 搜索输入框选择器
    pub search_input_selector: String,
    /// 课程详情页路径前缀
    pub program_path_prefix: String,
    /// 大学页路径前缀
    pub university_path_prefix: String,
    /// 搜索结果就绪选择器（可选）
    pub results_ready_selector: Option<String>,
    /// 详情页就绪选择器（可选）
    pub detail_ready_selector: Option<String>,
    /// 详情页并发抓取上限
    pub concurrency: usize,
    /// 单次导航超时（秒）
    pub request_timeout_secs: u64,
    /// 就绪轮询超时（毫秒）
    pub ready_timeout_ms: u64,
    /// 就绪轮询初始间隔（毫秒）
    pub ready_poll_initial_ms: u64,
    /// 就绪轮询最大间隔（毫秒）
    pub ready_poll_max_ms: u64,
    /// 每次加载详情页前的礼貌等待（毫秒）
    pub politeness_delay_ms: u64,
    /// 远程 Chrome 调试地址，未设置时本地启动
    pub remote_debugging_url: Option<String>,
}

impl CrawlSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }
}

/// 重试配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    /// 最大重试次数
    pub max_retries: u32,
    /// 初始退避时间（毫秒）
    pub initial_backoff_ms: u64,
    /// 最大退避时间（毫秒）
    pub max_backoff_ms: u64,
    /// 退避乘数
    pub backoff_multiplier: f64,
    /// 抖动因子 (0.0-1.0)
    pub jitter_factor: f64,
}

/// 导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ExportSettings {
    /// 输出文件路径
    pub output_path: String,
    /// 每个关键词完成后是否写出检查点
    pub checkpoint_each_keyword: bool,
}

/// 数据集查询列名配置
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSettings {
    pub university_column: String,
    pub program_name_column: String,
    pub program_type_column: String,
    pub campus_column: String,
    pub fee_column: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 加载顺序：默认值 → `config/default.toml` → `config/{APP_ENVIRONMENT}.toml`
    /// → 以 `TCAS__` 为前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("TCAS")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("crawl.keywords")
                    .try_parsing(true),
            );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// 仅由默认值构建的配置，不读取文件和环境变量
    pub fn from_defaults() -> Result<Self, ConfigError> {
        let settings: Settings = Self::defaults()?.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("crawl.base_url", "https://course.mytcas.com")?
            .set_default(
                "crawl.keywords",
                vec!["วิศวกรรมปัญญาประดิษฐ์", "วิศวกรรมคอมพิวเตอร์"],
            )?
            .set_default("crawl.search_input_selector", "#search")?
            .set_default("crawl.program_path_prefix", "/programs/")?
            .set_default("crawl.university_path_prefix", "/universities/")?
            .set_default("crawl.concurrency", 4)?
            .set_default("crawl.request_timeout_secs", 30)?
            .set_default("crawl.ready_timeout_ms", 10_000)?
            .set_default("crawl.ready_poll_initial_ms", 100)?
            .set_default("crawl.ready_poll_max_ms", 1_000)?
            .set_default("crawl.politeness_delay_ms", 0)?
            .set_default("retry.max_retries", 3)?
            .set_default("retry.initial_backoff_ms", 1_000)?
            .set_default("retry.max_backoff_ms", 30_000)?
            .set_default("retry.backoff_multiplier", 2.0)?
            .set_default("retry.jitter_factor", 0.1)?
            .set_default("export.output_path", "programs_ai_computer.csv")?
            .set_default("export.checkpoint_each_keyword", false)?
            .set_default("dashboard.university_column", "university")?
            .set_default("dashboard.program_name_column", "ชื่อหลักสูตร")?
            .set_default("dashboard.program_type_column", "ประเภทหลักสูตร")?
            .set_default("dashboard.campus_column", "วิทยาเขต")?
            .set_default("dashboard.fee_column", "ค่าใช้จ่ายต่อเทอม")
    }

    /// 校验配置的业务约束
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crawl.keywords.is_empty() {
            return Err(ConfigError::Message(
                "crawl.keywords must contain at least one keyword".to_string(),
            ));
        }
        if self.crawl.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Message(
                "crawl.keywords must not contain empty keywords".to_string(),
            ));
        }
        if self.crawl.concurrency == 0 {
            return Err(ConfigError::Message(
                "crawl.concurrency must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.retry.jitter_factor) {
            return Err(ConfigError::Message(
                "retry.jitter_factor must be within 0.0..=1.0".to_string(),
            ));
        }
        url::Url::parse(&self.crawl.base_url)
            .map_err(|e| ConfigError::Message(format!("crawl.base_url is invalid: {}", e)))?;
        Ok(())
    }
}
