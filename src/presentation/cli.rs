// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{DashboardSettings, Settings};
use clap::{Args, Parser, Subcommand};
use config::ConfigError;
use std::path::PathBuf;

/// 命令行入口
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tcas-crawler",
    version,
    about = "Crawl course.mytcas.com programs by keyword and query the exported table"
)]
pub struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "TCAS_JSON_LOGS", default_value_t = false)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search every keyword and export one row per (keyword, program)
    Crawl(CrawlArgs),
    /// Summarize an exported table
    Query(QueryArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct CrawlArgs {
    /// Keywords to search, comma separated (replaces the configured list)
    #[arg(long, value_delimiter = ',')]
    pub keywords: Vec<String>,

    /// Output CSV path
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Detail pages fetched at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Connect to an already running Chrome instead of launching one
    #[arg(long)]
    pub remote_debugging_url: Option<String>,
}

impl CrawlArgs {
    /// 把命令行覆盖项写入配置并重新校验
    pub fn apply(&self, settings: &mut Settings) -> Result<(), ConfigError> {
        if !self.keywords.is_empty() {
            settings.crawl.keywords = self
                .keywords
                .iter()
                .map(|k| k.trim().to_string())
                .collect();
        }
        if let Some(output) = &self.output {
            settings.export.output_path = output.display().to_string();
        }
        if let Some(concurrency) = self.concurrency {
            settings.crawl.concurrency = concurrency;
        }
        if let Some(url) = &self.remote_debugging_url {
            settings.crawl.remote_debugging_url = Some(url.clone());
        }
        settings.validate()
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Exported table to read (defaults to the configured output path)
    #[arg(long)]
    pub data: Option<PathBuf>,

    #[arg(long)]
    pub university: Option<String>,

    #[arg(long)]
    pub program_name: Option<String>,

    #[arg(long)]
    pub program_type: Option<String>,

    #[arg(long)]
    pub campus: Option<String>,

    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl QueryArgs {
    /// 把筛选参数映射为 (列名, 取值) 条件
    pub fn criteria<'a>(&'a self, columns: &'a DashboardSettings) -> Vec<(&'a str, &'a str)> {
        [
            (columns.university_column.as_str(), self.university.as_deref()),
            (columns.program_name_column.as_str(), self.program_name.as_deref()),
            (columns.program_type_column.as_str(), self.program_type.as_deref()),
            (columns.campus_column.as_str(), self.campus.as_deref()),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.map(|v| (column, v)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crawl_overrides() {
        let cli = Cli::parse_from([
            "tcas-crawler",
            "crawl",
            "--keywords",
            "a, b",
            "--output",
            "out/programs.csv",
            "--concurrency",
            "8",
        ]);

        let Command::Crawl(args) = cli.command else {
            panic!("expected crawl subcommand");
        };
        let mut settings = Settings::from_defaults().unwrap();
        args.apply(&mut settings).unwrap();

        assert_eq!(settings.crawl.keywords, vec!["a", "b"]);
        assert_eq!(settings.export.output_path, "out/programs.csv");
        assert_eq!(settings.crawl.concurrency, 8);
    }

    #[test]
    fn test_zero_concurrency_override_is_rejected() {
        let args = CrawlArgs {
            concurrency: Some(0),
            ..Default::default()
        };
        let mut settings = Settings::from_defaults().unwrap();
        assert!(args.apply(&mut settings).is_err());
    }

    #[test]
    fn test_query_criteria_only_include_given_filters() {
        let cli = Cli::parse_from([
            "tcas-crawler",
            "--json-logs",
            "query",
            "--university",
            "U1",
            "--campus",
            "บางเขน",
        ]);
        assert!(cli.json_logs);

        let Command::Query(args) = cli.command else {
            panic!("expected query subcommand");
        };
        let settings = Settings::from_defaults().unwrap();
        let criteria = args.criteria(&settings.dashboard);

        assert_eq!(criteria, vec![("university", "U1"), ("วิทยาเขต", "บางเขน")]);
    }
}
