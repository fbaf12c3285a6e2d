// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tcas_crawler::application::use_cases::crawl_use_case::{CrawlPlan, CrawlUseCase};
use tcas_crawler::config::settings::Settings;
use tcas_crawler::domain::services::dataset_query;
use tcas_crawler::engines::browser_session::{BrowserSession, BrowserSessionConfig};
use tcas_crawler::infrastructure::table_sink::TableSink;
use tcas_crawler::presentation::cli::{Cli, Command, CrawlArgs, QueryArgs};
use tcas_crawler::presentation::query_report::DashboardReport;
use tcas_crawler::utils::retry_policy::RetryPolicy;
use tcas_crawler::utils::telemetry;
use tracing::{error, info};

/// 主函数
///
/// 解析命令行，初始化日志和配置，然后执行爬取或查询
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    telemetry::init_telemetry(cli.json_logs);

    // 2. Load configuration
    let mut settings = Settings::new()?;
    info!("Configuration loaded");

    match cli.command {
        Command::Crawl(args) => run_crawl(&mut settings, &args).await,
        Command::Query(args) => run_query(&settings, &args),
    }
}

async fn run_crawl(settings: &mut Settings, args: &CrawlArgs) -> anyhow::Result<()> {
    args.apply(settings)?;
    info!(
        keywords = ?settings.crawl.keywords,
        output = %settings.export.output_path,
        "Starting crawl"
    );

    let session = Arc::new(BrowserSession::new(BrowserSessionConfig {
        remote_debugging_url: settings.crawl.remote_debugging_url.clone(),
        request_timeout: settings.crawl.request_timeout(),
    }));

    let use_case = CrawlUseCase::new(
        session.clone(),
        RetryPolicy::from(&settings.retry),
        CrawlPlan::from_settings(settings),
    );
    let outcome = use_case.execute().await;

    // The browser is closed on every path.
    session.close().await;

    match outcome {
        Ok((_, report)) => {
            info!(
                keywords = report.keywords,
                records = report.records,
                misaligned = report.misaligned,
                "Done"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Crawl aborted");
            Err(e.into())
        }
    }
}

fn run_query(settings: &Settings, args: &QueryArgs) -> anyhow::Result<()> {
    let path = args
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.export.output_path));

    let dataset = TableSink::load_dataset(&path)?;
    info!(path = %path.display(), rows = dataset.len(), "Dataset loaded");

    let filtered = dataset_query::filter(&dataset, &args.criteria(&settings.dashboard))?;
    let report = DashboardReport::build(&filtered, &settings.dashboard)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}
