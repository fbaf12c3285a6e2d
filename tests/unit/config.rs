// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置加载测试
///
/// 确认仓库自带的 config/default.toml 能被加载并覆盖内置默认值
#[cfg(test)]
mod tests {
    use tcas_crawler::application::use_cases::crawl_use_case::CrawlPlan;
    use tcas_crawler::config::settings::Settings;

    #[test]
    fn test_config_loading_from_default_toml() {
        let settings = Settings::new().expect("config/default.toml should load");

        assert_eq!(settings.crawl.base_url, "https://course.mytcas.com");
        assert!(!settings.crawl.keywords.is_empty());
        // Only the file sets a politeness delay.
        assert_eq!(settings.crawl.politeness_delay_ms, 250);
        assert_eq!(settings.export.output_path, "programs_ai_computer.csv");
    }

    #[test]
    fn test_plan_follows_settings() {
        let settings = Settings::from_defaults().unwrap();
        let plan = CrawlPlan::from_settings(&settings);

        assert_eq!(plan.keywords, settings.crawl.keywords);
        assert_eq!(plan.search_url, settings.crawl.base_url);
        assert_eq!(plan.concurrency, settings.crawl.concurrency);
        assert!(!plan.checkpoint_each_keyword);
    }
}
