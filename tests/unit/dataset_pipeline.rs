// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 导出与查询链路测试
///
/// 提取详情页、导出表格、读回快照，再做看板查询
#[cfg(test)]
mod tests {
    use tcas_crawler::config::settings::Settings;
    use tcas_crawler::domain::models::record_set::RecordSet;
    use tcas_crawler::domain::services::dataset_query;
    use tcas_crawler::domain::services::page_extractor::PageExtractor;
    use tcas_crawler::infrastructure::table_sink::TableSink;
    use tcas_crawler::presentation::query_report::DashboardReport;

    fn page(university: &str, name: &str, kind: &str, fee: &str) -> String {
        format!(
            r#"<html><body>
                <a href="/universities/{u}">{u}</a>
                <dl>
                    <dt>ชื่อหลักสูตร</dt><dd>{name}</dd>
                    <dt>ประเภทหลักสูตร</dt><dd>{kind}</dd>
                    <dt>ค่าใช้จ่ายต่อเทอม</dt><dd>{fee}</dd>
                </dl>
            </body></html>"#,
            u = university,
            name = name,
            kind = kind,
            fee = fee
        )
    }

    fn exported_records() -> RecordSet {
        let extractor = PageExtractor::new("/universities/".to_string());
        let pages = [
            ("AI", "https://course.mytcas.com/programs/1", page("KU", "AI-1", "ภาษาไทย ปกติ", "1,000")),
            ("AI", "https://course.mytcas.com/programs/2", page("CU", "AI-2", "นานาชาติ", "3,000")),
            ("CPE", "https://course.mytcas.com/programs/3", page("KU", "CPE-1", "ภาษาไทย ปกติ", "2,000")),
        ];

        pages
            .iter()
            .map(|(keyword, link, html)| extractor.extract(keyword, link, html).record)
            .collect()
    }

    #[test]
    fn test_export_then_query_mean_fee() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("programs.csv");
        TableSink::export(&exported_records(), &path).unwrap();

        let dataset = TableSink::load_dataset(&path).unwrap();
        assert_eq!(dataset.len(), 3);

        let summary = dataset_query::numeric_summary(&dataset, "ค่าใช้จ่ายต่อเทอม")
            .unwrap()
            .unwrap();
        assert_eq!(summary.mean, 2000.0);
    }

    #[test]
    fn test_university_filter_returns_matching_subset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("programs.csv");
        TableSink::export(&exported_records(), &path).unwrap();
        let dataset = TableSink::load_dataset(&path).unwrap();

        let filtered = dataset_query::filter(&dataset, &[("university", "KU")]).unwrap();
        assert_eq!(filtered.len(), 2);

        let settings = Settings::from_defaults().unwrap();
        let report = DashboardReport::build(&filtered, &settings.dashboard).unwrap();
        assert_eq!(report.universities, 1);
        assert_eq!(report.fee_by_university[0].mean, 1500.0);
        assert_eq!(
            report.most_expensive.map(|p| p.program),
            Some(Some("CPE-1".to_string()))
        );
    }
}
