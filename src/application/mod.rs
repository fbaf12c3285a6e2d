// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 编排导航会话、领域服务和表格输出，组成完整的爬取流程
pub mod use_cases;
