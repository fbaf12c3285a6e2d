// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 编排关键词爬取流程
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 课程记录、记录集、数据集快照以及链接收集、页面提取和查询服务
pub mod domain;

/// 引擎模块
///
/// 基于无头浏览器的导航会话和页面就绪等待
pub mod engines;

/// 基础设施模块
///
/// 表格文件的写出与读回
pub mod infrastructure;

/// 表示层模块
///
/// 命令行参数和查询报告
pub mod presentation;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
