// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 负责与文件系统的交互：导出记录集以及读回导出的表格。
pub mod table_sink;
