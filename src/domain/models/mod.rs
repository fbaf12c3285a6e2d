// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 课程记录（program_record）：一个详情页生成的一行数据
/// - 记录集（record_set）：一次运行的全部记录及其列结构
/// - 数据集（dataset）：导出表格的只读快照
pub mod dataset;
pub mod program_record;
pub mod record_set;
