// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：记录、记录集和数据集快照
/// - 服务（services）：链接收集、页面提取和数据集查询
///
/// 领域层不依赖浏览器或文件系统，只处理已渲染的HTML和内存中的数据。
pub mod models;
pub mod services;
