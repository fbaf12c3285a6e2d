// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod dataset_query;
pub mod link_collector;
pub mod page_extractor;
