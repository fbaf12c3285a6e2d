// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 判断URL路径是否以给定前缀开头，且与基准URL同源
pub fn is_same_origin_with_prefix(base_url: &Url, candidate: &Url, prefix: &str) -> bool {
    candidate.origin() == base_url.origin() && candidate.path().starts_with(prefix)
}
