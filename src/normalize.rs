//! IPA 归一化
//!
//! 不同来源的转写（模型输出 vs 参考数据）对同一发音常用不同符号，
//! 统一归一化后再比较，避免等价逻辑散落在各比较点。

use unicode_normalization::UnicodeNormalization;

use crate::rules::RULES;

/// 归一化单个音素 token
///
/// 查表返回规范形，未收录则原样返回。纯函数，幂等。
pub fn normalize_token(token: &str) -> String {
    match RULES.canonical(token) {
        Some(canonical) => canonical.to_string(),
        None => token.to_string(),
    }
}

/// 归一化完整 IPA 字符串（按空白分 token）
///
/// 流程：NFC 归一化 → 小写 → 折叠空白 → 逐 token 查表 → 单空格拼接。
/// 空输入返回空字符串，不报错。
pub fn normalize_string(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let nfc: String = input.nfc().collect();
    nfc.to_lowercase()
        .split_whitespace()
        .map(normalize_token)
        .collect::<Vec<_>>()
        .join(" ")
}
