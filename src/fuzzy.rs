//! 音素模糊匹配
//!
//! 判断两个（已转写的）音素 token 是否足够接近：
//! 长音通配 → 去长音 + 归一化 → 相等 → 等价组查询

use crate::normalize::normalize_token;
use crate::rules::{LENGTH_MARK, RULES};

/// 判断两个音素 token 是否接近（仅用内置等价组）
pub fn are_phonemes_close(a: &str, b: &str) -> bool {
    are_phonemes_close_with(a, b, &[])
}

/// 判断两个音素 token 是否接近，附加调用方自定义等价组
///
/// 结果只依赖两个入参与只读规则表：自反、对称，但跨组不保证传递
pub fn are_phonemes_close_with(a: &str, b: &str, extra_groups: &[Vec<String>]) -> bool {
    // 长音符号单独成 token 时视为通配
    if is_length_mark_only(a) || is_length_mark_only(b) {
        return true;
    }

    // 去除内嵌长音后归一化
    let a = normalize_token(&strip_length_mark(a));
    let b = normalize_token(&strip_length_mark(b));

    if a == b {
        return true;
    }

    for group in RULES.fuzzy_groups() {
        if group.iter().any(|t| *t == a) && group.iter().any(|t| *t == b) {
            return true;
        }
    }

    for group in extra_groups {
        if group.iter().any(|t| t == &a) && group.iter().any(|t| t == &b) {
            return true;
        }
    }

    false
}

/// 判断两个音素是否为学习者常见替换（如 θ→s 类的 L2 混淆）
///
/// 对称；用于打分时区分"接近的替换"和"完全念错"
pub fn is_learner_substitution(a: &str, b: &str) -> bool {
    RULES.is_learner_pair(a, b)
}

fn is_length_mark_only(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next() == Some(LENGTH_MARK) && chars.next().is_none()
}

fn strip_length_mark(token: &str) -> String {
    token.chars().filter(|c| *c != LENGTH_MARK).collect()
}
