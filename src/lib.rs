//! 音素比对库 - IPA phoneme comparison & pronunciation scoring
//!
//! 对外部语音识别模型产出的音素转写与参考转写做比对打分，
//! 供发音练习前端渲染高亮 diff 与准确度分数。
//!
//! ## 处理流程
//! 1. IPA 归一化（变体符号统一到规范形）
//! 2. 模糊等价判断（等价组 + 长音通配 + 学习者替换）
//! 3. 编辑距离 / 字符级 diff（DP + 固定平局优先级回溯）
//! 4. 贪心对齐（模型字符流切到参考 token 边界）
//! 5. 打分（匹配率 + 按错误类型扣分）
//!
//! 所有函数均为纯同步计算，无 I/O、无共享可变状态，可并发调用。

pub mod align;
pub mod engine;
pub mod fuzzy;
pub mod normalize;
pub mod rules;
pub mod tokenize;
pub mod types;

pub use align::{
    align_phonemes, character_diff, fuzzy_levenshtein, fuzzy_token_levenshtein, levenshtein,
};
pub use engine::ScoreEngine;
pub use fuzzy::{are_phonemes_close, are_phonemes_close_with, is_learner_substitution};
pub use normalize::{normalize_string, normalize_token};
pub use tokenize::tokenize_ipa;
pub use types::{ComparisonResult, DiffEntry, DiffTag, MarkKind, PhonemeMark};
