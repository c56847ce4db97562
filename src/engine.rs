//! 发音打分引擎
//!
//! 组合归一化、模糊匹配、对齐与距离计算，产出前端可直接渲染的
//! 比对结果（逐音素标记 + 0-100 分数）。

use std::time::Instant;

use anyhow::bail;

use crate::align::{align_phonemes, fuzzy_levenshtein, fuzzy_token_levenshtein};
use crate::fuzzy::{are_phonemes_close_with, is_learner_substitution};
use crate::normalize::normalize_string;
use crate::tokenize::tokenize_ipa;
use crate::types::{ComparisonResult, MarkKind, PhonemeMark};

/// 判定"接近"的默认距离上限
const DEFAULT_CLOSE_THRESHOLD: usize = 1;
/// 超过此距离视为完全听不清，不再渲染 diff
const DEFAULT_FAR_THRESHOLD: usize = 5;
/// 匹配率低于此值直接判 0 分（念的是另一个词）
const MIN_MATCH_RATIO: f32 = 0.3;

/// 打分引擎（可复用，可携带应用侧自定义等价组）
pub struct ScoreEngine {
    /// distance <= close_threshold 视为接近
    close_threshold: usize,
    /// distance > far_threshold 视为偏差过大
    far_threshold: usize,
    /// 应用侧追加的模糊等价组（来自设置页）
    extra_groups: Vec<Vec<String>>,
}

impl ScoreEngine {
    /// 创建打分引擎
    ///
    /// # Arguments
    /// * `close_threshold` - 接近判定的距离上限
    /// * `far_threshold` - 偏差过大判定的距离下限
    /// * `extra_groups` - 追加的等价组，每组至少 2 个非空 token
    pub fn new(
        close_threshold: usize,
        far_threshold: usize,
        extra_groups: Vec<Vec<String>>,
    ) -> anyhow::Result<Self> {
        if close_threshold > far_threshold {
            bail!(
                "接近阈值 {} 不能大于偏差阈值 {}",
                close_threshold,
                far_threshold
            );
        }
        for group in &extra_groups {
            if group.len() < 2 {
                bail!("自定义等价组至少需要 2 个成员: {:?}", group);
            }
            if group.iter().any(|t| t.is_empty()) {
                bail!("自定义等价组包含空 token: {:?}", group);
            }
        }

        Ok(Self {
            close_threshold,
            far_threshold,
            extra_groups,
        })
    }

    /// 默认配置：阈值 1/5，无自定义组
    pub fn with_defaults() -> Self {
        Self {
            close_threshold: DEFAULT_CLOSE_THRESHOLD,
            far_threshold: DEFAULT_FAR_THRESHOLD,
            extra_groups: Vec::new(),
        }
    }

    /// 比对模型转写与参考转写
    ///
    /// 纯函数，不可失败：长度不一致、未知符号等情况优雅退化
    pub fn compare(&self, model: &str, official: &str) -> ComparisonResult {
        let start = Instant::now();

        let model_flat = normalize_string(model).replace(' ', "");
        let official_spaced = normalize_string(official);
        let official_flat = official_spaced.replace(' ', "");

        let distance = fuzzy_levenshtein(&model_flat, &official_flat);
        let close = distance <= self.close_threshold;
        let too_far_off = distance > self.far_threshold;

        let aligned = align_phonemes(&model_flat, &official_spaced);
        let marks = self.build_marks(&model_flat, &official_flat);
        let score = self.accuracy_score(&marks, official_flat.chars().count());

        let elapsed_us = start.elapsed().as_micros() as u64;
        tracing::debug!(
            "compare: distance={}, score={}, close={}, too_far_off={}, elapsed_us={}",
            distance,
            score,
            close,
            too_far_off,
            elapsed_us
        );

        ComparisonResult {
            aligned,
            distance,
            close,
            too_far_off,
            marks,
            score,
            elapsed_us,
        }
    }

    /// 相似度 (0.0 - 1.0)，按音素 token 计算
    pub fn similarity(&self, a: &str, b: &str) -> f32 {
        let tokens_a = tokenize_ipa(a);
        let tokens_b = tokenize_ipa(b);
        let max_len = tokens_a.len().max(tokens_b.len());
        if max_len == 0 {
            return 1.0;
        }

        let distance = fuzzy_token_levenshtein(&tokens_a, &tokens_b);
        (1.0 - distance as f32 / max_len as f32).max(0.0)
    }

    /// 逐字符位置比对并分类
    ///
    /// 位置对位扫描（非编辑路径）：两侧同位字符要么匹配、要么是
    /// 学习者替换、要么算念错；多余/缺失的音出现在尾部
    fn build_marks(&self, model_flat: &str, official_flat: &str) -> Vec<PhonemeMark> {
        let model_chars: Vec<char> = model_flat.chars().collect();
        let official_chars: Vec<char> = official_flat.chars().collect();
        let mut marks = Vec::with_capacity(model_chars.len().max(official_chars.len()));

        let mut i = 0;
        let mut j = 0;
        while i < model_chars.len() && j < official_chars.len() {
            let m = model_chars[i].to_string();
            let o = official_chars[j].to_string();
            let kind = if are_phonemes_close_with(&m, &o, &self.extra_groups) {
                MarkKind::Same
            } else if is_learner_substitution(&m, &o) {
                MarkKind::Substitution
            } else {
                MarkKind::Replace
            };
            marks.push(PhonemeMark {
                value: model_chars[i],
                kind,
            });
            i += 1;
            j += 1;
        }
        while i < model_chars.len() {
            marks.push(PhonemeMark {
                value: model_chars[i],
                kind: MarkKind::Delete,
            });
            i += 1;
        }
        while j < official_chars.len() {
            marks.push(PhonemeMark {
                value: official_chars[j],
                kind: MarkKind::Insert,
            });
            j += 1;
        }

        marks
    }

    /// 准确度打分
    ///
    /// 匹配率过低直接 0 分；否则从 100 起按错误类型扣分，
    /// 单一错误类型从轻处理
    fn accuracy_score(&self, marks: &[PhonemeMark], total_phonemes: usize) -> u8 {
        if total_phonemes == 0 {
            return if marks.is_empty() { 100 } else { 0 };
        }

        let mut match_count = 0usize;
        let mut extra_at_end = 0usize;
        let mut mispronounced = 0usize;
        let mut total_errors = 0usize;

        for (idx, mark) in marks.iter().enumerate() {
            match mark.kind {
                MarkKind::Same => match_count += 1,
                // 结尾多出的音单独统计，从轻扣分
                MarkKind::Delete if idx >= total_phonemes => extra_at_end += 1,
                kind => {
                    total_errors += 1;
                    if kind == MarkKind::Replace {
                        mispronounced += 1;
                    }
                }
            }
        }

        if match_count == 0 || (match_count as f32 / total_phonemes as f32) < MIN_MATCH_RATIO {
            return 0;
        }

        let has_extra = extra_at_end > 0;
        let has_mispronounced = mispronounced > 0;
        let has_substitution = marks.iter().any(|m| m.kind == MarkKind::Substitution);
        let other_errors = total_errors.saturating_sub(mispronounced + extra_at_end);
        let has_other = other_errors > 0;

        let error_types = [has_extra, has_mispronounced, has_substitution, has_other]
            .iter()
            .filter(|b| **b)
            .count();

        let mut score: i32 = 100;
        if error_types == 1 {
            if has_extra {
                score -= 10;
            }
            if has_mispronounced {
                score -= 10;
            }
            if has_substitution {
                score -= 5;
            }
            if has_other {
                score -= 25;
            }
        } else if error_types > 1 {
            if has_extra {
                score -= 10;
            }
            if has_mispronounced {
                score -= 10;
            }
            if has_substitution {
                score -= 10;
            }
            if has_other {
                score -= 30;
            }
        }

        score.clamp(0, 100) as u8
    }
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
