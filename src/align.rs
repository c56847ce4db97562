//! 对齐与距离计算
//!
//! 三类独立纯函数：
//! 1. 编辑距离（普通 / 模糊）
//! 2. 字符级 diff（DP 表 + 回溯）
//! 3. 贪心音素对齐（把模型的无边界输出切到参考的 token 边界上）

use crate::fuzzy::are_phonemes_close;
use crate::types::{DiffEntry, DiffTag};

/// diff 最大处理字符数（超过则截断，防止 OOM）
const MAX_DIFF_CHARS: usize = 2048;

/// 字符级 Levenshtein 编辑距离（插入/删除/替换代价均为 1）
pub fn levenshtein(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// 模糊字符编辑距离
///
/// 与 [`levenshtein`] 同形的 DP，但接近的音素字符（见
/// [`are_phonemes_close`]）代价为 0
pub fn fuzzy_levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<String> = a.chars().map(|c| c.to_string()).collect();
    let b_chars: Vec<String> = b.chars().map(|c| c.to_string()).collect();
    fuzzy_token_levenshtein(&a_chars, &b_chars)
}

/// token 级模糊编辑距离
///
/// 同组/归一化后相同的 token 不计代价，其余操作代价为 1
pub fn fuzzy_token_levenshtein(a: &[String], b: &[String]) -> usize {
    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in 0..=a.len() {
        dp[i][0] = i;
    }
    for j in 0..=b.len() {
        dp[0][j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            if are_phonemes_close(&a[i - 1], &b[j - 1]) {
                dp[i][j] = dp[i - 1][j - 1];
            } else {
                dp[i][j] = 1 + dp[i - 1][j]
                    .min(dp[i][j - 1])
                    .min(dp[i - 1][j - 1]);
            }
        }
    }

    dp[a.len()][b.len()]
}

/// 字符级 diff
///
/// 先填前缀编辑距离表，再从 (|a|,|b|) 回溯到 (0,0)。
/// 平局优先级固定为：same > replace > insert > delete，
/// 保证同代价路径下输出稳定。
///
/// 超过 `MAX_DIFF_CHARS` 的输入会被截断：此时 diff 只覆盖截断后的
/// 前缀，还原性质仅在截断范围内成立。
pub fn character_diff(a: &str, b: &str) -> Vec<DiffEntry> {
    let mut a_chars: Vec<char> = a.chars().collect();
    let mut b_chars: Vec<char> = b.chars().collect();

    // 音素串通常只有几十个字符；超长输入截断处理
    if a_chars.len() > MAX_DIFF_CHARS || b_chars.len() > MAX_DIFF_CHARS {
        tracing::warn!(
            "diff 输入过长 (a={}, b={})，截断到 {} 字符",
            a_chars.len(),
            b_chars.len(),
            MAX_DIFF_CHARS
        );
        a_chars.truncate(MAX_DIFF_CHARS);
        b_chars.truncate(MAX_DIFF_CHARS);
    }

    let dp = edit_table(&a_chars, &b_chars);

    let mut entries = Vec::new();
    let mut i = a_chars.len();
    let mut j = b_chars.len();
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && a_chars[i - 1] == b_chars[j - 1] {
            entries.push(DiffEntry {
                char: a_chars[i - 1],
                tag: DiffTag::Same,
            });
            i -= 1;
            j -= 1;
        } else if i > 0 && j > 0 && dp[i][j] == dp[i - 1][j - 1] + 1 {
            entries.push(DiffEntry {
                char: b_chars[j - 1],
                tag: DiffTag::Replace,
            });
            i -= 1;
            j -= 1;
        } else if j > 0 && dp[i][j] == dp[i][j - 1] + 1 {
            entries.push(DiffEntry {
                char: b_chars[j - 1],
                tag: DiffTag::Insert,
            });
            j -= 1;
        } else {
            // 此分支必然 i > 0
            entries.push(DiffEntry {
                char: a_chars[i - 1],
                tag: DiffTag::Delete,
            });
            i -= 1;
        }
    }

    // 回溯产出为逆序
    entries.reverse();
    entries
}

/// 前缀编辑距离表
///
/// dp[i][j] = a 前 i 个字符变换到 b 前 j 个字符的最小操作数
fn edit_table(a: &[char], b: &[char]) -> Vec<Vec<usize>> {
    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in 0..=a.len() {
        dp[i][0] = i;
    }
    for j in 0..=b.len() {
        dp[0][j] = j;
    }
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            if a[i - 1] == b[j - 1] {
                dp[i][j] = dp[i - 1][j - 1];
            } else {
                dp[i][j] = 1 + dp[i - 1][j]
                    .min(dp[i][j - 1])
                    .min(dp[i - 1][j - 1]);
            }
        }
    }
    dp
}

/// 贪心音素对齐
///
/// 模型输出没有可靠的 token 边界，参考转写有。按参考 token 的字符长度
/// 依次从模型字符流中切片（不回溯、不搜索更优切分），剩余字符作为
/// 一个额外的尾部 token 追加。长度偏差时优雅退化而不报错。
pub fn align_phonemes(model: &str, official: &str) -> String {
    let stream: Vec<char> = model.chars().filter(|c| !c.is_whitespace()).collect();
    let mut idx = 0;
    let mut aligned: Vec<String> = Vec::new();

    for token in official.split_whitespace() {
        // 无论切出的片段是否与参考 token 相同，都按其长度消费
        let end = (idx + token.chars().count()).min(stream.len());
        aligned.push(stream[idx..end].iter().collect());
        idx = end;
    }

    if idx < stream.len() {
        aligned.push(stream[idx..].iter().collect());
    }

    aligned.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    // === levenshtein ===

    #[test]
    fn test_levenshtein_classic() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn test_levenshtein_identity() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("kæt", "kæt"), 0);
    }

    #[test]
    fn test_levenshtein_empty_side() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        // 字符数而非字节数
        assert_eq!(levenshtein("", "æːə"), 3);
    }

    #[test]
    fn test_levenshtein_triangle_inequality() {
        let samples = [
            ("kitten", "sitting", "mitten"),
            ("", "abc", "abcdef"),
            ("kæt", "k æ t", "kat"),
        ];
        for (a, b, c) in samples {
            assert!(
                levenshtein(a, c) <= levenshtein(a, b) + levenshtein(b, c),
                "三角不等式不成立: {} {} {}",
                a,
                b,
                c
            );
        }
    }

    // === fuzzy_levenshtein ===

    #[test]
    fn test_fuzzy_levenshtein_close_chars_free() {
        // r 与 ɹ 接近，不计代价
        assert_eq!(fuzzy_levenshtein("r", "ɹ"), 0);
        assert_eq!(fuzzy_levenshtein("kæt", "kæt"), 0);
    }

    #[test]
    fn test_fuzzy_levenshtein_counts_real_errors() {
        assert_eq!(fuzzy_levenshtein("pæt", "bæt"), 1);
        assert_eq!(fuzzy_levenshtein("", "kæt"), 3);
    }

    #[test]
    fn test_fuzzy_token_levenshtein() {
        let a = vec!["t͡ʃ".to_string(), "ɪ".to_string(), "p".to_string()];
        let b = vec!["ʧ".to_string(), "ɪ".to_string(), "b".to_string()];
        // t͡ʃ/ʧ 同组，ɪ 相同，p/b 是一次替换
        assert_eq!(fuzzy_token_levenshtein(&a, &b), 1);
    }

    // === character_diff ===

    fn reconstruct_b(diff: &[DiffEntry]) -> String {
        diff.iter()
            .filter(|e| matches!(e.tag, DiffTag::Same | DiffTag::Insert | DiffTag::Replace))
            .map(|e| e.char)
            .collect()
    }

    fn reconstruct_a_unsubstituted(diff: &[DiffEntry]) -> String {
        diff.iter()
            .filter(|e| matches!(e.tag, DiffTag::Same | DiffTag::Delete))
            .map(|e| e.char)
            .collect()
    }

    #[test]
    fn test_diff_same() {
        let diff = character_diff("kæt", "kæt");
        assert!(diff.iter().all(|e| e.tag == DiffTag::Same));
        assert_eq!(reconstruct_b(&diff), "kæt");
    }

    #[test]
    fn test_diff_replace_preferred_on_tie() {
        // 代价相同时替换优先于插入/删除
        let diff = character_diff("abc", "axc");
        let tags: Vec<DiffTag> = diff.iter().map(|e| e.tag).collect();
        assert_eq!(tags, vec![DiffTag::Same, DiffTag::Replace, DiffTag::Same]);
        assert_eq!(diff[1].char, 'x');
    }

    #[test]
    fn test_diff_pure_insert_delete() {
        let diff = character_diff("", "ab");
        assert!(diff.iter().all(|e| e.tag == DiffTag::Insert));

        let diff = character_diff("ab", "");
        assert!(diff.iter().all(|e| e.tag == DiffTag::Delete));
    }

    #[test]
    fn test_diff_roundtrip_b_side() {
        let cases = [
            ("kitten", "sitting"),
            ("kæt", "kat"),
            ("", "oʊ"),
            ("abcdef", "abdf"),
            ("flaw", "flaws"),
        ];
        for (a, b) in cases {
            let diff = character_diff(a, b);
            assert_eq!(reconstruct_b(&diff), b, "b 侧还原失败: {} vs {}", a, b);
        }
    }

    #[test]
    fn test_diff_roundtrip_a_side_without_substitution() {
        // 无替换路径时 same+delete 应完整还原 a
        let cases = [("sitting", "sit"), ("abc", "abcdef"), ("abcdef", "abdf")];
        for (a, b) in cases {
            let diff = character_diff(a, b);
            assert_eq!(reconstruct_a_unsubstituted(&diff), a);
        }
    }

    #[test]
    fn test_diff_entry_counts_cover_a() {
        // same + delete + replace 条目数恒等于 |a|
        let cases = [("kitten", "sitting"), ("kæt", "bɔt"), ("a", ""), ("", "a")];
        for (a, b) in cases {
            let diff = character_diff(a, b);
            let covered = diff
                .iter()
                .filter(|e| {
                    matches!(e.tag, DiffTag::Same | DiffTag::Delete | DiffTag::Replace)
                })
                .count();
            assert_eq!(covered, a.chars().count());
        }
    }

    // === align_phonemes ===

    #[test]
    fn test_align_exact_match() {
        assert_eq!(align_phonemes("kæt", "k æ t"), "k æ t");
    }

    #[test]
    fn test_align_greedy_slices() {
        // 不匹配时按参考 token 长度位置切片，剩余作为尾部 token
        assert_eq!(align_phonemes("kaet", "k æ t"), "k a e t");
    }

    #[test]
    fn test_align_trailing_extra() {
        assert_eq!(align_phonemes("kætəs", "k æ t"), "k æ t əs");
    }

    #[test]
    fn test_align_model_shorter() {
        // 模型流耗尽后产生空切片，退化但不报错
        assert_eq!(align_phonemes("k", "k æ t"), "k  ");
    }

    #[test]
    fn test_align_strips_model_whitespace() {
        assert_eq!(align_phonemes("k æt", "k æ t"), "k æ t");
    }

    #[test]
    fn test_align_empty_official() {
        assert_eq!(align_phonemes("kæt", ""), "kæt");
        assert_eq!(align_phonemes("", ""), "");
    }
}
