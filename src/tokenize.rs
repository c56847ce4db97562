//! IPA 分词
//!
//! 把连续的 IPA 字符流切成音素 token：多字符音素（带连音符的塞擦音、
//! 双元音、长音元音）优先识别，其余逐字符切分。

use aho_corasick::{AhoCorasick, MatchKind};

use crate::rules::RULES;

lazy_static::lazy_static! {
    /// 多字符音素自动机（最左最长匹配），基于规则表清单一次性构建
    static ref MULTI_CHAR: AhoCorasick = AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(RULES.multi_char_inventory())
        .expect("音素清单构建自动机失败");
}

/// 把 IPA 字符串切成音素 token 序列
///
/// 空白只作分隔，不产出 token。未识别的字符单独成 token。
pub fn tokenize_ipa(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in input.split_whitespace() {
        let mut pos = 0;
        for m in MULTI_CHAR.find_iter(chunk) {
            // 匹配之前的间隙逐字符切分
            push_single_chars(&chunk[pos..m.start()], &mut tokens);
            tokens.push(chunk[m.start()..m.end()].to_string());
            pos = m.end();
        }
        push_single_chars(&chunk[pos..], &mut tokens);
    }
    tokens
}

fn push_single_chars(segment: &str, tokens: &mut Vec<String>) {
    for ch in segment.chars() {
        tokens.push(ch.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_chars() {
        assert_eq!(tokenize_ipa("kæt"), vec!["k", "æ", "t"]);
    }

    #[test]
    fn test_multi_char_phonemes() {
        assert_eq!(tokenize_ipa("t͡ʃɪp"), vec!["t͡ʃ", "ɪ", "p"]);
        assert_eq!(tokenize_ipa("boʊt"), vec!["b", "oʊ", "t"]);
    }

    #[test]
    fn test_length_marked_vowel() {
        assert_eq!(tokenize_ipa("kɑːt"), vec!["k", "ɑː", "t"]);
    }

    #[test]
    fn test_whitespace_separates() {
        assert_eq!(tokenize_ipa("k æ t"), vec!["k", "æ", "t"]);
        assert_eq!(tokenize_ipa("  "), Vec::<String>::new());
    }

    #[test]
    fn test_longest_match_wins() {
        // "ei" 是清单里的双元音，不应拆成 e + i
        assert_eq!(tokenize_ipa("eit"), vec!["ei", "t"]);
    }

    #[test]
    fn test_empty() {
        assert_eq!(tokenize_ipa(""), Vec::<String>::new());
    }
}
