//! 音素规则表
//!
//! 包含 IPA 归一化映射表、模糊等价组、学习者常见替换对。
//! 全部为进程级只读数据，初始化后不再变更。

use std::collections::HashMap;

/// 长音符号 (U+02D0)
///
/// 比对时视为通配：长音在匹配层面不构成音位区别
pub const LENGTH_MARK: char = 'ː';

/// 音素规则集（预构建，只读）
pub struct PhonemeRules {
    /// 变体 → 规范形映射（多对一，未命中保持原样）
    normalization: HashMap<&'static str, &'static str>,
    /// 模糊等价组（同组内的音素视为匹配）
    fuzzy_groups: Vec<Vec<&'static str>>,
    /// 学习者常见替换对（对称）
    learner_substitutions: Vec<(&'static str, &'static str)>,
}

impl PhonemeRules {
    pub fn new() -> Self {
        let normalization = HashMap::from([
            // 长音
            ("ɑː", "ɑ"),
            // 变体写法
            ("ɡ", "g"),
            ("r", "ɹ"),
            ("ɾ", "ɹ"),
            ("ɻ", "ɹ"),
            ("ɽ", "ɹ"),
            ("ɺ", "ɹ"),
            // 双元音
            ("əʊ", "oʊ"),
            ("ou", "oʊ"),
            ("ei", "eɪ"),
            ("ai", "aɪ"),
            ("au", "aʊ"),
            ("oi", "ɔɪ"),
            // 塞擦音
            ("ʧ", "t͡ʃ"),
            ("ʤ", "d͡ʒ"),
            // R 化元音：统一折叠到 ə，保证映射幂等
            ("ɚ", "ə"),
            ("er", "ə"),
            ("ər", "ə"),
            ("ɜr", "ə"),
        ]);

        let fuzzy_groups = vec![
            vec!["ɑ", "ɑː"],
            vec!["ə", "ɚ"],
            vec!["oʊ", "ou", "əʊ"],
            vec!["eɪ", "ei"],
            vec!["aɪ", "ai"],
            vec!["aʊ", "au"],
            vec!["ɔɪ", "oi"],
            vec!["t͡ʃ", "ʧ"],
            vec!["d͡ʒ", "ʤ"],
            vec!["g", "ɡ"],
            vec!["ɹ", "r", "ɾ", "ɻ", "ɽ", "ɺ"],
            vec!["ɛ", "e"],
        ];

        let learner_substitutions = vec![("ʊ", "u"), ("i", "ɪ"), ("ɑ", "a"), ("ɔ", "o")];

        Self {
            normalization,
            fuzzy_groups,
            learner_substitutions,
        }
    }

    /// 查询规范形
    ///
    /// 返回 None 表示该 token 本身即规范形（或未收录）
    pub fn canonical(&self, token: &str) -> Option<&'static str> {
        self.normalization.get(token).copied()
    }

    /// 模糊等价组
    pub fn fuzzy_groups(&self) -> &[Vec<&'static str>] {
        &self.fuzzy_groups
    }

    /// 判断两个音素是否为学习者常见替换对（对称）
    pub fn is_learner_pair(&self, a: &str, b: &str) -> bool {
        self.learner_substitutions
            .iter()
            .any(|(p1, p2)| (a == *p1 && b == *p2) || (a == *p2 && b == *p1))
    }

    /// 收集规则表中所有多字符音素（用于分词自动机）
    pub fn multi_char_inventory(&self) -> Vec<&'static str> {
        let mut inventory: Vec<&'static str> = Vec::new();
        for (variant, canonical) in &self.normalization {
            inventory.push(*variant);
            inventory.push(*canonical);
        }
        for group in &self.fuzzy_groups {
            inventory.extend(group.iter().copied());
        }
        inventory.retain(|t| t.chars().count() > 1);
        inventory.sort_unstable();
        inventory.dedup();
        inventory
    }
}

impl Default for PhonemeRules {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static::lazy_static! {
    /// 全局音素规则表
    ///
    /// 首次访问时构建，之后只读，可被任意线程并发读取
    pub static ref RULES: PhonemeRules = PhonemeRules::new();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_lookup() {
        let rules = PhonemeRules::new();
        assert_eq!(rules.canonical("r"), Some("ɹ"));
        assert_eq!(rules.canonical("ʧ"), Some("t͡ʃ"));
        assert_eq!(rules.canonical("ɑː"), Some("ɑ"));
        // 未收录的 token 不做映射
        assert_eq!(rules.canonical("p"), None);
    }

    #[test]
    fn test_normalization_idempotent() {
        // 映射值本身不应再是映射键，否则归一化不幂等
        let rules = PhonemeRules::new();
        for &canonical in rules.normalization.values() {
            assert_eq!(
                rules.canonical(canonical),
                None,
                "规范形 {} 仍是映射键，归一化链未折叠",
                canonical
            );
        }
    }

    #[test]
    fn test_learner_pair_symmetric() {
        let rules = PhonemeRules::new();
        assert!(rules.is_learner_pair("ʊ", "u"));
        assert!(rules.is_learner_pair("u", "ʊ"));
        assert!(!rules.is_learner_pair("p", "b"));
    }

    #[test]
    fn test_multi_char_inventory() {
        let rules = PhonemeRules::new();
        let inventory = rules.multi_char_inventory();
        assert!(inventory.contains(&"t͡ʃ"));
        assert!(inventory.contains(&"oʊ"));
        assert!(inventory.contains(&"ɑː"));
        // 单字符不进清单
        assert!(!inventory.contains(&"ʧ"));
        assert!(!inventory.contains(&"g"));
    }
}
