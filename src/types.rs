//! 比对结果类型定义

use serde::{Deserialize, Serialize};

/// 字符级 diff 分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffTag {
    /// 两侧字符相同
    Same,
    /// 参考侧多出的字符
    Insert,
    /// 输入侧多出的字符
    Delete,
    /// 字符被替换
    Replace,
}

/// 字符级 diff 条目
///
/// 序列化为 `{"char":"a","type":"same"}`，前端按 type 着色渲染
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// 该位置的字符（same/delete 取自输入侧，insert/replace 取自参考侧）
    pub char: char,
    #[serde(rename = "type")]
    pub tag: DiffTag,
}

/// 逐音素打分标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkKind {
    /// 匹配（含模糊匹配）
    Same,
    /// 学习者常见替换（轻度扣分）
    Substitution,
    /// 念错（普通替换）
    Replace,
    /// 模型多出的音（通常在结尾）
    Delete,
    /// 缺少的参考音
    Insert,
}

/// 逐音素标记条目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhonemeMark {
    pub value: char,
    pub kind: MarkKind,
}

/// 发音比对结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// 模型输出按参考音节边界重新分段后的字符串
    pub aligned: String,
    /// 模糊字符编辑距离
    pub distance: usize,
    /// 是否接近（distance <= close_threshold）
    pub close: bool,
    /// 是否偏差过大，无法给出有意义的 diff
    pub too_far_off: bool,
    /// 逐音素标记（用于高亮渲染）
    pub marks: Vec<PhonemeMark>,
    /// 准确度分数 (0-100)
    pub score: u8,
    /// 处理耗时（微秒）
    pub elapsed_us: u64,
}
