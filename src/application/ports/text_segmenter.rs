//! Text Segmenter Port - 朗读单元切分抽象
//!
//! 单元的切分策略由外部决定，控制器只依赖此接口，具体实现在 infrastructure/adapters 层

/// Text Segmenter Port
pub trait TextSegmenterPort: Send + Sync {
    /// 将选中文本切分为朗读单元，空文本返回空列表
    fn segment(&self, text: &str) -> Vec<String>;

    /// 策略名称（用于日志）
    fn name(&self) -> &'static str;
}
