//! Segmenter Adapter - 朗读单元切分策略

use crate::application::ports::TextSegmenterPort;
use crate::domain::{segment_text, SegmentConfig};

/// 按句子/分句切分
#[derive(Debug, Clone, Default)]
pub struct SentenceSegmenter {
    config: SegmentConfig,
}

impl SentenceSegmenter {
    pub fn new(config: SegmentConfig) -> Self {
        Self { config }
    }
}

impl TextSegmenterPort for SentenceSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        segment_text(text, &self.config)
    }

    fn name(&self) -> &'static str {
        "sentence"
    }
}

/// 整段文本作为一个单元
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeTextSegmenter;

impl TextSegmenterPort for WholeTextSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            Vec::new()
        } else {
            vec![text.to_string()]
        }
    }

    fn name(&self) -> &'static str {
        "whole"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_segmenter_uses_config() {
        let segmenter = SentenceSegmenter::new(SegmentConfig { min_chars: 0 });
        assert_eq!(segmenter.segment("One. Two."), vec!["One.", "Two."]);
    }

    #[test]
    fn test_whole_text_segmenter() {
        let segmenter = WholeTextSegmenter;
        assert_eq!(segmenter.segment(" One. Two. "), vec!["One. Two."]);
        assert!(segmenter.segment("  ").is_empty());
    }
}
