//! 文本分割器
//!
//! 将选中文本切分为朗读单元（句子/分句），支持最小字符数限制

/// 默认最小字符数限制
/// 片段未达到此长度时，弱分隔符不会触发分割，短句也会与后续句子合并
pub const DEFAULT_MIN_CHARS: usize = 12;

/// 文本分割配置
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// 最小字符数限制（用于合并短句）
    pub min_chars: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_CHARS,
        }
    }
}

/// 句末标点，后面跟空白或行尾时总是分割
#[inline]
fn is_strong_delimiter(ch: char) -> bool {
    matches!(ch, '.' | '?' | '!' | '…' | '。' | '？' | '！')
}

/// 分句标点，达到最小字符数时才分割
#[inline]
fn is_weak_delimiter(ch: char) -> bool {
    matches!(ch, ',' | ';' | ':' | '，' | '；' | '：')
}

/// 紧跟在句末标点后、仍属于当前句子的收尾字符
#[inline]
fn is_closer(ch: char) -> bool {
    matches!(ch, '"' | '\'' | ')' | ']' | '\u{201D}' | '\u{2019}')
}

/// 片段是否只包含引号/括号或空白
#[inline]
fn is_trivial_segment(s: &str) -> bool {
    s.chars().all(|c| is_closer(c) || matches!(c, '\u{201C}' | '\u{2018}' | '(' | ' ' | '\t'))
}

/// 分割单行文本：先按标点切开，再合并过短的片段
fn split_line(text: &str, config: &SegmentConfig) -> Vec<String> {
    let raw_segments = split_by_delimiters(text, config);
    merge_until_min_chars(raw_segments, config.min_chars)
}

/// 按分隔符分割（不做合并）
///
/// 标点后必须是空白或行尾才算边界，避免切开 `3.14`、`e.g.x` 这类写法
fn split_by_delimiters(text: &str, config: &SegmentConfig) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut char_count = 0;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        char_count += 1;

        let boundary_candidate = if is_strong_delimiter(ch) {
            // 吞掉连续的句末标点和收尾引号，如 `?!`、`..."`
            while let Some(&next) = chars.peek() {
                if is_strong_delimiter(next) || is_closer(next) {
                    current.push(next);
                    char_count += 1;
                    chars.next();
                } else {
                    break;
                }
            }
            true
        } else {
            is_weak_delimiter(ch) && char_count >= config.min_chars
        };

        let at_boundary = match chars.peek() {
            None => true,
            Some(next) => next.is_whitespace(),
        };

        if boundary_candidate && at_boundary {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                segments.push(trimmed.to_string());
            }
            current.clear();
            char_count = 0;
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }

    segments
}

/// 合并短片段直到满足 min_chars，片段之间以空格连接
fn merge_until_min_chars(segments: Vec<String>, min_chars: usize) -> Vec<String> {
    if segments.is_empty() {
        return segments;
    }

    let mut result: Vec<String> = Vec::new();
    let mut buffer = String::new();

    for seg in segments {
        if !buffer.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(&seg);

        if buffer.chars().count() >= min_chars {
            result.push(std::mem::take(&mut buffer));
        }
    }

    if !buffer.is_empty() {
        if let Some(last) = result.last_mut() {
            last.push(' ');
            last.push_str(&buffer);
        } else {
            result.push(buffer);
        }
    }

    result
}

/// 对文本进行分段
///
/// 分段策略：
/// 1. 按行分割，跨行不合并
/// 2. 每行按标点分割（带最小字符数限制，行内合并短句）
/// 3. 只有引号/括号的片段并入前一个片段
pub fn segment_text(text: &str, config: &SegmentConfig) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();

    let lines = text.lines().map(str::trim).filter(|s| !s.is_empty());

    for line in lines {
        for sentence in split_line(line, config) {
            let trimmed = sentence.trim();
            if trimmed.is_empty() {
                continue;
            }

            if is_trivial_segment(trimmed) {
                if let Some(last) = segments.last_mut() {
                    last.push_str(trimmed);
                }
            } else {
                segments.push(trimmed.to_string());
            }
        }
    }

    segments
}
