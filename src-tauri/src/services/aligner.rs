//! # 双语分段对齐
//!
//! 将 assistant 回复的英文正文与中文翻译切分成句子，再按字数阈值重组为展示块，
//! 前端逐块展示"英文 + 对应翻译"，实现渐进式阅读。
//!
//! ## 切分规则
//! - 英文句子：一个非空白字符 + 至少一个非换行字符（惰性）+ `.`/`?`/`!`，
//!   且其后紧跟空白或到达文本末尾
//! - 中文句子：一串非句末标点字符 + `。`/`？`/`！`
//! - 两侧都没有匹配时，整段文本视为一句
//!
//! ## 对齐边界
//! 英文第 i 句与中文第 i 句直接配对，中文句子数不足时配空串。
//! 句子数量不一致时不会重新对齐，这是已知的正确性边界。

use crate::models::display::DisplayChunk;

const EN_TERMINALS: [char; 3] = ['.', '?', '!'];
const ZH_TERMINALS: [char; 3] = ['。', '？', '！'];

/// 按空白统计字数
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// 切分英文句子
///
/// 对每个起点尝试匹配：起点为非空白字符，之后至少一个字符，中途遇到换行则该起点失败；
/// 遇到句末标点且下一个字符为空白（或文本结束）时匹配成功，从标点之后继续扫描。
///
/// 只有匹配到的句子参与配对：没有句末标点的行（如 Markdown 标题）和末尾残句都不计入，
/// 否则会让后续所有句子与翻译错位。一个匹配都没有时整段视为一句。
fn split_english(content: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = content.char_indices().collect();
    let mut sentences = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i].1.is_whitespace() {
            i += 1;
            continue;
        }

        let mut matched_end = None;
        let mut j = i + 1;
        while j < chars.len() {
            let ch = chars[j].1;
            if ch == '\n' {
                break;
            }
            if j >= i + 2 && EN_TERMINALS.contains(&ch) {
                let boundary = chars.get(j + 1).is_none_or(|(_, next)| next.is_whitespace());
                if boundary {
                    matched_end = Some(j);
                    break;
                }
            }
            j += 1;
        }

        match matched_end {
            Some(end) => {
                let start_byte = chars[i].0;
                let end_byte = chars[end].0 + chars[end].1.len_utf8();
                sentences.push(&content[start_byte..end_byte]);
                i = end + 1;
            }
            // 扫描到文本末尾仍无句末标点，后续起点也不可能匹配
            None if j >= chars.len() => break,
            None => i += 1,
        }
    }

    if sentences.is_empty() {
        return vec![content];
    }
    sentences
}

/// 切分中文句子
///
/// 每句为一串非句末标点字符加一个句末标点；连续标点中只有第一个能收尾，
/// 其余被下一句吸收。末尾没有标点的残句不计入，一个完整句子都没有时整段视为一句。
fn split_chinese(translation: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, ch) in translation.char_indices() {
        if ZH_TERMINALS.contains(&ch) {
            if let Some(s) = start.take() {
                sentences.push(&translation[s..idx + ch.len_utf8()]);
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }

    if sentences.is_empty() {
        return vec![translation];
    }
    sentences
}

/// 分段缓冲区
#[derive(Default)]
struct ChunkBuffer {
    english: Vec<String>,
    chinese: Vec<String>,
    words: usize,
}

impl ChunkBuffer {
    fn push(&mut self, english: &str, chinese: &str, words: usize) {
        self.english.push(english.to_string());
        if !chinese.is_empty() {
            self.chinese.push(chinese.to_string());
        }
        self.words += words;
    }

    fn flush_into(&mut self, chunks: &mut Vec<DisplayChunk>) {
        if self.english.is_empty() {
            return;
        }
        chunks.push(DisplayChunk {
            english_text: self.english.join(" "),
            chinese_text: self.chinese.join(" "),
        });
        *self = Self::default();
    }
}

/// 将正文与翻译切分为双语展示块
///
/// # 参数
/// - `content` - 英文正文
/// - `translation` - 中文翻译；为 `None` 或空串时不分段
/// - `threshold` - 字数阈值（默认配置为 8）
///
/// # 返回值
/// 展示块列表。没有翻译时返回单个 `{content, ""}` 块。
/// 结果只有一块时，渲染层应回退为"整段正文 + 单个翻译块"。
pub fn segment(content: &str, translation: Option<&str>, threshold: usize) -> Vec<DisplayChunk> {
    let translation = match translation {
        Some(t) if !t.is_empty() => t,
        _ => {
            return vec![DisplayChunk {
                english_text: content.to_string(),
                chinese_text: String::new(),
            }];
        }
    };

    let english_sentences = split_english(content);
    let chinese_sentences = split_chinese(translation);

    let mut chunks = Vec::new();
    let mut buffer = ChunkBuffer::default();

    for (index, sentence) in english_sentences.iter().enumerate() {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let words = word_count(sentence);
        let chinese = chinese_sentences.get(index).map(|s| s.trim()).unwrap_or("");

        if words > threshold {
            buffer.flush_into(&mut chunks);
            chunks.push(DisplayChunk {
                english_text: sentence.to_string(),
                chinese_text: chinese.to_string(),
            });
        } else {
            buffer.push(sentence, chinese, words);
            if buffer.words > threshold {
                buffer.flush_into(&mut chunks);
            }
        }
    }
    buffer.flush_into(&mut chunks);

    if chunks.is_empty() {
        // 正文为空白时没有任何句子，保持"至少一块"的输出约定
        chunks.push(DisplayChunk {
            english_text: content.to_string(),
            chinese_text: translation.to_string(),
        });
    }
    chunks
}
