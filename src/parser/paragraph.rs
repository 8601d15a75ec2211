//! Paragraph Rewriter Module
//!
//! WordprocessingML（`word/document.xml`など）を段落単位で書き換えるモジュール。
//!
//! Wordは1つの`{{placeholder}}`を複数のラン（`<w:r>`）に分割して保存することが多いため、
//! 段落内のすべての`<w:t>`のテキストを連結した文字列に対して置換位置を決定し、
//! 結果を元のテキスト要素に書き戻します。

use std::ops::Range;

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::DocGenError;

const PARAGRAPH: &[u8] = b"w:p";
const TEXT: &[u8] = b"w:t";

/// 連結テキスト上の置換指示
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Replacement {
    /// 連結テキスト上のバイト範囲
    pub range: Range<usize>,
    /// 置換後の文字列（エスケープ前）
    pub value: String,
}

/// 段落内の1つのテキスト要素
#[derive(Debug)]
struct TextNode {
    /// テキストイベントの位置
    event_index: usize,
    /// 対応する`<w:t>`開始タグの位置
    start_index: usize,
    /// アンエスケープ済みのテキスト
    text: String,
}

fn xml_error<E: std::fmt::Display>(e: E) -> DocGenError {
    DocGenError::Xml(e.to_string())
}

/// XMLパートのすべての段落を走査し、必要に応じて書き換える
///
/// # 引数
///
/// * `xml` - パートのXMLバイト列
/// * `on_paragraph` - 段落の連結テキストを受け取り、置換指示を返すクロージャ
///   （範囲は昇順かつ重複なし）
///
/// # 戻り値
///
/// 書き換え後のXMLバイト列。置換がない段落は元のイベントのまま出力されます。
pub(crate) fn rewrite_paragraphs<F>(xml: &[u8], mut on_paragraph: F) -> Result<Vec<u8>, DocGenError>
where
    F: FnMut(&str) -> Vec<Replacement>,
{
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));

    // 入れ子の段落（テキストボックス）に対応するため、開いている段落ごとにバッファを持つ
    let mut open_paragraphs: Vec<Vec<Event<'static>>> = Vec::new();
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(xml_error)?.into_owned();
        buf.clear();

        let is_paragraph_start = matches!(&event, Event::Start(e) if e.name().as_ref() == PARAGRAPH);
        let is_paragraph_end = matches!(&event, Event::End(e) if e.name().as_ref() == PARAGRAPH);

        if matches!(event, Event::Eof) {
            break;
        }

        if is_paragraph_start {
            open_paragraphs.push(vec![event]);
            continue;
        }

        if is_paragraph_end {
            if let Some(mut events) = open_paragraphs.pop() {
                events.push(event);
                let events = rewrite_paragraph(events, &mut on_paragraph)?;
                match open_paragraphs.last_mut() {
                    Some(parent) => parent.extend(events),
                    None => {
                        for e in events {
                            writer.write_event(e).map_err(xml_error)?;
                        }
                    }
                }
                continue;
            }
        }

        match open_paragraphs.last_mut() {
            Some(events) => events.push(event),
            None => writer.write_event(event).map_err(xml_error)?,
        }
    }

    // 閉じられていない段落はそのまま出力
    for events in open_paragraphs {
        for e in events {
            writer.write_event(e).map_err(xml_error)?;
        }
    }

    Ok(writer.into_inner())
}

/// 1つの段落（開始タグから終了タグまでのイベント列）を書き換える
fn rewrite_paragraph<F>(
    mut events: Vec<Event<'static>>,
    on_paragraph: &mut F,
) -> Result<Vec<Event<'static>>, DocGenError>
where
    F: FnMut(&str) -> Vec<Replacement>,
{
    let nodes = collect_text_nodes(&events)?;
    let full_text: String = nodes.iter().map(|n| n.text.as_str()).collect();

    let replacements = on_paragraph(&full_text);
    if replacements.is_empty() {
        return Ok(events);
    }

    let mut offset = 0;
    for node in &nodes {
        let span = offset..offset + node.text.len();
        offset = span.end;

        let new_text = splice_node(&full_text, span, &replacements);
        if new_text == node.text {
            continue;
        }

        events[node.event_index] = Event::Text(BytesText::new(&new_text).into_owned());
        if let Event::Start(start) = &events[node.start_index] {
            if let Some(preserved) = with_space_preserve(start) {
                events[node.start_index] = Event::Start(preserved);
            }
        }
    }

    Ok(events)
}

/// 段落直下（入れ子の段落を除く）の`<w:t>`テキストを収集
fn collect_text_nodes(events: &[Event<'static>]) -> Result<Vec<TextNode>, DocGenError> {
    let mut nodes = Vec::new();
    let mut nested_depth = 0usize;
    let mut open_text: Option<usize> = None;

    // 先頭と末尾は段落自身の開始・終了タグ
    let inner = events.len().saturating_sub(1);
    for (index, event) in events.iter().enumerate().take(inner).skip(1) {
        match event {
            Event::Start(e) if e.name().as_ref() == PARAGRAPH => nested_depth += 1,
            Event::End(e) if e.name().as_ref() == PARAGRAPH => {
                nested_depth = nested_depth.saturating_sub(1)
            }
            Event::Start(e) if e.name().as_ref() == TEXT && nested_depth == 0 => {
                open_text = Some(index)
            }
            Event::End(e) if e.name().as_ref() == TEXT => open_text = None,
            Event::Text(t) if nested_depth == 0 => {
                if let Some(start_index) = open_text {
                    nodes.push(TextNode {
                        event_index: index,
                        start_index,
                        text: t.unescape().map_err(xml_error)?.into_owned(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(nodes)
}

/// 1つのテキスト要素が担当する範囲`span`について、置換後の文字列を組み立てる
///
/// 置換値はプレースホルダーが始まる要素に挿入され、後続の要素にかかる部分は削除されます。
fn splice_node(full_text: &str, span: Range<usize>, replacements: &[Replacement]) -> String {
    let mut out = String::new();
    let mut pos = span.start;

    for rep in replacements {
        let starts_here = span.contains(&rep.range.start);
        let overlaps = rep.range.start < span.end && rep.range.end > span.start;
        if !overlaps {
            continue;
        }

        if starts_here {
            if rep.range.start > pos {
                out.push_str(&full_text[pos..rep.range.start]);
            }
            out.push_str(&rep.value);
        }
        pos = pos.max(rep.range.end.min(span.end));
    }

    if pos < span.end {
        out.push_str(&full_text[pos..span.end]);
    }
    out
}

/// `xml:space="preserve"`が未指定なら付加した開始タグを返す
fn with_space_preserve(start: &BytesStart<'static>) -> Option<BytesStart<'static>> {
    let has_space = start
        .attributes()
        .flatten()
        .any(|a| a.key.as_ref() == b"xml:space");
    if has_space {
        return None;
    }

    let mut preserved = start.clone();
    preserved.push_attribute(("xml:space", "preserve"));
    Some(preserved)
}
