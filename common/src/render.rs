//! HTML出力
//!
//! ハイライトされたセグメントは赤・太字で表示する（Web UIと同じスタイル）。

use crate::annotator::DisplaySegment;

/// ハイライトのインラインスタイル
pub const HIGHLIGHT_STYLE: &str = "color: red; font-weight: bold";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// セグメント列を `<span>` の並びに変換
pub fn render_html_fragment(segments: &[DisplaySegment]) -> String {
    segments
        .iter()
        .map(|seg| {
            if seg.highlighted {
                format!(r#"<span style="{}">{}</span>"#, HIGHLIGHT_STYLE, escape_html(&seg.text))
            } else {
                format!("<span>{}</span>", escape_html(&seg.text))
            }
        })
        .collect()
}

/// 単体で開けるHTMLページ
pub fn render_html_page(title: &str, sections: &[(String, Vec<DisplaySegment>)]) -> String {
    let mut body = String::new();
    for (heading, segments) in sections {
        body.push_str(&format!(
            "<section>\n<h2>{}</h2>\n<p style=\"white-space: pre-wrap\">{}</p>\n</section>\n",
            escape_html(heading),
            render_html_fragment(segments)
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n{body}</body>\n</html>\n",
        title = escape_html(title),
        body = body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a & 'b'>"), "&lt;a &amp; &#39;b&#39;&gt;");
        assert_eq!(escape_html("ශ්‍රී"), "ශ්‍රී");
    }

    #[test]
    fn test_render_fragment() {
        let segments = vec![DisplaySegment::plain('<'), DisplaySegment::highlighted("අ")];
        let html = render_html_fragment(&segments);
        assert_eq!(
            html,
            r#"<span>&lt;</span><span style="color: red; font-weight: bold">අ</span>"#
        );
    }

    #[test]
    fn test_render_page() {
        let sections = vec![("leaf.png".to_string(), vec![DisplaySegment::plain('x')])];
        let html = render_html_page("Palm-leaf Manuscript OCR", &sections);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Palm-leaf Manuscript OCR</h1>"));
        assert!(html.contains("<h2>leaf.png</h2>"));
        assert!(html.contains("<span>x</span>"));
    }
}
