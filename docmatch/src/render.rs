// docmatch/src/render.rs
//
// Markup → display formats.

use crate::model::{Markup, SpanTag};

impl Markup {
    /// `<span class='diff-{tag}'>…</span>` per span, joined by spaces.
    pub fn to_html(&self) -> String {
        self.spans()
            .iter()
            .map(|s| {
                format!(
                    "<span class='diff-{}'>{}</span>",
                    s.tag.as_str(),
                    html_escape::encode_text(&s.text)
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Text of the `match` spans in document order, for exports.
    pub fn matched_fragments(&self) -> Vec<&str> {
        self.spans()
            .iter()
            .filter(|s| s.tag == SpanTag::Match)
            .map(|s| s.text.as_str())
            .collect()
    }

    /// Share of words tagged `match`, as a percentage of this side.
    pub fn matched_share(&self) -> f64 {
        let (mut matched, mut total) = (0usize, 0usize);
        for span in self.spans() {
            let n = span.text.split_whitespace().count();
            total += n;
            if span.tag == SpanTag::Match {
                matched += n;
            }
        }
        if total == 0 {
            return 0.0;
        }
        crate::engine::round2(100.0 * matched as f64 / total as f64)
    }
}
