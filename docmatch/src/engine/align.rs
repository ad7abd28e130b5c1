// docmatch/src/engine/align.rs
//
// Word-level alignment of two normalized texts.
//
// Matcher: Ratcliff/Obershelp "gestalt" matching.
//   1. Index the second sequence: word → positions
//   2. Find the longest matching block in a range, recurse left and right
//   3. Collapse adjacent blocks, derive equal/replace/insert/delete runs
//
// Autojunk: when the second sequence has ≥ 200 words, words occurring more
// than n/100 + 1 times are left out of the index. They can still be covered
// when a block is extended over equal neighbours. This keeps long documents
// dominated by stop-words near-linear.
//
// The matcher itself is order-sensitive (ties resolve to the earliest block
// in the first sequence; autojunk only looks at the second). `align` always
// feeds it a canonical ordering and mirrors the script back, so
// align(a, b) and align(b, a) agree on every score.

use std::collections::HashMap;

use crate::model::{AlignmentResult, Markup, OpKind, Opcode, SpanTag};

use super::round2;

/// Minimum length of the second sequence before popular words are dropped.
const AUTOJUNK_MIN_LEN: usize = 200;

pub fn align(text_a: &str, text_b: &str) -> AlignmentResult {
    let words_a: Vec<&str> = text_a.split_whitespace().collect();
    let words_b: Vec<&str> = text_b.split_whitespace().collect();

    let opcodes = opcodes(&words_a, &words_b);
    let (markup_a, markup_b) = render_markup(&words_a, &words_b, &opcodes);

    let matched: usize = opcodes
        .iter()
        .filter(|op| op.kind == OpKind::Equal)
        .map(|op| op.a.len())
        .sum();

    AlignmentResult {
        opcodes,
        markup_a,
        markup_b,
        lexical_similarity: ratio(matched, words_a.len() + words_b.len()),
    }
}

/// Edit script turning `a` into `b`.
pub fn opcodes(a: &[&str], b: &[&str]) -> Vec<Opcode> {
    if a == b {
        return if a.is_empty() {
            Vec::new()
        } else {
            vec![Opcode::new(OpKind::Equal, 0..a.len(), 0..b.len())]
        };
    }

    // Shorter sequence first, ties broken lexicographically.
    let swap = (b.len(), b) < (a.len(), a);
    if swap {
        Matcher::new(b, a).opcodes().iter().map(Opcode::mirrored).collect()
    } else {
        Matcher::new(a, b).opcodes()
    }
}

/// 2·M / T as a percentage. Two empty sequences count as identical.
fn ratio(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    round2((200.0 * matched as f64 / total as f64).clamp(0.0, 100.0))
}

fn render_markup(a: &[&str], b: &[&str], opcodes: &[Opcode]) -> (Markup, Markup) {
    let mut markup_a = Markup::default();
    let mut markup_b = Markup::default();

    for op in opcodes {
        let chunk_a = a[op.a.clone()].join(" ");
        let chunk_b = b[op.b.clone()].join(" ");
        match op.kind {
            OpKind::Equal => {
                markup_a.push(SpanTag::Match, chunk_a);
                markup_b.push(SpanTag::Match, chunk_b);
            }
            OpKind::Replace => {
                markup_a.push(SpanTag::Removed, chunk_a);
                markup_b.push(SpanTag::Changed, chunk_b);
            }
            OpKind::Insert => markup_b.push(SpanTag::Added, chunk_b),
            OpKind::Delete => markup_a.push(SpanTag::Removed, chunk_a),
        }
    }
    (markup_a, markup_b)
}

// ── Matcher ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Block {
    i:    usize,
    j:    usize,
    size: usize,
}

struct Matcher<'a> {
    a:   &'a [&'a str],
    b:   &'a [&'a str],
    b2j: HashMap<&'a str, Vec<usize>>,
}

impl<'a> Matcher<'a> {
    fn new(a: &'a [&'a str], b: &'a [&'a str]) -> Self {
        let mut b2j: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (j, word) in b.iter().enumerate() {
            b2j.entry(*word).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// Longest block with alo <= i < ahi and blo <= j < bhi.
    /// Ties resolve to the smallest i, then the smallest j.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (a, b) = (self.a, self.b);
        let mut best = Block { i: alo, j: blo, size: 0 };

        // j2len[j] = length of the match ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j > 0 { j2len.get(&(j - 1)).copied().unwrap_or(0) } else { 0 };
                    let k = prev + 1;
                    next.insert(j, k);
                    if k > best.size {
                        best = Block { i: i + 1 - k, j: j + 1 - k, size: k };
                    }
                }
            }
            j2len = next;
        }

        // Extend across words the index skipped (popular ones).
        while best.i > alo && best.j > blo && a[best.i - 1] == b[best.j - 1] {
            best.i -= 1;
            best.j -= 1;
            best.size += 1;
        }
        while best.i + best.size < ahi
            && best.j + best.size < bhi
            && a[best.i + best.size] == b[best.j + best.size]
        {
            best.size += 1;
        }
        best
    }

    /// Non-adjacent matching blocks in order, terminated by a zero-size
    /// sentinel at (len a, len b).
    fn matching_blocks(&self) -> Vec<Block> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut stack = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = stack.pop() {
            let m = self.longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            blocks.push(m);
            if alo < m.i && blo < m.j {
                stack.push((alo, m.i, blo, m.j));
            }
            if m.i + m.size < ahi && m.j + m.size < bhi {
                stack.push((m.i + m.size, ahi, m.j + m.size, bhi));
            }
        }
        blocks.sort();

        let mut collapsed: Vec<Block> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match collapsed.last_mut() {
                Some(last) if last.i + last.size == block.i && last.j + last.size == block.j => {
                    last.size += block.size;
                }
                _ => collapsed.push(block),
            }
        }
        collapsed.push(Block { i: la, j: lb, size: 0 });
        collapsed
    }

    fn opcodes(&self) -> Vec<Opcode> {
        let (mut i, mut j) = (0, 0);
        let mut ops = Vec::new();

        for block in self.matching_blocks() {
            let kind = match (i < block.i, j < block.j) {
                (true, true) => Some(OpKind::Replace),
                (true, false) => Some(OpKind::Delete),
                (false, true) => Some(OpKind::Insert),
                (false, false) => None,
            };
            if let Some(kind) = kind {
                ops.push(Opcode::new(kind, i..block.i, j..block.j));
            }
            i = block.i + block.size;
            j = block.j + block.size;
            if block.size > 0 {
                ops.push(Opcode::new(OpKind::Equal, block.i..i, block.j..j));
            }
        }
        ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Span;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn span(tag: SpanTag, text: &str) -> Span {
        Span { tag, text: text.to_string() }
    }

    #[test]
    fn single_replacement() {
        let r = align("a b c", "a x c");
        assert_eq!(
            r.opcodes,
            vec![
                Opcode::new(OpKind::Equal, 0..1, 0..1),
                Opcode::new(OpKind::Replace, 1..2, 1..2),
                Opcode::new(OpKind::Equal, 2..3, 2..3),
            ]
        );
        assert_eq!(
            r.markup_a.spans(),
            &[span(SpanTag::Match, "a"), span(SpanTag::Removed, "b"), span(SpanTag::Match, "c")]
        );
        assert_eq!(
            r.markup_b.spans(),
            &[span(SpanTag::Match, "a"), span(SpanTag::Changed, "x"), span(SpanTag::Match, "c")]
        );
        assert_eq!(r.lexical_similarity, 66.67);
    }

    #[test]
    fn deletion_only_marks_side_a() {
        let r = align("a b c", "a c");
        assert_eq!(
            r.opcodes,
            vec![
                Opcode::new(OpKind::Equal, 0..1, 0..1),
                Opcode::new(OpKind::Delete, 1..2, 1..1),
                Opcode::new(OpKind::Equal, 2..3, 1..2),
            ]
        );
        assert_eq!(
            r.markup_a.spans(),
            &[span(SpanTag::Match, "a"), span(SpanTag::Removed, "b"), span(SpanTag::Match, "c")]
        );
        assert_eq!(r.markup_b.spans(), &[span(SpanTag::Match, "a"), span(SpanTag::Match, "c")]);
        assert_eq!(r.lexical_similarity, 80.0);
    }

    #[test]
    fn insertion_only_marks_side_b() {
        let r = align("one three", "one two three");
        assert_eq!(r.markup_a.spans(), &[span(SpanTag::Match, "one"), span(SpanTag::Match, "three")]);
        assert_eq!(
            r.markup_b.spans(),
            &[span(SpanTag::Match, "one"), span(SpanTag::Added, "two"), span(SpanTag::Match, "three")]
        );
    }

    #[test]
    fn equal_runs_rejoin_words() {
        let r = align("the quick brown fox jumps", "the quick brown cat jumps");
        assert_eq!(r.markup_a.spans()[0], span(SpanTag::Match, "the quick brown"));
        assert_eq!(r.lexical_similarity, 80.0);
    }

    #[test]
    fn both_empty_is_degenerate_identical() {
        let r = align("", "   ");
        assert!(r.opcodes.is_empty());
        assert_eq!(r.lexical_similarity, 100.0);
    }

    #[test]
    fn one_side_empty_scores_zero() {
        let r = align("some words here", "");
        assert_eq!(r.opcodes, vec![Opcode::new(OpKind::Delete, 0..3, 0..0)]);
        assert_eq!(r.lexical_similarity, 0.0);
    }

    #[test]
    fn identical_fifty_words() {
        let text: String = (0..50).map(|i| format!("word{} ", i % 7)).collect();
        let r = align(&text, &text);
        assert_eq!(r.lexical_similarity, 100.0);
        assert_eq!(r.opcodes.len(), 1);
    }

    #[test]
    fn popular_words_still_matched_by_extension() {
        let mut a: Vec<String> = Vec::new();
        for i in 0..150 {
            a.push(format!("w{}", i));
            a.push("the".to_string());
        }
        let mut b = a.clone();
        b[100] = "zzz".to_string();

        let r = align(&a.join(" "), &b.join(" "));
        assert_eq!(r.lexical_similarity, 99.67);
        assert_eq!(r.opcodes.iter().filter(|o| o.kind == OpKind::Replace).count(), 1);
    }

    #[test]
    fn repeated_popular_word_identical_scores_full() {
        let text = vec!["same"; 400].join(" ");
        assert_eq!(align(&text, &text).lexical_similarity, 100.0);
    }

    #[test]
    fn swapped_arguments_keep_the_same_runs() {
        let texts = |m: &Markup| m.spans().iter().map(|s| s.text.clone()).collect::<Vec<_>>();
        let ab = align("a b c d", "a c d e");
        let ba = align("a c d e", "a b c d");
        assert_eq!(texts(&ab.markup_a), texts(&ba.markup_b));
        assert_eq!(texts(&ab.markup_b), texts(&ba.markup_a));
        // Direction flips: "b" only exists on the a-side of `ab`.
        assert_eq!(ab.markup_a.spans()[1], span(SpanTag::Removed, "b"));
        assert_eq!(ba.markup_b.spans()[1], span(SpanTag::Added, "b"));
    }

    fn words() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d", "e"]), 0..40)
            .prop_map(|w| w.join(" "))
    }

    proptest! {
        #[test]
        fn lexical_similarity_is_symmetric(a in words(), b in words()) {
            prop_assert_eq!(align(&a, &b).lexical_similarity, align(&b, &a).lexical_similarity);
        }

        #[test]
        fn self_alignment_is_full(a in words()) {
            prop_assume!(!a.is_empty());
            prop_assert_eq!(align(&a, &a).lexical_similarity, 100.0);
        }

        #[test]
        fn score_in_range_and_runs_cover_both_sides(a in words(), b in words()) {
            let r = align(&a, &b);
            prop_assert!((0.0..=100.0).contains(&r.lexical_similarity));
            let la = a.split_whitespace().count();
            let lb = b.split_whitespace().count();
            prop_assert_eq!(r.opcodes.iter().map(|o| o.a.len()).sum::<usize>(), la);
            prop_assert_eq!(r.opcodes.iter().map(|o| o.b.len()).sum::<usize>(), lb);
        }
    }

    /// 200+ words: a few common ones that autojunk drops, plus rare ones it keeps.
    fn long_words() -> impl Strategy<Value = String> {
        let word = prop_oneof![
            4 => prop::sample::select(vec!["the", "of", "and", "to", "in"]).prop_map(String::from),
            1 => (0u32..400).prop_map(|n| format!("u{}", n)),
        ];
        prop::collection::vec(word, AUTOJUNK_MIN_LEN..AUTOJUNK_MIN_LEN + 120)
            .prop_map(|w| w.join(" "))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn long_texts_are_symmetric(a in long_words(), b in long_words()) {
            prop_assert_eq!(align(&a, &b).lexical_similarity, align(&b, &a).lexical_similarity);
        }

        #[test]
        fn long_texts_runs_cover_both_sides(a in long_words(), b in long_words()) {
            let r = align(&a, &b);
            prop_assert!((0.0..=100.0).contains(&r.lexical_similarity));
            prop_assert_eq!(r.opcodes.iter().map(|o| o.a.len()).sum::<usize>(), a.split_whitespace().count());
            prop_assert_eq!(r.opcodes.iter().map(|o| o.b.len()).sum::<usize>(), b.split_whitespace().count());
        }

        #[test]
        fn long_text_with_appended_tail_keeps_most_words(a in long_words(), tail in words()) {
            let b = format!("{} {}", a, tail);
            prop_assume!(a.split_whitespace().count() != b.split_whitespace().count());
            let la = a.split_whitespace().count() as f64;
            let lb = b.split_whitespace().count() as f64;
            prop_assert!(align(&a, &b).lexical_similarity > 0.0);
            prop_assert!(align(&a, &b).lexical_similarity <= 100.0 * 2.0 * la / (la + lb) + 0.01);
        }
    }
}
