use tracing::debug;

use crate::text::font::{SizedFont, TextFont};

/// How auto-fit shrinks a block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitPolicy {
    /// Auto-fit never resolves below this size
    pub min_size: f32,

    /// Amount removed from the size on every attempt
    pub step: f32,
}

impl Default for FitPolicy {
    fn default() -> Self {
        Self {
            min_size: 10.0,
            step: 2.0,
        }
    }
}

/// Result of auto-fitting a block of text
#[derive(Debug, Clone)]
pub struct FittedText {
    pub font: SizedFont,
    pub lines: Vec<String>,
}

impl FittedText {
    /// Sum of the rendered heights of every line
    pub fn total_height(&self) -> f32 {
        total_height(&self.font, &self.lines)
    }
}

/// Greedy word wrap.
///
/// A word joins the current line if the joined line still fits in
/// `max_width`, otherwise it starts a new line. A single word wider than
/// `max_width` ends up alone on its own line. Empty or whitespace-only
/// input produces no lines.
pub fn wrap(text: &str, font: &SizedFont, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{} {}", current, word);
        if font.width(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn total_height(font: &SizedFont, lines: &[String]) -> f32 {
    lines.iter().map(|line| font.line_height(line)).sum()
}

/// Shrink `font` from `start_size` until the wrapped text fits `max_height`.
///
/// Sizes tried are `start_size`, `start_size - step`, ... and the last
/// attempt is clamped to `policy.min_size`, so the floor itself is always
/// tried. When even the floor does not fit, or the policy cannot shrink
/// (a step that is zero, negative or NaN), the last attempt is returned
/// anyway.
pub fn auto_fit(
    text: &str,
    max_width: f32,
    max_height: f32,
    start_size: f32,
    font: &TextFont,
    policy: &FitPolicy,
) -> FittedText {
    let mut size = start_size.max(policy.min_size);

    loop {
        let sized = font.at_size(size);
        let lines = wrap(text, &sized, max_width);
        let height = total_height(&sized, &lines);
        let next = (size - policy.step).max(policy.min_size);

        if height <= max_height || !(policy.step > 0.0) || !(size > policy.min_size) {
            debug!(
                "Auto-fit resolved size {} ({} lines, {:.0}px of {:.0}px)",
                size,
                lines.len(),
                height,
                max_height
            );
            return FittedText { font: sized, lines };
        }
        size = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn builtin(size: f32) -> SizedFont {
        TextFont::Builtin.at_size(size)
    }

    #[test]
    fn test_empty_input_yields_no_lines() {
        assert!(wrap("", &builtin(10.0), 100.0).is_empty());
        assert!(wrap("   \n\t ", &builtin(10.0), 100.0).is_empty());
    }

    #[test]
    fn test_greedy_wrap() {
        // 6px per char at size 10: "aaa bbb" is 42px, "aaa bbb ccc" is 66px
        let lines = wrap("aaa bbb ccc ddd", &builtin(10.0), 50.0);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn test_long_word_gets_own_line() {
        let lines = wrap("a supercalifragilistic b", &builtin(10.0), 30.0);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);

        let lines = wrap("supercalifragilistic", &builtin(10.0), 30.0);
        assert_eq!(lines, vec!["supercalifragilistic"]);
    }

    #[test]
    fn test_wrapped_lines_fit_bound() {
        let mut rng = StdRng::seed_from_u64(7);
        let font = builtin(12.0);
        let max_width = 150.0;

        for _ in 0..200 {
            let words: Vec<String> = (0..rng.gen_range(0..30))
                .map(|_| {
                    let len = rng.gen_range(1..25);
                    (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
                })
                .collect();
            let text = words.join(" ");

            for line in wrap(&text, &font, max_width) {
                let single_word = !line.contains(' ');
                assert!(
                    font.width(&line) <= max_width || single_word,
                    "line {:?} overflows",
                    line
                );
            }
        }
    }

    #[test]
    fn test_wrap_preserves_words() {
        let text = "In the name of Allah the Most Compassionate the Most Merciful";
        let lines = wrap(text, &builtin(20.0), 200.0);
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_auto_fit_returns_start_when_it_fits() {
        let fitted = auto_fit("short", 1000.0, 200.0, 60.0, &TextFont::Builtin, &FitPolicy::default());
        assert_eq!(fitted.font.size(), 60.0);
        assert_eq!(fitted.lines, vec!["short"]);
    }

    #[test]
    fn test_auto_fit_shrinks_until_fit() {
        let text = "one two three four five six seven eight nine ten";
        let fitted = auto_fit(text, 200.0, 60.0, 60.0, &TextFont::Builtin, &FitPolicy::default());

        assert!(fitted.font.size() < 60.0);
        assert!(fitted.total_height() <= 60.0);
    }

    #[test]
    fn test_auto_fit_respects_floor() {
        let policy = FitPolicy::default();
        let text = "word ".repeat(400);

        for start in [9.0, 10.0, 11.0, 36.0, 60.0, 66.7, 100.0] {
            let fitted = auto_fit(&text, 100.0, 5.0, start, &TextFont::Builtin, &policy);

            // Never fits, so every size down to the floor is tried
            assert_eq!(fitted.font.size(), policy.min_size, "start {}", start);
            assert!(!fitted.lines.is_empty());
        }
    }

    #[test]
    fn test_auto_fit_tries_floor_off_the_step_grid() {
        // One word per line: 4 lines fit 20px only at size 5, and 14 - 2k skips it
        let policy = FitPolicy { min_size: 5.0, step: 2.0 };
        let fitted = auto_fit("a b c d", 1.0, 20.0, 14.0, &TextFont::Builtin, &policy);

        assert_eq!(fitted.font.size(), 5.0);
        assert!(fitted.total_height() <= 20.0);
    }

    #[test]
    fn test_auto_fit_stops_when_policy_cannot_shrink() {
        let text = "word word word word";

        for step in [0.0, -2.0, f32::NAN] {
            let policy = FitPolicy { min_size: 10.0, step };
            let fitted = auto_fit(text, 30.0, 1.0, 40.0, &TextFont::Builtin, &policy);
            assert_eq!(fitted.font.size(), 40.0, "step {}", step);
        }

        let policy = FitPolicy { min_size: f32::NAN, step: 2.0 };
        let fitted = auto_fit(text, 30.0, 1.0, 40.0, &TextFont::Builtin, &policy);
        assert_eq!(fitted.font.size(), 40.0);
    }

    #[test]
    fn test_auto_fit_is_monotonic_in_height() {
        let text = "a b c d e f g h i j k l m n o p q r s t u v w x y z";
        let policy = FitPolicy::default();

        let roomy = auto_fit(text, 300.0, 400.0, 80.0, &TextFont::Builtin, &policy);
        let tight = auto_fit(text, 300.0, 100.0, 80.0, &TextFont::Builtin, &policy);
        assert!(tight.font.size() <= roomy.font.size());
    }
}
