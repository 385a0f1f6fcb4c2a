//! Static glyph-width tables for the two base fonts the layout uses.
//!
//! Widths come from the standard Helvetica AFM files (units of 1/1000 em) and
//! cover ASCII 0x20..=0x7E. Index = (char as usize) - 32. Anything outside
//! that range falls back to `average_char_width`; since strings are emitted in
//! WinAnsi the fallback only has to be close, not exact.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    /// PDF base font name (one of the standard 14, so nothing is embedded).
    pub fn base_font(&self) -> &'static str {
        match self {
            FontFace::Regular => "Helvetica",
            FontFace::Bold => "Helvetica-Bold",
        }
    }

    /// Name under which the font is registered in the page resources.
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
        }
    }
}

/// Width table for one face. `widths[i]` = width of ASCII `(i + 32)` in 1/1000 em.
///
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [u16; 95],
    pub average_char_width: u16,
    pub space_width: u16,
}

impl FontMetricTable {
    /// Width of `s` in points at `size_pt`.
    pub fn measure_str(&self, s: &str, size_pt: f32) -> f32 {
        let units: u32 = s
            .chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32] as u32
                } else {
                    self.average_char_width as u32
                }
            })
            .sum();
        units as f32 * size_pt / 1000.0
    }

    /// Greedy word-wrap of `text` into lines no wider than `max_width` points.
    ///
    /// A single word wider than the line is kept whole on its own line.
    pub fn wrap_lines(&self, text: &str, size_pt: f32, max_width: f32) -> Vec<String> {
        self.wrap_lines_hanging(text, size_pt, max_width, max_width)
    }

    /// Like `wrap_lines`, but the first line may have a different width
    /// (e.g. when it follows an inline label).
    pub fn wrap_lines_hanging(
        &self,
        text: &str,
        size_pt: f32,
        first_width: f32,
        rest_width: f32,
    ) -> Vec<String> {
        let space_w = self.space_width as f32 * size_pt / 1000.0;
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in text.split_whitespace() {
            let word_w = self.measure_str(word, size_pt);
            let max_width = if lines.is_empty() {
                first_width
            } else {
                rest_width
            };

            if !current.is_empty() && current_width + space_w + word_w > max_width {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_width = word_w;
            } else {
                if !current.is_empty() {
                    current.push(' ');
                    current_width += space_w;
                }
                current.push_str(word);
                current_width += word_w;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    average_char_width: 556,
    space_width: 278,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    average_char_width: 611,
    space_width: 278,
};

pub fn get_metrics(face: FontFace) -> &'static FontMetricTable {
    match face {
        FontFace::Regular => &HELVETICA_TABLE,
        FontFace::Bold => &HELVETICA_BOLD_TABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        assert_eq!(get_metrics(FontFace::Regular).measure_str("", 10.0), 0.0);
    }

    #[test]
    fn test_measure_str_scales_with_size() {
        let metrics = get_metrics(FontFace::Regular);
        // "Rust" = R(722) + u(556) + s(500) + t(278) = 2056 units
        let at_10 = metrics.measure_str("Rust", 10.0);
        assert!((at_10 - 20.56).abs() < 1e-3, "got {at_10}");
        let at_20 = metrics.measure_str("Rust", 20.0);
        assert!((at_20 - 2.0 * at_10).abs() < 1e-3);
    }

    #[test]
    fn test_measure_str_non_ascii_falls_back() {
        let metrics = get_metrics(FontFace::Regular);
        let width = metrics.measure_str("é", 1000.0);
        assert!((width - metrics.average_char_width as f32).abs() < 1e-3);
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = "Distributed systems engineer";
        assert!(
            get_metrics(FontFace::Bold).measure_str(text, 11.0)
                > get_metrics(FontFace::Regular).measure_str(text, 11.0)
        );
    }

    #[test]
    fn test_wrap_short_text_is_one_line() {
        let lines = get_metrics(FontFace::Regular).wrap_lines("Built a compiler", 10.0, 500.0);
        assert_eq!(lines, vec!["Built a compiler".to_string()]);
    }

    #[test]
    fn test_wrap_respects_max_width() {
        let metrics = get_metrics(FontFace::Regular);
        let text = "Architected a distributed caching layer using consistent hashing, \
                    reducing p99 latency by 40% under 50k RPS peak load across three regions";
        let lines = metrics.wrap_lines(text, 10.0, 200.0);
        assert!(lines.len() >= 2, "expected wrapping, got {lines:?}");
        for line in &lines {
            assert!(metrics.measure_str(line, 10.0) <= 200.0, "line too wide: {line}");
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_wrap_keeps_overlong_word_whole() {
        let lines = get_metrics(FontFace::Regular).wrap_lines("a Supercalifragilistic b", 10.0, 30.0);
        assert_eq!(lines, vec!["a", "Supercalifragilistic", "b"]);
    }

    #[test]
    fn test_wrap_empty_text_has_no_lines() {
        assert!(get_metrics(FontFace::Bold).wrap_lines("   ", 10.0, 100.0).is_empty());
    }

    #[test]
    fn test_hanging_wrap_narrows_first_line() {
        let metrics = get_metrics(FontFace::Regular);
        let text = "Rust Go Python TypeScript SQL Bash";
        let hanging = metrics.wrap_lines_hanging(text, 10.0, 40.0, 400.0);
        assert!(metrics.measure_str(&hanging[0], 10.0) <= 40.0);
        assert_eq!(hanging.len(), 2);
    }

    #[test]
    fn test_resource_names_are_distinct() {
        assert_ne!(
            FontFace::Regular.resource_name(),
            FontFace::Bold.resource_name()
        );
        assert_eq!(FontFace::Bold.base_font(), "Helvetica-Bold");
    }
}
