use serde::{Deserialize, Serialize};

use crate::clusters::{Cluster, ClusterKind};

/// Heuristic glyph metrics for globe labels, in CSS pixels.
///
/// These only feed overlap detection; the renderer lays out the real text.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelMetrics {
    /// Hangul, kana, CJK ideographs and fullwidth forms.
    pub wide_glyph_px: f64,
    /// Latin letters, digits and other alphabetic glyphs.
    pub narrow_glyph_px: f64,
    /// Whitespace and punctuation.
    pub thin_glyph_px: f64,
    pub flag_px: f64,
    pub count_badge_px: f64,
    /// Left plus right padding inside the label pill.
    pub padding_px: f64,
}

impl Default for LabelMetrics {
    fn default() -> Self {
        Self {
            wide_glyph_px: 14.0,
            narrow_glyph_px: 8.0,
            thin_glyph_px: 4.0,
            flag_px: 20.0,
            count_badge_px: 24.0,
            padding_px: 16.0,
        }
    }
}

impl LabelMetrics {
    pub fn glyph_width(&self, ch: char) -> f64 {
        if is_wide_glyph(ch) {
            self.wide_glyph_px
        } else if ch.is_alphanumeric() {
            self.narrow_glyph_px
        } else {
            self.thin_glyph_px
        }
    }

    pub fn text_width(&self, text: &str) -> f64 {
        text.trim().chars().map(|ch| self.glyph_width(ch)).sum()
    }

    /// Estimated on-screen width of a cluster's label pill.
    ///
    /// City labels carry no count badge.
    pub fn label_width(&self, cluster: &Cluster) -> f64 {
        let mut width = self.text_width(&cluster.name) + self.padding_px;
        if !cluster.flag.is_empty() {
            width += self.flag_px;
        }
        if cluster.kind != ClusterKind::City {
            width += self.count_badge_px;
        }
        width
    }
}

/// [`LabelMetrics::label_width`] with the default metrics.
pub fn estimate_label_width(cluster: &Cluster) -> f64 {
    LabelMetrics::default().label_width(cluster)
}

fn is_wide_glyph(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x11FF      // Hangul Jamo
        | 0x3040..=0x30FF    // Hiragana, Katakana
        | 0x3130..=0x318F    // Hangul Compatibility Jamo
        | 0x3400..=0x4DBF    // CJK Extension A
        | 0x4E00..=0x9FFF    // CJK Unified Ideographs
        | 0xAC00..=0xD7A3    // Hangul Syllables
        | 0xF900..=0xFAFF    // CJK Compatibility Ideographs
        | 0xFF00..=0xFF60    // Fullwidth forms
    )
}
