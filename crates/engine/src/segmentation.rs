//! Segmentation strategy - partitions a structured document into ordered,
//! independently-generatable segments.
//!
//! Output guarantee: the unit-weighted share of must-generate-first segments
//! is at least `min_start_percentage`, unless the document is too small to
//! split further, in which case every segment is promoted. Segmentation is
//! infallible: a document with zero usable sections yields either no
//! segments or a single catch-all segment derived from its raw text.

use regex_lite::Regex;

use paperstage_domain::{Document, Section, SectionType, Segment, SegmentKind};

use crate::config::GenerationConfig;

/// Words of estimated content per dialogue unit.
const WORDS_PER_UNIT: f64 = 50.0;

/// Minimum combined content length for the extra segment to be emitted.
/// Shorter leftovers are not worth a generation call of their own.
const MIN_EXTRA_CONTENT_LEN: usize = 200;

/// Weight of one CJK character relative to one Latin word.
const CJK_CHAR_WEIGHT: f64 = 0.5;

/// Partitions documents into segments and assigns priorities.
pub struct SegmentationStrategy {
    config: GenerationConfig,
    inline_math: Regex,
}

impl SegmentationStrategy {
    pub fn new(config: GenerationConfig) -> Self {
        // Inline TeX math: $...$ or \( ... \)
        let inline_math =
            Regex::new(r"\$[^$]*\$|\\\([^)]*\\\)").expect("inline math pattern is valid");
        Self {
            config,
            inline_math,
        }
    }

    /// Cut a document into ordered segments with priorities and the
    /// must-generate-first marking repaired to the configured threshold.
    pub fn segment_document(&self, document: &Document) -> Vec<Segment> {
        let mut segments = self.group_into_segments(document);

        if segments.is_empty() {
            if let Some(catch_all) = self.catch_all_segment(document) {
                segments.push(catch_all);
            } else {
                return segments;
            }
        }

        self.mark_priority_segments(&mut segments);
        self.repair_threshold(&mut segments);

        tracing::debug!(
            document = %document.id,
            segments = segments.len(),
            priority = segments.iter().filter(|s| s.must_generate_first).count(),
            "segmented document"
        );

        segments
    }

    /// Estimate a segment's dialogue-unit count from its combined text.
    ///
    /// Counts Latin words plus CJK characters weighted 0.5 each, after
    /// stripping inline math, divided by 50. The result is clamped to
    /// [4, 20] by `Segment::new`.
    pub fn estimate_units(&self, text: &str) -> u32 {
        let stripped = self.inline_math.replace_all(text, " ");

        let mut cjk_chars = 0usize;
        let mut latin_text = String::with_capacity(stripped.len());
        for ch in stripped.chars() {
            if is_cjk(ch) {
                cjk_chars += 1;
                latin_text.push(' ');
            } else {
                latin_text.push(ch);
            }
        }
        let latin_words = latin_text
            .split_whitespace()
            .filter(|w| w.chars().any(char::is_alphanumeric))
            .count();

        let weighted = latin_words as f64 + cjk_chars as f64 * CJK_CHAR_WEIGHT;
        (weighted / WORDS_PER_UNIT).round() as u32
    }

    /// Group sections into kind buckets and emit one segment per non-empty
    /// kind, in fixed priority order.
    fn group_into_segments(&self, document: &Document) -> Vec<Segment> {
        let mut segments = Vec::new();

        for kind in SegmentKind::ALL {
            let sections: Vec<Section> = document
                .sections
                .iter()
                .filter(|s| kind_for_section(&s.section_type) == kind)
                .cloned()
                .collect();

            if sections.is_empty() {
                continue;
            }

            let combined: String = sections
                .iter()
                .map(|s| s.content.as_str())
                .collect::<Vec<_>>()
                .join("\n");

            // Trivial leftovers do not earn a segment of their own.
            if kind == SegmentKind::Extra && combined.chars().count() < MIN_EXTRA_CONTENT_LEN {
                continue;
            }

            let units = self.estimate_units(&combined);
            segments.push(Segment::new(kind, sections, units));
        }

        segments
    }

    /// Single catch-all segment from raw text, for documents the extractor
    /// could not split.
    fn catch_all_segment(&self, document: &Document) -> Option<Segment> {
        if document.raw_text.trim().is_empty() {
            return None;
        }
        let section = Section::new(
            SectionType::Other("full_text".to_string()),
            document.title.clone(),
            document.raw_text.clone(),
        );
        let units = self.estimate_units(&document.raw_text);
        Some(Segment::new(SegmentKind::Extra, vec![section], units).with_must_generate_first(true))
    }

    /// Default marking: intro and methods must generate first, matching the
    /// orchestrator's minimum two-phase contract.
    fn mark_priority_segments(&self, segments: &mut [Segment]) {
        for segment in segments.iter_mut() {
            if matches!(segment.kind, SegmentKind::Intro | SegmentKind::Methods) {
                segment.must_generate_first = true;
            }
        }
    }

    /// Promote additional segments, in priority order, until the priority
    /// prefix covers `min_start_percentage` of the estimated units.
    fn repair_threshold(&self, segments: &mut [Segment]) {
        let total_units: u32 = segments.iter().map(|s| s.estimated_unit_count).sum();
        if total_units == 0 {
            return;
        }

        // If nothing was marked, the highest-priority segment is promoted
        // unconditionally so the invariant "at least one priority segment"
        // holds.
        if !segments.iter().any(|s| s.must_generate_first) {
            if let Some(first) = segments.iter_mut().min_by_key(|s| s.priority) {
                first.must_generate_first = true;
            }
        }

        let mut covered: u32 = segments
            .iter()
            .filter(|s| s.must_generate_first)
            .map(|s| s.estimated_unit_count)
            .sum();

        let mut by_priority: Vec<usize> = (0..segments.len()).collect();
        by_priority.sort_by_key(|&i| segments[i].priority);

        for idx in by_priority {
            let coverage = covered as f64 / total_units as f64 * 100.0;
            if coverage >= self.config.min_start_percentage {
                break;
            }
            let segment = &mut segments[idx];
            if !segment.must_generate_first {
                segment.must_generate_first = true;
                covered += segment.estimated_unit_count;
            }
        }
    }
}

impl Default for SegmentationStrategy {
    fn default() -> Self {
        Self::new(GenerationConfig::default())
    }
}

/// Static section-type → segment-kind mapping.
fn kind_for_section(section_type: &SectionType) -> SegmentKind {
    match section_type {
        SectionType::Abstract | SectionType::Introduction | SectionType::Background => {
            SegmentKind::Intro
        }
        SectionType::Methods | SectionType::Approach => SegmentKind::Methods,
        SectionType::Experiments | SectionType::Results | SectionType::Evaluation => {
            SegmentKind::Results
        }
        SectionType::Discussion | SectionType::Conclusion => SegmentKind::Conclusion,
        SectionType::RelatedWork
        | SectionType::Appendix
        | SectionType::References
        | SectionType::Other(_) => SegmentKind::Extra,
    }
}

fn is_cjk(ch: char) -> bool {
    matches!(ch,
        '\u{4E00}'..='\u{9FFF}'   // CJK Unified Ideographs
        | '\u{3400}'..='\u{4DBF}' // CJK Extension A
        | '\u{F900}'..='\u{FAFF}' // CJK Compatibility Ideographs
        | '\u{3040}'..='\u{30FF}' // Hiragana + Katakana
        | '\u{AC00}'..='\u{D7AF}' // Hangul Syllables
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperstage_domain::{MAX_ESTIMATED_UNITS, MIN_ESTIMATED_UNITS};

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn section(section_type: SectionType, word_count: usize) -> Section {
        Section::new(section_type, "Heading", words(word_count))
    }

    fn document(sections: Vec<Section>) -> Document {
        Document::new("Test Paper", sections)
    }

    #[test]
    fn test_spec_scenario_intro_methods_cover_sixty_percent() {
        // intro 8 units, methods 10 units, results 12 units, threshold 50%:
        // intro+methods = 18/30 = 60% >= 50%, so results stays background.
        let strategy = SegmentationStrategy::default();
        let doc = document(vec![
            section(SectionType::Introduction, 400),
            section(SectionType::Methods, 500),
            section(SectionType::Results, 600),
        ]);

        let segments = strategy.segment_document(&doc);
        assert_eq!(segments.len(), 3);

        let intro = &segments[0];
        let methods = &segments[1];
        let results = &segments[2];
        assert_eq!(intro.estimated_unit_count, 8);
        assert_eq!(methods.estimated_unit_count, 10);
        assert_eq!(results.estimated_unit_count, 12);
        assert!(intro.must_generate_first);
        assert!(methods.must_generate_first);
        assert!(!results.must_generate_first);
    }

    #[test]
    fn test_threshold_repair_promotes_in_priority_order() {
        // intro alone is 4/24 units; at 50% both methods-less kinds get
        // promoted until coverage is reached.
        let strategy = SegmentationStrategy::new(
            GenerationConfig::default().with_min_start_percentage(60.0),
        );
        let doc = document(vec![
            section(SectionType::Introduction, 200),  // 4 units
            section(SectionType::Results, 1000),      // 20 units
            section(SectionType::Conclusion, 400),    // 8 units
        ]);

        let segments = strategy.segment_document(&doc);
        // intro (4) < 60% of 32; results (priority 3) promoted next -> 24/32 = 75%
        let results = segments
            .iter()
            .find(|s| s.kind == SegmentKind::Results)
            .expect("results segment");
        assert!(results.must_generate_first);
        let conclusion = segments
            .iter()
            .find(|s| s.kind == SegmentKind::Conclusion)
            .expect("conclusion segment");
        assert!(!conclusion.must_generate_first);
    }

    #[test]
    fn test_results_only_document_forces_promotion() {
        let strategy = SegmentationStrategy::default();
        let doc = document(vec![section(SectionType::Results, 300)]);

        let segments = strategy.segment_document(&doc);
        assert_eq!(segments.len(), 1);
        assert!(segments[0].must_generate_first);
    }

    #[test]
    fn test_priority_coverage_meets_threshold() {
        let strategy = SegmentationStrategy::default();
        let doc = document(vec![
            section(SectionType::Introduction, 200),
            section(SectionType::Methods, 200),
            section(SectionType::Results, 2000),
            section(SectionType::Conclusion, 2000),
        ]);

        let segments = strategy.segment_document(&doc);
        let total: u32 = segments.iter().map(|s| s.estimated_unit_count).sum();
        let covered: u32 = segments
            .iter()
            .filter(|s| s.must_generate_first)
            .map(|s| s.estimated_unit_count)
            .sum();
        assert!(covered as f64 / total as f64 * 100.0 >= 50.0);
    }

    #[test]
    fn test_unit_estimation_clamps() {
        let strategy = SegmentationStrategy::default();
        let doc = document(vec![
            section(SectionType::Introduction, 10),
            section(SectionType::Results, 10_000),
        ]);

        let segments = strategy.segment_document(&doc);
        assert_eq!(segments[0].estimated_unit_count, MIN_ESTIMATED_UNITS);
        assert_eq!(segments[1].estimated_unit_count, MAX_ESTIMATED_UNITS);
    }

    #[test]
    fn test_cjk_characters_weigh_half() {
        let strategy = SegmentationStrategy::default();
        // 600 CJK chars -> 300 weighted -> 6 units
        let text = "论".repeat(600);
        assert_eq!(strategy.estimate_units(&text), 6);
    }

    #[test]
    fn test_inline_math_is_stripped() {
        let strategy = SegmentationStrategy::default();
        let with_math = format!("{} $\\alpha + \\beta$ {}", words(100), words(100));
        let without_math = format!("{} {}", words(100), words(100));
        assert_eq!(
            strategy.estimate_units(&with_math),
            strategy.estimate_units(&without_math)
        );
    }

    #[test]
    fn test_trivial_extra_group_is_dropped() {
        let strategy = SegmentationStrategy::default();
        let doc = document(vec![
            section(SectionType::Introduction, 300),
            Section::new(SectionType::References, "Refs", "short"),
        ]);

        let segments = strategy.segment_document(&doc);
        assert!(segments.iter().all(|s| s.kind != SegmentKind::Extra));
    }

    #[test]
    fn test_unsectioned_document_yields_catch_all() {
        let strategy = SegmentationStrategy::default();
        let doc = Document::new("Unstructured", vec![]).with_raw_text(words(400));

        let segments = strategy.segment_document(&doc);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].kind, SegmentKind::Extra);
        assert!(segments[0].must_generate_first);
    }

    #[test]
    fn test_empty_document_yields_no_segments() {
        let strategy = SegmentationStrategy::default();
        let doc = Document::new("Empty", vec![]);
        assert!(strategy.segment_document(&doc).is_empty());
    }

    #[test]
    fn test_segments_partition_sections_without_overlap() {
        let strategy = SegmentationStrategy::default();
        let doc = document(vec![
            section(SectionType::Abstract, 300),
            section(SectionType::Introduction, 300),
            section(SectionType::Methods, 300),
            section(SectionType::Conclusion, 300),
        ]);

        let segments = strategy.segment_document(&doc);
        let total_sections: usize = segments.iter().map(|s| s.content.len()).sum();
        assert_eq!(total_sections, doc.sections.len());
    }
}
