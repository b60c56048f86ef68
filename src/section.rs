//! Heading-boundary markdown sectioner.
//!
//! Splits a markdown file into [`Section`]s at ATX heading lines (`#` through
//! `######` followed by whitespace and text). Each section runs from the start
//! of its heading line up to the start of the next heading line, or the end of
//! the file, so concatenating the sections reproduces the file from its first
//! heading onward.
//!
//! Notes on behaviour:
//! - Text before the first heading is not kept once any heading exists.
//! - A file with no headings becomes a single `[Intro]` section titled
//!   `[Untitled]`.
//! - Heading lines inside fenced code blocks are treated as headings too.
//!   Laravel's docs rarely trip over this, and changing it would change links.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Section, INTRO, UNTITLED};

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(#{1,6})[ \t]+(.+)$").expect("heading pattern is valid")
});

/// A sectioned markdown file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionedDocument {
    /// Text of the first level-1 heading, or `[Untitled]`.
    pub title: String,
    pub sections: Vec<Section>,
}

/// One heading line found by the scan.
#[derive(Debug, Clone, Copy)]
struct HeadingMatch<'a> {
    start: usize,
    level: usize,
    text: &'a str,
}

fn scan_headings(raw: &str) -> Vec<HeadingMatch<'_>> {
    HEADING_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let hashes = caps.get(1)?;
            let text = caps.get(2)?;
            Some(HeadingMatch {
                start: whole.start(),
                level: hashes.as_str().len(),
                text: text.as_str().trim(),
            })
        })
        .collect()
}

/// Split `raw` into heading-delimited sections and pick the document title.
pub fn section_markdown(raw: &str) -> SectionedDocument {
    let headings = scan_headings(raw);

    if headings.is_empty() {
        return SectionedDocument {
            title: UNTITLED.to_string(),
            sections: vec![Section {
                heading: INTRO.to_string(),
                content: raw.to_string(),
            }],
        };
    }

    let title = headings
        .iter()
        .find(|h| h.level == 1)
        .map(|h| h.text.to_string())
        .unwrap_or_else(|| UNTITLED.to_string());

    let sections = headings
        .iter()
        .enumerate()
        .map(|(i, heading)| {
            let end = headings.get(i + 1).map(|next| next.start).unwrap_or(raw.len());
            Section {
                heading: heading.text.to_string(),
                content: raw[heading.start..end].to_string(),
            }
        })
        .collect();

    SectionedDocument { title, sections }
}

/// URL fragment for a heading: transliterated to ASCII, lowercased, with every
/// run of non-alphanumeric characters collapsed to a single `-`, trimmed at
/// both ends.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTISAN: &str = "# Artisan Console\n\n## Introduction\nArtisan is the command line interface.\n\n## Writing Commands\nIn addition to the commands provided.\n";

    fn joined(doc: &SectionedDocument) -> String {
        doc.sections.iter().map(|s| s.content.as_str()).collect()
    }

    #[test]
    fn no_headings_yields_single_intro_section() {
        let raw = "Just some text.\n\nAnd a second paragraph.";
        let doc = section_markdown(raw);
        assert_eq!(doc.title, "[Untitled]");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].heading, "[Intro]");
        assert_eq!(doc.sections[0].content, raw);
    }

    #[test]
    fn empty_input_yields_single_intro_section() {
        let doc = section_markdown("");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].heading, "[Intro]");
        assert_eq!(doc.sections[0].content, "");
    }

    #[test]
    fn splits_at_every_heading_in_order() {
        let doc = section_markdown(ARTISAN);
        assert_eq!(doc.title, "Artisan Console");
        let headings: Vec<&str> = doc.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(
            headings,
            vec!["Artisan Console", "Introduction", "Writing Commands"]
        );
        assert_eq!(doc.sections[0].content, "# Artisan Console\n\n");
        assert_eq!(
            doc.sections[1].content,
            "## Introduction\nArtisan is the command line interface.\n\n"
        );
        assert!(doc.sections[2].content.starts_with("## Writing Commands\n"));
    }

    #[test]
    fn sections_reconstruct_text_from_first_heading() {
        let raw = "prologue that is dropped\n# Title\nbody\n### Deep\nmore\n## Mid\nend";
        let doc = section_markdown(raw);
        let first = raw.find("# Title").unwrap();
        assert_eq!(joined(&doc), &raw[first..]);
        assert!(!joined(&doc).contains("prologue"));
    }

    #[test]
    fn lossless_with_multibyte_text() {
        let raw = "# Café ☕\n\nnaïve résumé\n\n## Über\n日本語のテキスト\n";
        let doc = section_markdown(raw);
        assert_eq!(joined(&doc), raw);
        assert_eq!(doc.title, "Café ☕");
        assert_eq!(doc.sections[1].heading, "Über");
    }

    #[test]
    fn title_is_first_level_one_heading() {
        let raw = "## Setup\ntext\n# Real Title\n# Second Title\n";
        let doc = section_markdown(raw);
        assert_eq!(doc.title, "Real Title");
        assert_eq!(doc.sections.len(), 3);
    }

    #[test]
    fn title_defaults_when_no_level_one_heading() {
        let doc = section_markdown("## Only Two\ntext\n### Three\n");
        assert_eq!(doc.title, "[Untitled]");
        assert_eq!(doc.sections.len(), 2);
    }

    #[test]
    fn title_is_stable_across_runs() {
        let a = section_markdown(ARTISAN);
        let b = section_markdown(ARTISAN);
        assert_eq!(a, b);
    }

    #[test]
    fn heading_requires_space_and_at_most_six_hashes() {
        let raw = "#hashtag\n####### seven\n###### Six\n";
        let doc = section_markdown(raw);
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].heading, "Six");
    }

    #[test]
    fn heading_text_is_trimmed() {
        let doc = section_markdown("#   Spaced Out   \r\nbody");
        assert_eq!(doc.title, "Spaced Out");
        assert_eq!(doc.sections[0].heading, "Spaced Out");
    }

    #[test]
    fn headings_inside_code_fences_still_split() {
        let raw = "# Doc\n```bash\n# install deps\nnpm install\n```\n";
        let doc = section_markdown(raw);
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[1].heading, "install deps");
        assert_eq!(joined(&doc), raw);
    }

    #[test]
    fn slugify_examples() {
        assert_eq!(slugify("Tinker (REPL)"), "tinker-repl");
        assert_eq!(slugify("Introduction"), "introduction");
        assert_eq!(slugify("Writing Commands"), "writing-commands");
        assert_eq!(slugify("  --Hello,   World!--  "), "hello-world");
        assert_eq!(slugify("[Intro]"), "intro");
        assert_eq!(slugify("PHP 8.2+ Support"), "php-8-2-support");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugify_transliterates_accented_letters() {
        assert_eq!(slugify("Déjà Vu"), "deja-vu");
        assert_eq!(slugify("Café Über"), "cafe-uber");
        assert_eq!(slugify("Straße"), "strasse");
    }
}
