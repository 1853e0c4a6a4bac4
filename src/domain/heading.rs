//! Heading detection
//!
//! Both heading levels use the same underline detector: a line that, once
//! trimmed, starts and ends with `=` or starts and ends with `-`. Level is
//! positional. The scan runs in two phases: the first underline always marks
//! the title, and every later underline marks a section heading.

/// Returns true if the line underlines the heading text above it
pub fn is_underline(line: &str) -> bool {
    let s = line.trim();
    (s.starts_with('=') && s.ends_with('=')) || (s.starts_with('-') && s.ends_with('-'))
}

/// Title, untitled notes and sections of a single entry, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    /// Title text (the line above the first underline), trimmed
    pub title: String,

    /// Text between the title underline and the first section heading
    pub notes: String,

    /// Section name and body pairs; names are trimmed but keep their case
    pub sections: Vec<(String, String)>,
}

/// Joins `lines[start..end]`, yielding an empty string for empty ranges
fn body(lines: &[String], start: usize, end: usize) -> String {
    lines[start.min(end)..end].join("\n")
}

/// Scans document lines into an outline
///
/// Returns `None` when there is no title: no underline at all, an underline
/// on the very first line, or a blank line above the first underline.
pub fn scan(lines: &[String]) -> Option<Outline> {
    let underlines: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_underline(line))
        .map(|(i, _)| i)
        .collect();

    // Phase one: the title
    let (&first, rest) = underlines.split_first()?;
    let title_at = first.checked_sub(1)?;
    let title = lines[title_at].trim();
    if title.is_empty() {
        return None;
    }

    // Each heading's text sits directly above its underline
    let points: Vec<usize> = rest.iter().map(|i| i - 1).collect();
    let end_of = |k: usize| points.get(k).copied().unwrap_or(lines.len());

    let notes = body(lines, title_at + 2, end_of(0));

    // Phase two: sections
    let sections = points
        .iter()
        .enumerate()
        .map(|(k, &at)| (lines[at].trim().to_string(), body(lines, at + 2, end_of(k + 1))))
        .collect();

    Some(Outline {
        title: title.to_string(),
        notes,
        sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn detects_underlines() {
        assert!(is_underline("====="));
        assert!(is_underline("  -----  "));
        assert!(is_underline("="));
        assert!(is_underline("- x -"));
        assert!(!is_underline(""));
        assert!(!is_underline("=-"));
        assert!(!is_underline("text"));
    }

    #[test]
    fn scans_title_notes_and_sections() {
        let outline = scan(&lines(
            "Monday\n======\nSlept well.\nWork\n----\nShipped it.\nMore.\nHome Life\n---------\nCooked.",
        ))
        .unwrap();

        assert_eq!(outline.title, "Monday");
        assert_eq!(outline.notes, "Slept well.");
        assert_eq!(
            outline.sections,
            vec![
                ("Work".to_string(), "Shipped it.\nMore.".to_string()),
                ("Home Life".to_string(), "Cooked.".to_string()),
            ]
        );
    }

    #[test]
    fn title_only() {
        let outline = scan(&lines("Monday\n======")).unwrap();

        assert_eq!(outline.title, "Monday");
        assert!(outline.notes.is_empty());
        assert!(outline.sections.is_empty());
    }

    #[test]
    fn section_directly_after_title() {
        let outline = scan(&lines("Monday\n======\nWork\n----\nx")).unwrap();

        assert!(outline.notes.is_empty());
        assert_eq!(outline.sections, vec![("Work".to_string(), "x".to_string())]);
    }

    #[test]
    fn trailing_underline_has_empty_body() {
        let outline = scan(&lines("Monday\n======\nWork\n----")).unwrap();
        assert_eq!(outline.sections, vec![("Work".to_string(), String::new())]);
    }

    #[test]
    fn no_underline_is_untitled() {
        assert!(scan(&lines("just text\nmore text")).is_none());
        assert!(scan(&[]).is_none());
    }

    #[test]
    fn underline_on_first_line_is_untitled() {
        assert!(scan(&lines("=====\nMonday\n======")).is_none());
    }

    #[test]
    fn blank_title_is_untitled() {
        assert!(scan(&lines("   \n=====\nbody")).is_none());
    }
}
