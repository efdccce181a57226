//! CLI output formatting for the three gallery views.
//!
//! # Information-First Display
//!
//! Every entity (image, tag, tag group) leads with a positional index and its
//! identity; details follow as indented context lines. The same layout is
//! used by every command so the output reads as a content inventory.
//!
//! ## Images
//!
//! ```text
//! Images (2)
//! 001 nature/b.png
//!     Tags: nature
//!     Size: 20480 bytes
//!     Modified: 2024-05-01T12:00:00+00:00
//!     Description: Heron at dawn
//!     Url: https://img.example.com/nature/b.png
//! 002 a.jpg
//!     Size: 10240 bytes
//!     Modified: 2024-05-01T12:00:00+00:00
//!     Url: https://img.example.com/a.jpg
//! ```
//!
//! ## Tags
//!
//! ```text
//! Tags (2)
//! 001 nature
//! 002 travel/japan
//! ```
//!
//! ## Tag groups
//!
//! ```text
//! 001 nature (2 photos)
//!     001 nature/b.png
//!     002 nature/c.gif
//! 002 travel/japan (1 photos)
//!     001 travel/japan/tokyo.jpg
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::types::{Image, TagGroup};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional photo count.
fn entity_header(index: usize, title: &str, count: Option<usize>) -> String {
    match count {
        Some(n) => format!("{} {} ({} photos)", format_index(index), title, n),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    }
}

const DESCRIPTION_PREVIEW: usize = 60;

// ============================================================================
// Images
// ============================================================================

pub fn format_images(images: &[Image]) -> Vec<String> {
    let mut lines = vec![format!("Images ({})", images.len())];
    let ctx = indent(1);

    for (i, image) in images.iter().enumerate() {
        lines.push(entity_header(i + 1, &image.key, None));
        if !image.tags.is_empty() {
            lines.push(format!("{ctx}Tags: {}", image.tags.join(", ")));
        }
        lines.push(format!("{ctx}Size: {} bytes", image.size));
        lines.push(format!("{ctx}Modified: {}", image.last_modified.to_rfc3339()));
        if !image.description.is_empty() {
            lines.push(format!(
                "{ctx}Description: {}",
                truncate_desc(&image.description, DESCRIPTION_PREVIEW)
            ));
        }
        if let Some(credits) = &image.credits {
            lines.push(format!("{ctx}Credits: {credits}"));
        }
        lines.push(format!("{ctx}Url: {}", image.url));
    }
    lines
}

pub fn print_images(images: &[Image]) {
    for line in format_images(images) {
        println!("{}", line);
    }
}

// ============================================================================
// Tags
// ============================================================================

pub fn format_tags(tags: &[String]) -> Vec<String> {
    let mut lines = vec![format!("Tags ({})", tags.len())];
    lines.extend(
        tags.iter()
            .enumerate()
            .map(|(i, tag)| entity_header(i + 1, tag, None)),
    );
    lines
}

pub fn print_tags(tags: &[String]) {
    for line in format_tags(tags) {
        println!("{}", line);
    }
}

// ============================================================================
// Tag groups
// ============================================================================

pub fn format_tag_groups(groups: &[TagGroup]) -> Vec<String> {
    let mut lines = Vec::new();
    for (g, group) in groups.iter().enumerate() {
        lines.push(entity_header(g + 1, &group.tag_name, Some(group.images.len())));
        for (i, image) in group.images.iter().enumerate() {
            lines.push(format!("{}{}", indent(1), entity_header(i + 1, &image.key, None)));
        }
    }
    lines.push(format!("{} tags", groups.len()));
    lines
}

pub fn print_tag_groups(groups: &[TagGroup]) {
    for line in format_tag_groups(groups) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::image;

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn truncate_desc_short() {
        assert_eq!(truncate_desc("hello", 10), "hello");
    }

    #[test]
    fn truncate_desc_exact() {
        assert_eq!(truncate_desc("hello", 5), "hello");
    }

    #[test]
    fn truncate_desc_long() {
        assert_eq!(truncate_desc("hello world", 5), "hello...");
    }

    #[test]
    fn truncate_desc_multibyte() {
        assert_eq!(truncate_desc("héron à l'aube", 5), "héron...");
    }

    #[test]
    fn format_index_pads_to_three() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn entity_header_with_count() {
        assert_eq!(entity_header(3, "nature", Some(5)), "003 nature (5 photos)");
    }

    #[test]
    fn entity_header_without_count() {
        assert_eq!(entity_header(1, "a.jpg", None), "001 a.jpg");
    }

    // =========================================================================
    // Views
    // =========================================================================

    #[test]
    fn format_images_shows_context_lines() {
        let mut heron = image("nature/b.png");
        heron.description = "Heron at dawn".into();
        heron.credits = Some(serde_json::json!("Ana"));

        let lines = format_images(&[heron, image("a.jpg")]);
        assert_eq!(lines[0], "Images (2)");
        assert_eq!(lines[1], "001 nature/b.png");
        assert!(lines.contains(&"    Tags: nature".to_string()));
        assert!(lines.contains(&"    Description: Heron at dawn".to_string()));
        assert!(lines.contains(&"    Credits: \"Ana\"".to_string()));
        assert!(lines.contains(&"002 a.jpg".to_string()));
        assert!(lines.contains(&"    Url: https://img.test/a.jpg".to_string()));
    }

    #[test]
    fn format_images_omits_empty_fields() {
        let lines = format_images(&[image("a.jpg")]);
        assert!(!lines.iter().any(|l| l.contains("Tags:")));
        assert!(!lines.iter().any(|l| l.contains("Description:")));
        assert!(!lines.iter().any(|l| l.contains("Credits:")));
    }

    #[test]
    fn format_tags_lists_in_order() {
        let tags = vec!["nature".to_string(), "travel/japan".to_string()];
        assert_eq!(
            format_tags(&tags),
            vec!["Tags (2)", "001 nature", "002 travel/japan"]
        );
    }

    #[test]
    fn format_tag_groups_nests_images() {
        let groups = vec![
            TagGroup {
                tag_name: "nature".into(),
                images: vec![image("nature/b.png"), image("nature/c.gif")],
            },
            TagGroup {
                tag_name: "travel/japan".into(),
                images: vec![image("travel/japan/tokyo.jpg")],
            },
        ];
        assert_eq!(
            format_tag_groups(&groups),
            vec![
                "001 nature (2 photos)",
                "    001 nature/b.png",
                "    002 nature/c.gif",
                "002 travel/japan (1 photos)",
                "    001 travel/japan/tokyo.jpg",
                "2 tags",
            ]
        );
    }
}
