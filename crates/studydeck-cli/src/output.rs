//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use studydeck_core::{CategorySummary, StudySet, SubtopicSummary};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print category summaries
    pub fn print_categories(&self, categories: &[CategorySummary]) {
        match self.format {
            OutputFormat::Human => {
                if categories.is_empty() {
                    println!("No categories found.");
                    return;
                }
                for category in categories {
                    println!(
                        "{} | {} | {} set(s), {} card(s)",
                        category.id,
                        truncate(&category.name, 35),
                        category.total_sets,
                        category.total_cards
                    );
                }
                println!("\n{} categor{}", categories.len(), plural_y(categories.len()));
            }
            OutputFormat::Json => print_json(&categories),
            OutputFormat::Quiet => {
                for category in categories {
                    println!("{}", category.id);
                }
            }
        }
    }

    /// Print subtopic summaries
    pub fn print_subtopics(&self, subtopics: &[SubtopicSummary]) {
        match self.format {
            OutputFormat::Human => {
                if subtopics.is_empty() {
                    println!("No subtopics found.");
                    return;
                }
                for subtopic in subtopics {
                    println!(
                        "{} | {} | {} set(s), {} card(s)",
                        subtopic.id,
                        truncate(&subtopic.name, 35),
                        subtopic.total_sets,
                        subtopic.total_cards
                    );
                }
                println!("\n{} subtopic(s)", subtopics.len());
            }
            OutputFormat::Json => print_json(&subtopics),
            OutputFormat::Quiet => {
                for subtopic in subtopics {
                    println!("{}", subtopic.id);
                }
            }
        }
    }

    /// Print study sets with their card counts
    pub fn print_sets(&self, sets: &[StudySet]) {
        match self.format {
            OutputFormat::Human => {
                if sets.is_empty() {
                    println!("No study sets found.");
                    return;
                }
                for set in sets {
                    println!(
                        "{} | {} | {} card(s)",
                        set.id,
                        truncate(&set.name, 35),
                        set.flashcards.len()
                    );
                }
                println!("\n{} set(s)", sets.len());
            }
            OutputFormat::Json => print_json(&sets),
            OutputFormat::Quiet => {
                for set in sets {
                    println!("{}", set.id);
                }
            }
        }
    }

    /// Report a newly created node
    pub fn print_created<T: Serialize>(&self, kind: &str, id: &str, name: &str, node: &T) {
        match self.format {
            OutputFormat::Human => println!("✓ Created {}: {} ({})", kind, name, id),
            OutputFormat::Json => print_json(node),
            OutputFormat::Quiet => println!("{}", id),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode output: {}", e),
    }
}

fn plural_y(count: usize) -> &'static str {
    if count == 1 {
        "y"
    } else {
        "ies"
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        assert_eq!(truncate("álgebra linear avançada", 10), "álgebra...");
    }

    #[test]
    fn test_plural_y() {
        assert_eq!(plural_y(1), "y");
        assert_eq!(plural_y(0), "ies");
        assert_eq!(plural_y(3), "ies");
    }
}
