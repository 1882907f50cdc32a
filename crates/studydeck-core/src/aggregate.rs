//! Summary computation
//!
//! Summaries are derived from the tree on every call and never stored, so
//! they always reflect the document as of the most recent load.

use crate::models::{Category, CategorySummary, StudySet, Subtopic, SubtopicSummary};

/// Summarize a category: sets across all subtopics and cards across all sets
pub fn summarize_category(category: &Category) -> CategorySummary {
    let total_sets = category
        .subtopics
        .iter()
        .map(|subtopic| subtopic.sets.len())
        .sum();
    let total_cards = category
        .subtopics
        .iter()
        .map(|subtopic| count_cards(&subtopic.sets))
        .sum();

    CategorySummary {
        id: category.id.clone(),
        name: category.name.clone(),
        total_sets,
        total_cards,
        cards_to_review: 0,
    }
}

/// Summarize a subtopic: its own sets and the cards they hold
pub fn summarize_subtopic(subtopic: &Subtopic) -> SubtopicSummary {
    SubtopicSummary {
        id: subtopic.id.clone(),
        name: subtopic.name.clone(),
        total_sets: subtopic.sets.len(),
        total_cards: count_cards(&subtopic.sets),
    }
}

fn count_cards(sets: &[StudySet]) -> usize {
    sets.iter().map(|set| set.flashcards.len()).sum()
}
