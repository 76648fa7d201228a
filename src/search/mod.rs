// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Tido Contributors

//! Search resolver for locating todos from fuzzy, free-text queries.
//!
//! These are pure functions over a store snapshot: callers fetch the todos
//! (and categories, for [`smart_search`]) and the matching happens here,
//! which keeps cardinality branching trivially testable.
//!
//! Matching is deliberately crude substring and token work with no
//! relevance scoring; result order is the documented contract, nothing
//! more.

use std::collections::HashMap;

use crate::models::{Category, Todo};

/// Outcome of resolving a fuzzy title to a single record
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Nothing matched the query
    NotFound,
    /// Exactly one record matched
    Resolved(Todo),
    /// Two or more records matched; the caller must disambiguate.
    /// Candidates keep smart-search order (ascending by title), which is
    /// also the order they are numbered in for the user.
    Ambiguous(Vec<Todo>),
}

/// Resolve a fuzzy title against a snapshot, branching on cardinality.
///
/// Uses [`smart_search`] as the matching strategy, so tokens may hit the
/// title, the description, or the owning category's display name.
pub fn resolve(query: &str, todos: &[Todo], categories: &[Category]) -> Resolution {
    let mut matches = smart_search(query, todos, categories);
    match matches.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Resolved(matches.remove(0)),
        _ => Resolution::Ambiguous(matches),
    }
}

/// Find todos by title with a three-tier fallback.
///
/// 1. Exact title equality, case-sensitive as stored.
/// 2. Substring containment of the whole query (case-insensitive).
/// 3. Tokenized OR: any whitespace-separated word contained in the title.
///
/// Each tier short-circuits on the first tier with any results. An empty
/// result means "no match" and is not an error.
pub fn resolve_by_title(query: &str, todos: &[Todo]) -> Vec<Todo> {
    let exact: Vec<Todo> = todos
        .iter()
        .filter(|t| t.title == query)
        .cloned()
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    let query_lower = query.to_lowercase();
    let contains: Vec<Todo> = todos
        .iter()
        .filter(|t| t.title.to_lowercase().contains(&query_lower))
        .cloned()
        .collect();
    if !contains.is_empty() {
        return contains;
    }

    let words: Vec<&str> = query_lower.split_whitespace().collect();
    todos
        .iter()
        .filter(|t| {
            let title = t.title.to_lowercase();
            words.iter().any(|word| title.contains(word))
        })
        .cloned()
        .collect()
}

/// Find todos by description: phrase containment first, then a tokenized
/// OR across both title and description.
pub fn resolve_by_description(query: &str, todos: &[Todo]) -> Vec<Todo> {
    let query_lower = query.to_lowercase();

    let direct: Vec<Todo> = todos
        .iter()
        .filter(|t| t.description.to_lowercase().contains(&query_lower))
        .cloned()
        .collect();
    if !direct.is_empty() {
        return direct;
    }

    let words: Vec<&str> = query_lower.split_whitespace().collect();
    todos
        .iter()
        .filter(|t| {
            let title = t.title.to_lowercase();
            let description = t.description.to_lowercase();
            words
                .iter()
                .any(|word| title.contains(word) || description.contains(word))
        })
        .cloned()
        .collect()
}

/// Broad search: the query as a phrase or any individual token against
/// title and description, plus the query against the owning category's
/// display name.
///
/// Records are deduplicated by id (one record can satisfy several OR
/// clauses) and ordered ascending by title. When a category reference
/// dangles, the raw category id stands in for the display name.
pub fn smart_search(query: &str, todos: &[Todo], categories: &[Category]) -> Vec<Todo> {
    let query_lower = query.to_lowercase();
    let words: Vec<&str> = query_lower.split_whitespace().collect();
    let category_names: HashMap<&str, &str> = categories
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let mut seen = std::collections::HashSet::new();
    let mut matches: Vec<Todo> = todos
        .iter()
        .filter(|t| {
            let title = t.title.to_lowercase();
            let description = t.description.to_lowercase();
            let category = category_names
                .get(t.category.as_str())
                .copied()
                .unwrap_or(t.category.as_str())
                .to_lowercase();

            title.contains(&query_lower)
                || description.contains(&query_lower)
                || words
                    .iter()
                    .any(|word| title.contains(word) || description.contains(word))
                || category.contains(&query_lower)
        })
        .filter(|t| seen.insert(t.id.clone()))
        .cloned()
        .collect();

    matches.sort_by(|a, b| a.title.cmp(&b.title));
    matches
}
