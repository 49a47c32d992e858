use std::cmp::Reverse;

use crate::domain::model::Group;
use crate::domain::naming::NameResolver;

/// Case-insensitive substring search over friendly subject name, friendly
/// goal name, id and location. Results come newest first.
///
/// An empty term is the caller's business; it matches every group here.
pub fn search(term: &str, groups: &[Group], names: &NameResolver) -> Vec<Group> {
    let needle = term.trim().to_lowercase();

    let mut hits: Vec<Group> = groups
        .iter()
        .filter(|group| matches_term(group, &needle, names))
        .cloned()
        .collect();

    // Groups without a parseable timestamp sink to the end, stable otherwise.
    hits.sort_by_key(|group| Reverse(group.created_timestamp()));
    hits
}

fn matches_term(group: &Group, needle: &str, names: &NameResolver) -> bool {
    let fields = [
        names.subject(&group.subject),
        names.goal(&group.goal),
        group.id.to_string(),
        group.location.clone(),
    ];
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}
