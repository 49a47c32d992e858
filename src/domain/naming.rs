//! Display names for subject and goal codes.
//!
//! Codes are open-ended; anything missing from the tables falls back to a
//! humanized form of the code itself.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeKind {
    Subject,
    Goal,
}

const SUBJECTS: &[(&str, &str)] = &[
    ("math101", "Math 101"),
    ("prog101", "Programming Fundamentals"),
    ("bus101", "Business Ethics"),
    ("stats101", "Statistics 101"),
    ("eng101", "English Literature"),
    ("phy101", "Physics 101"),
    ("chem101", "Chemistry 101"),
    ("bio101", "Biology 101"),
    ("eco101", "Economics 101"),
    ("acc101", "Accounting 101"),
];

const GOALS: &[(&str, &str)] = &[
    ("midterm", "Midterm Review"),
    ("homework", "Homework Help"),
    ("project", "Project Discussion"),
    ("final", "Final Exam Prep"),
    ("assignment", "Assignment Help"),
    ("presentation", "Presentation Practice"),
    ("study", "General Study Session"),
];

/// Resolve a code against the built-in tables only.
pub fn resolve_name(code: &str, kind: CodeKind) -> String {
    let table = match kind {
        CodeKind::Subject => SUBJECTS,
        CodeKind::Goal => GOALS,
    };
    table
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| humanize(code))
}

/// `dataScience` -> `Data Science`. Codes without capitals come back as-is.
pub fn humanize(code: &str) -> String {
    if !code.chars().any(char::is_uppercase) {
        return code.to_string();
    }

    let mut out = String::with_capacity(code.len() + 4);
    for (i, ch) in code.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
            continue;
        }
        if ch.is_uppercase() {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Built-in tables plus per-deployment overrides from config.
#[derive(Debug, Clone, Default)]
pub struct NameResolver {
    subjects: HashMap<String, String>,
    goals: HashMap<String, String>,
}

impl NameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides<S, G>(subjects: S, goals: G) -> Self
    where
        S: IntoIterator<Item = (String, String)>,
        G: IntoIterator<Item = (String, String)>,
    {
        Self {
            subjects: subjects.into_iter().collect(),
            goals: goals.into_iter().collect(),
        }
    }

    pub fn resolve(&self, code: &str, kind: CodeKind) -> String {
        let overrides = match kind {
            CodeKind::Subject => &self.subjects,
            CodeKind::Goal => &self.goals,
        };
        match overrides.get(code) {
            Some(name) => name.clone(),
            None => resolve_name(code, kind),
        }
    }

    pub fn subject(&self, code: &str) -> String {
        self.resolve(code, CodeKind::Subject)
    }

    pub fn goal(&self, code: &str) -> String {
        self.resolve(code, CodeKind::Goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(resolve_name("math101", CodeKind::Subject), "Math 101");
        assert_eq!(resolve_name("final", CodeKind::Goal), "Final Exam Prep");
    }

    #[test]
    fn test_tables_are_separate() {
        assert_eq!(resolve_name("midterm", CodeKind::Subject), "midterm");
        assert_eq!(resolve_name("math101", CodeKind::Goal), "math101");
    }

    #[test]
    fn test_lowercase_unknown_code_unchanged() {
        for code in ["newcode", "cs999", "", "x-ray_2", "ünïcode"] {
            assert_eq!(resolve_name(code, CodeKind::Subject), code);
            assert_eq!(resolve_name(code, CodeKind::Goal), code);
        }
    }

    #[test]
    fn test_camel_case_is_humanized() {
        assert_eq!(humanize("dataScience"), "Data Science");
        assert_eq!(humanize("groupProjectWork"), "Group Project Work");
        assert_eq!(humanize("Linear"), "Linear");
        assert_eq!(humanize("ML"), "M L");
    }

    #[test]
    fn test_overrides_take_precedence() {
        let resolver = NameResolver::with_overrides(
            [("math101".to_string(), "Calculus I".to_string())],
            [("lab".to_string(), "Lab Prep".to_string())],
        );
        assert_eq!(resolver.subject("math101"), "Calculus I");
        assert_eq!(resolver.subject("bio101"), "Biology 101");
        assert_eq!(resolver.goal("lab"), "Lab Prep");
        assert_eq!(resolver.goal("unknownGoal"), "Unknown Goal");
    }
}
