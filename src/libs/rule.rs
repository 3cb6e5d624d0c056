//! Window-title classification rules.
//!
//! A rule maps a case-insensitive substring of the window title to a project
//! and, optionally, one of its tasks. Rules are evaluated in definition order
//! and the first match wins.

/// A classification rule with the names of its targets joined in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub id: i64,
    pub pattern: String,
    pub project_id: i64,
    pub project_name: String,
    pub task_id: Option<i64>,
    pub task_name: Option<String>,
}

impl Rule {
    /// Case-insensitive substring test against a window title.
    ///
    /// Blank patterns never match; storage refuses to create them.
    pub fn matches(&self, window_title: &str) -> bool {
        let pattern = self.pattern.trim();
        !pattern.is_empty() && window_title.to_lowercase().contains(&pattern.to_lowercase())
    }
}

pub struct RuleMatcher;

impl RuleMatcher {
    /// Returns the first rule, in list order, matching `window_title`.
    pub fn first_match<'a>(rules: &'a [Rule], window_title: &str) -> Option<&'a Rule> {
        rules.iter().find(|rule| rule.matches(window_title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: i64, pattern: &str, project_id: i64, task_id: Option<i64>) -> Rule {
        Rule {
            id,
            pattern: pattern.to_string(),
            project_id,
            project_name: format!("P{}", project_id),
            task_id,
            task_name: task_id.map(|t| format!("T{}", t)),
        }
    }

    #[test]
    fn first_rule_wins_when_several_match() {
        let rules = vec![rule(1, "vscode", 1, Some(1)), rule(2, "code", 2, None)];

        let matched = RuleMatcher::first_match(&rules, "MyFile - VSCode").unwrap();
        assert_eq!(matched.id, 1);

        let matched = RuleMatcher::first_match(&rules, "MyFile - Visual Studio Code").unwrap();
        assert_eq!(matched.id, 2);
    }

    #[test]
    fn order_decides_not_specificity() {
        let rules = vec![rule(1, "code", 2, None), rule(2, "visual studio code", 1, Some(1))];
        let matched = RuleMatcher::first_match(&rules, "MyFile - Visual Studio Code").unwrap();
        assert_eq!(matched.id, 1);
    }

    #[test]
    fn matching_ignores_case() {
        let rules = vec![rule(1, "GitHub", 1, None)];
        assert!(RuleMatcher::first_match(&rules, "pull requests · github - firefox").is_some());
    }

    #[test]
    fn no_match_yields_none() {
        let rules = vec![rule(1, "slack", 1, None)];
        assert!(RuleMatcher::first_match(&rules, "Terminal").is_none());
        assert!(RuleMatcher::first_match(&[], "Terminal").is_none());
    }

    #[test]
    fn blank_patterns_are_skipped() {
        let rules = vec![rule(1, "  ", 1, None), rule(2, "term", 2, None)];
        assert_eq!(RuleMatcher::first_match(&rules, "Terminal").unwrap().id, 2);
    }
}
