//! Static validation for parsed scripts
//!
//! Loading never fails on a broken graph; this pass reports what the
//! interpreter would stop on, plus a few quality warnings, before a run.

use crate::types::script::{EventNode, ScriptDocument};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Playable, but probably not what the author meant
    Warning,
    /// The interpreter terminates when it reaches this
    Error,
}

/// A single finding about one event (or the whole script when `event` is `None`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub event: Option<String>,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.event {
            Some(event) => write!(f, "{level}: [{event}] {}", self.message),
            None => write!(f, "{level}: {}", self.message),
        }
    }
}

/// Result of script validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckResult {
    pub findings: Vec<Finding>,
}

impl CheckResult {
    /// Whether no finding would stop a run
    pub fn is_valid(&self) -> bool {
        !self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    fn push(&mut self, severity: Severity, event: &str, message: String) {
        self.findings.push(Finding {
            severity,
            event: Some(event.to_string()),
            message,
        });
    }
}

/// Perform static validation on a script
///
/// This function checks for:
/// - Malformed events
/// - Successor keys that name no event
/// - Choices with no selectable option or an unmapped option
/// - Branch keys that match no option
/// - Dialogue events without lines
/// - Loops made only of dialogue events without lines
/// - Events that no path from the first event reaches
pub fn check(doc: &ScriptDocument) -> CheckResult {
    let mut result = CheckResult::default();

    if doc.is_empty() {
        result.findings.push(Finding {
            severity: Severity::Warning,
            event: None,
            message: "script has no events".to_string(),
        });
        return result;
    }

    for (key, node) in doc.iter() {
        match node {
            EventNode::Malformed { reason } => {
                result.push(Severity::Error, key, reason.clone());
            }
            EventNode::Dialogue(dialogue) => {
                if dialogue.lines.is_empty() {
                    result.push(
                        Severity::Warning,
                        key,
                        "dialogue has no lines and is skipped".to_string(),
                    );
                }
                if let Some(next) = &dialogue.next {
                    if !doc.contains(next) {
                        result.push(
                            Severity::Error,
                            key,
                            format!("'next' names undefined event '{next}'"),
                        );
                    }
                }
            }
            EventNode::Choice(choice) => {
                if choice.options.is_empty() {
                    result.push(
                        Severity::Error,
                        key,
                        "choice offers no options".to_string(),
                    );
                }
                for option in &choice.options {
                    match &option.target {
                        None => result.push(
                            Severity::Error,
                            key,
                            format!("option '{}' has no branch", option.key),
                        ),
                        Some(target) if !doc.contains(target) => result.push(
                            Severity::Error,
                            key,
                            format!(
                                "option '{}' branches to undefined event '{target}'",
                                option.key
                            ),
                        ),
                        Some(_) => {}
                    }
                }
                for branch in &choice.unmatched_branches {
                    result.push(
                        Severity::Warning,
                        key,
                        format!("branch '{branch}' matches no option"),
                    );
                }
            }
        }
    }

    for cycle in empty_dialogue_cycles(doc) {
        result.push(
            Severity::Error,
            cycle[0],
            format!(
                "events without lines form a cycle: {} -> {}",
                cycle.join(" -> "),
                cycle[0]
            ),
        );
    }

    let reachable = reachable_events(doc);
    for key in doc.keys() {
        if !reachable.contains(key) {
            result.push(
                Severity::Warning,
                key,
                "event is never reached".to_string(),
            );
        }
    }

    result
}

/// Where a dialogue goes after its last line: `next`, else the following key
fn dialogue_successor<'a>(doc: &'a ScriptDocument, key: &str) -> Option<&'a str> {
    match doc.get(key) {
        Some(EventNode::Dialogue(dialogue)) => match &dialogue.next {
            Some(next) => Some(next.as_str()),
            None => doc.key_after(key),
        },
        _ => None,
    }
}

fn is_empty_dialogue(doc: &ScriptDocument, key: &str) -> bool {
    matches!(doc.get(key), Some(EventNode::Dialogue(d)) if d.lines.is_empty())
}

/// Loops made only of dialogues without lines, each listed once from its
/// earliest member in document order
fn empty_dialogue_cycles(doc: &ScriptDocument) -> Vec<Vec<&str>> {
    let mut cycles = Vec::new();
    let mut in_cycle: HashSet<&str> = HashSet::new();

    for start in doc.keys() {
        if !is_empty_dialogue(doc, start) || in_cycle.contains(start) {
            continue;
        }

        let mut path = vec![start];
        let mut current = start;
        while let Some(next) = dialogue_successor(doc, current) {
            if !is_empty_dialogue(doc, next) {
                break;
            }
            if let Some(pos) = path.iter().position(|k| *k == next) {
                let cycle = path.split_off(pos);
                if cycle.iter().all(|k| !in_cycle.contains(k)) {
                    in_cycle.extend(cycle.iter().copied());
                    cycles.push(cycle);
                }
                break;
            }
            path.push(next);
            current = next;
        }
    }

    cycles
}

/// Keys reachable from the first event by successor resolution or choice
fn reachable_events(doc: &ScriptDocument) -> HashSet<&str> {
    let mut reachable = HashSet::new();
    let mut queue = VecDeque::new();

    if let Some(first) = doc.first_key() {
        reachable.insert(first);
        queue.push_back(first);
    }

    while let Some(key) = queue.pop_front() {
        let successors: Vec<&str> = match doc.get(key) {
            Some(EventNode::Dialogue(_)) => dialogue_successor(doc, key).into_iter().collect(),
            Some(EventNode::Choice(choice)) => choice
                .options
                .iter()
                .filter_map(|o| o.target.as_deref())
                .collect(),
            Some(EventNode::Malformed { .. }) | None => Vec::new(),
        };

        for next in successors {
            if doc.contains(next) && reachable.insert(next) {
                queue.push_back(next);
            }
        }
    }

    reachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::load;

    #[test]
    fn check_valid_script_has_no_findings() {
        let json = r#"{"events": {
            "intro": {"type": "dialogue", "data": [{"line": "Hi"}], "next": "q1"},
            "q1": {
                "type": "choice",
                "data": {"prompt": {"text": "Go?"}, "yes": {"text": "Yes"}, "no": {"text": "No"}},
                "branches": {"yes": "end_y", "no": "end_n"}
            },
            "end_y": {"type": "dialogue", "data": [{"line": "Great"}], "next": "end_n"},
            "end_n": {"type": "dialogue", "data": [{"line": "Bye"}]}
        }}"#;

        let result = check(&load(json).unwrap());

        assert!(result.is_valid());
        assert!(result.findings.is_empty(), "{:?}", result.findings);
    }

    #[test]
    fn check_reports_dangling_successors() {
        let json = r#"{"events": {
            "a": {"type": "dialogue", "data": [{}], "next": "nowhere"},
            "q": {
                "type": "choice",
                "data": {"x": {"text": "X"}, "y": {"text": "Y"}},
                "branches": {"x": "missing"}
            }
        }}"#;

        let result = check(&load(json).unwrap());

        assert!(!result.is_valid());
        let messages: Vec<String> = result.errors().map(|f| f.message.clone()).collect();
        assert!(messages.iter().any(|m| m.contains("nowhere")));
        assert!(messages.iter().any(|m| m.contains("'x'") && m.contains("missing")));
        assert!(messages.iter().any(|m| m.contains("'y' has no branch")));
    }

    #[test]
    fn check_reports_malformed_and_empty_choice() {
        let json = r#"{"events": {
            "a": {"type": "teleport"},
            "b": {"type": "choice", "data": {"prompt": {"text": "?"}}, "branches": {}}
        }}"#;

        let result = check(&load(json).unwrap());

        let errors: Vec<&Finding> = result.errors().collect();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].event.as_deref(), Some("a"));
        assert!(errors[0].message.contains("teleport"));
        assert_eq!(errors[1].event.as_deref(), Some("b"));
        assert!(errors[1].message.contains("no options"));
    }

    #[test]
    fn check_warns_about_unreachable_and_empty_events() {
        let json = r#"{"events": {
            "a": {"type": "dialogue", "data": [], "next": "c"},
            "b": {"type": "dialogue", "data": [{}]},
            "c": {"type": "dialogue", "data": [{}]}
        }}"#;

        let result = check(&load(json).unwrap());

        assert!(result.is_valid());
        let warnings: Vec<String> = result.warnings().map(|f| f.to_string()).collect();
        assert_eq!(
            warnings,
            vec![
                "warning: [a] dialogue has no lines and is skipped".to_string(),
                "warning: [b] event is never reached".to_string(),
            ]
        );
    }

    #[test]
    fn check_warns_about_unmatched_branch() {
        let json = r#"{"events": {
            "q": {
                "type": "choice",
                "data": {"x": {"text": "X"}},
                "branches": {"x": "q", "ghost": "q"}
            }
        }}"#;

        let result = check(&load(json).unwrap());

        assert!(result.is_valid());
        let warnings: Vec<&Finding> = result.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("ghost"));
    }

    #[test]
    fn check_rejects_cycle_of_empty_dialogues() {
        let json = r#"{"events": {
            "a": {"type": "dialogue", "data": [], "next": "b"},
            "b": {"type": "dialogue", "data": [], "next": "a"}
        }}"#;
        let doc = load(json).unwrap();

        let result = check(&doc);

        assert!(!result.is_valid());
        let errors: Vec<String> = result.errors().map(|f| f.to_string()).collect();
        assert_eq!(
            errors,
            vec!["error: [a] events without lines form a cycle: a -> b -> a".to_string()]
        );

        let mut interpreter = crate::Interpreter::new(doc, crate::HeadlessBackend::new());
        interpreter.start().unwrap();
        assert_eq!(
            interpreter.termination(),
            Some(crate::Termination::ScriptError)
        );
    }

    #[test]
    fn check_allows_empty_dialogue_loop_through_a_line() {
        let json = r#"{"events": {
            "a": {"type": "dialogue", "data": [], "next": "b"},
            "b": {"type": "dialogue", "data": [{"line": "again"}], "next": "a"}
        }}"#;

        let result = check(&load(json).unwrap());

        assert!(result.is_valid());
    }

    #[test]
    fn check_empty_script_warns() {
        let result = check(&load("{}").unwrap());
        assert!(result.is_valid());
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].event, None);
    }
}
