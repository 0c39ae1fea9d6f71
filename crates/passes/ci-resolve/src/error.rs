//! Resolution errors and "did you mean" suggestions

use ci_span::Line;
use ci_tree::{Program, TreeError};
use miette::Diagnostic;
use rustc_hash::FxHashSet;
use std::mem;
use thiserror::Error;

/// A single problem found while resolving a program
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ResolveError {
    /// Scope misuse reported by the tree, such as a redeclared local
    #[error(transparent)]
    #[diagnostic(transparent)]
    Tree(#[from] TreeError),

    /// No declaration of the name is visible from the reference
    #[error("cannot find `{name}` in this scope ({line})")]
    #[diagnostic(code(resolve::unresolved_identifier))]
    UnresolvedIdentifier {
        /// Name as written
        name: String,
        /// Line of the reference
        line: Line,
        /// Visible names close to `name`, best first
        suggestions: Vec<String>,
        /// Rendered suggestions
        #[help]
        help: Option<String>,
    },

    /// The selected type has no member of that name
    #[error("`{owner}` has no member `{name}` ({line})")]
    #[diagnostic(code(resolve::unresolved_member))]
    UnresolvedMember {
        /// Class or enum the member was looked up in
        owner: String,
        /// Member name as written
        name: String,
        /// Line of the member expression
        line: Line,
        /// Members close to `name`, best first
        suggestions: Vec<String>,
        /// Rendered suggestions
        #[help]
        help: Option<String>,
    },

    /// A member is selected from something that has no members
    #[error("cannot select `{name}` from {object} ({line})")]
    #[diagnostic(
        code(resolve::no_members),
        help("members live in classes, enums and values declared with those types")
    )]
    NoMembers {
        /// Member name as written
        name: String,
        /// What the member was selected from
        object: String,
        /// Line of the member expression
        line: Line,
    },

    /// A base class names no top-level type
    #[error("base class `{name}` of `{class}` is not declared ({line})")]
    #[diagnostic(code(resolve::unresolved_base_class))]
    UnresolvedBaseClass {
        /// Derived class
        class: String,
        /// Base class name as written
        name: String,
        /// Line of the class declaration
        line: Line,
        /// Rendered suggestions among declared classes
        #[help]
        help: Option<String>,
    },

    /// A base class names a type that is not a class
    #[error("`{name}` is a {kind}, so `{class}` cannot derive from it ({line})")]
    #[diagnostic(
        code(resolve::base_not_a_class),
        help("only classes can be used as base classes")
    )]
    BaseNotAClass {
        /// Derived class
        class: String,
        /// Base class name as written
        name: String,
        /// What `name` actually declares
        kind: &'static str,
        /// Line of the class declaration
        line: Line,
    },

    /// A class is its own ancestor
    #[error("class `{class}` inherits from itself ({line})")]
    #[diagnostic(code(resolve::cyclic_inheritance))]
    CyclicInheritance {
        /// A class on the cycle
        class: String,
        /// Line of its declaration
        line: Line,
    },

    /// `goto default` with no enclosing case clause
    #[error("`goto default` outside of a switch case ({line})")]
    #[diagnostic(code(resolve::goto_default_outside_switch))]
    GotoDefaultOutsideSwitch {
        /// Line of the `goto default`
        line: Line,
    },

    /// `goto default` in a switch that has no default clause
    #[error("`goto default` in a switch without a default clause ({line})")]
    #[diagnostic(code(resolve::goto_default_without_default))]
    GotoDefaultWithoutDefault {
        /// Line of the `goto default`
        line: Line,
    },

    /// The last case falls through, but no case follows it
    #[error("the last case of a switch cannot fall through ({line})")]
    #[diagnostic(
        code(resolve::fallthrough_from_last_case),
        help("use `goto default` or end the case body instead")
    )]
    FallthroughFromLastCase {
        /// Line of the fallthrough expression
        line: Line,
    },
}

impl ResolveError {
    /// Line the error points at
    pub const fn line(&self) -> Line {
        match self {
            Self::Tree(error) => error.line(),
            Self::UnresolvedIdentifier { line, .. }
            | Self::UnresolvedMember { line, .. }
            | Self::NoMembers { line, .. }
            | Self::UnresolvedBaseClass { line, .. }
            | Self::BaseNotAClass { line, .. }
            | Self::CyclicInheritance { line, .. }
            | Self::GotoDefaultOutsideSwitch { line }
            | Self::GotoDefaultWithoutDefault { line }
            | Self::FallthroughFromLastCase { line } => *line,
        }
    }
}

/// Resolution did not succeed
///
/// Carries every collected error and the program, exactly as it was passed
/// in.
#[derive(Error, Debug, Diagnostic)]
#[error("name resolution failed with {} error(s)", .errors.len())]
#[diagnostic(code(resolve::failed))]
pub struct ResolveFailure {
    /// Errors in the order they were found
    #[related]
    pub errors: Vec<ResolveError>,
    /// The unresolved program
    pub program: Box<Program>,
}

/// Picks the candidates closest to `target`, best first
///
/// The allowed distance shrinks with the length of `target`: at most
/// `max_distance`, and one edit per three chars beyond that. A candidate that
/// shares nothing with `target` is never suggested. Duplicates are ignored
/// and ties keep the order of `candidates`.
pub fn compute_suggestions<'name>(
    target: &str,
    candidates: impl IntoIterator<Item = &'name str>,
    max_distance: usize,
    max_count: usize,
) -> Vec<String> {
    let length = target.chars().count();
    let limit = max_distance.min(length / 3 + 1);
    let mut seen = FxHashSet::default();
    let mut scored: Vec<(&str, usize)> = candidates
        .into_iter()
        .filter(|candidate| *candidate != target && seen.insert(*candidate))
        .map(|candidate| (candidate, levenshtein_distance(target, candidate)))
        .filter(|(_, distance)| *distance <= limit && *distance < length)
        .collect();

    scored.sort_by_key(|(_, distance)| *distance);
    scored
        .into_iter()
        .take(max_count)
        .map(|(candidate, _)| candidate.to_owned())
        .collect()
}

/// Renders suggestions as a help line
pub fn suggestion_help(suggestions: &[String]) -> Option<String> {
    if suggestions.is_empty() {
        return None;
    }
    let names = suggestions
        .iter()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("did you mean {names}?"))
}

/// Edit distance between two strings, counted in chars
fn levenshtein_distance(source: &str, target: &str) -> usize {
    let target: Vec<char> = target.chars().collect();
    let mut previous: Vec<usize> = (0..=target.len()).collect();
    let mut current = vec![0; target.len() + 1];

    for (row, source_char) in source.chars().enumerate() {
        current[0] = row + 1;
        for (col, target_char) in target.iter().enumerate() {
            let cost = usize::from(source_char != *target_char);
            current[col + 1] = (previous[col + 1] + 1)
                .min(current[col] + 1)
                .min(previous[col] + cost);
        }
        mem::swap(&mut previous, &mut current);
    }

    previous[target.len()]
}
