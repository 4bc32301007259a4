//! Name completion
//!
//! Candidates come from three disjoint name classes, scanned in a fixed
//! order: functions (declaration order), constants (declaration order), then
//! implicit variables (creation order). Variables are read from the live
//! registry, so names created by earlier lines are offered as well.

use crate::registry::Registry;

/// Class of a completion candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Function,
    Constant,
    Variable,
}

impl CandidateKind {
    /// Character inserted after an accepted candidate
    pub fn append_char(self) -> char {
        match self {
            Self::Function => '(',
            Self::Constant | Self::Variable => ' ',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub kind: CandidateKind,
}

impl Candidate {
    /// Text that replaces the completed word
    pub fn replacement(&self) -> String {
        let mut text = self.name.clone();
        text.push(self.kind.append_char());
        text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Functions,
    Constants,
    Variables,
    Done,
}

/// Resumable scan over the registry for one prefix
#[derive(Debug, Clone, Default)]
pub struct CompletionCursor {
    phase: Phase,
    function: usize,
    constant: usize,
    variable: usize,
    prefix: String,
}

impl CompletionCursor {
    pub fn new(prefix: &str) -> Self {
        let mut cursor = Self::default();
        cursor.reset(prefix);
        cursor
    }

    /// Rewind all three scans and remember `prefix`.
    pub fn reset(&mut self, prefix: &str) {
        *self = Self {
            prefix: prefix.to_string(),
            ..Self::default()
        };
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Next matching name, or `None` once every class is exhausted.
    pub fn next(&mut self, registry: &Registry) -> Option<Candidate> {
        loop {
            match self.phase {
                Phase::Functions => {
                    let functions = registry.functions();
                    while let Some(function) = functions.get(self.function) {
                        self.function += 1;
                        if function.name().starts_with(&self.prefix) {
                            return Some(Candidate {
                                name: function.name().to_string(),
                                kind: CandidateKind::Function,
                            });
                        }
                    }
                    self.phase = Phase::Constants;
                },
                Phase::Constants => {
                    let constants = registry.constant_names();
                    while let Some(name) = constants.get(self.constant) {
                        self.constant += 1;
                        if name.starts_with(&self.prefix) {
                            return Some(Candidate {
                                name: name.clone(),
                                kind: CandidateKind::Constant,
                            });
                        }
                    }
                    self.phase = Phase::Variables;
                },
                Phase::Variables => {
                    while let Some(name) = registry.variable_name(self.variable) {
                        self.variable += 1;
                        if name.starts_with(&self.prefix) {
                            return Some(Candidate {
                                name,
                                kind: CandidateKind::Variable,
                            });
                        }
                    }
                    self.phase = Phase::Done;
                },
                Phase::Done => return None,
            }
        }
    }
}

/// Readline-style generator: `state == 0` starts a new scan for `prefix`,
/// any other value continues the previous one.
pub fn next_candidate(
    registry: &Registry,
    cursor: &mut CompletionCursor,
    prefix: &str,
    state: usize,
) -> Option<Candidate> {
    if state == 0 {
        cursor.reset(prefix);
    }
    cursor.next(registry)
}

/// All candidates for `prefix`, in offering order
pub fn complete(registry: &Registry, prefix: &str) -> Vec<Candidate> {
    let mut cursor = CompletionCursor::new(prefix);
    std::iter::from_fn(|| cursor.next(registry)).collect()
}
