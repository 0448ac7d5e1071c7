//! Diagnostic contexts for validation
//!
//! A checker writes failure frames into a context as it descends through a
//! value. Two behaviors exist: the noop context answers pass/fail as cheaply
//! as possible (used by `test` and by the exploratory first pass of
//! `check`/`validate`), while the detail context records enough to render
//! the failing sub-path, including the best candidate across union branches
//! and parallel failures across intersection/inheritance forks.

use crate::error::ErrorDetail;
use std::fmt::Write as _;

/// Path component attached to a failure frame, borrowed at the fail site
#[derive(Debug, Clone, Copy)]
pub enum Key<'a> {
    /// No path component
    None,
    /// Property name component
    Prop(&'a str),
    /// Array index component
    Index(usize),
}

#[derive(Debug, Clone)]
enum OwnedKey {
    Prop(String),
    Index(usize),
}

/// One recorded failure step: path component, message and tie-break weight
///
/// Scores: 0 for generic failures and key-only descent annotations (the
/// descent itself is captured as path depth), 1 for a missing property,
/// 2 for an extraneous key, -1 for a literal/enum mismatch.
#[derive(Debug, Clone)]
struct Frame {
    key: Option<OwnedKey>,
    message: Option<String>,
    score: i32,
}

/// Allocation-free context that only answers whether anything failed
#[derive(Debug, Default)]
pub struct NoopContext {
    failed: bool,
}

/// Context that records failure frames for diagnostics
///
/// Frames of the current chain are stored leaf-first; sealed forks become
/// parallel `branches`, each a failure of one conjunct, property or element.
#[derive(Debug, Default)]
pub struct DetailContext {
    frames: Vec<Frame>,
    branches: Vec<DetailContext>,
    fork: Option<Box<DetailContext>>,
}

impl DetailContext {
    /// The context (or open fork) all new failures are routed into
    fn innermost(&mut self) -> &mut DetailContext {
        match self.fork {
            Some(ref mut fork) => fork.innermost(),
            None => self,
        }
    }

    fn open_fork(&mut self) {
        self.innermost().fork = Some(Box::default());
    }

    /// Seal the innermost open fork, keeping it as a branch if it failed
    fn seal_fork(&mut self) {
        match self.fork.take() {
            Some(mut fork) if fork.fork.is_some() => {
                fork.seal_fork();
                self.fork = Some(fork);
            }
            Some(fork) => {
                if fork.failed() {
                    self.branches.push(*fork);
                }
            }
            None => {}
        }
    }

    fn push(&mut self, key: Key<'_>, message: Option<&str>, score: i32) {
        let key = match key {
            Key::None => None,
            Key::Prop(name) => Some(OwnedKey::Prop(name.to_string())),
            Key::Index(index) => Some(OwnedKey::Index(index)),
        };
        self.frames.push(Frame {
            key,
            message: message.map(str::to_string),
            score,
        });
    }

    fn failed(&self) -> bool {
        !self.frames.is_empty()
            || !self.branches.is_empty()
            || self.fork.as_ref().is_some_and(|fork| fork.failed())
    }

    /// Deepest path depth reached by any recorded failure
    fn depth(&self) -> usize {
        let own = self.frames.iter().filter(|frame| frame.key.is_some()).count();
        own + self
            .branches
            .iter()
            .map(DetailContext::depth)
            .max()
            .unwrap_or(0)
    }

    /// Cumulative score over all recorded frames
    fn score(&self) -> i32 {
        self.frames.iter().map(|frame| frame.score).sum::<i32>()
            + self.branches.iter().map(DetailContext::score).sum::<i32>()
    }

    /// Flatten recorded failures into path/message entries, most specific
    /// first. Frames are leaf-first, so the path is assembled by walking
    /// them in reverse; branches hang off the fully extended path.
    fn collect(&self, prefix: &str, out: &mut Vec<ErrorDetail>) {
        let mut path = prefix.to_string();
        let mut own = Vec::new();
        for frame in self.frames.iter().rev() {
            match &frame.key {
                Some(OwnedKey::Prop(name)) => {
                    path.push('.');
                    path.push_str(name);
                }
                Some(OwnedKey::Index(index)) => {
                    let _ = write!(path, "[{}]", index);
                }
                None => {}
            }
            if let Some(message) = &frame.message {
                own.push(ErrorDetail {
                    path: path.clone(),
                    message: message.clone(),
                });
            }
        }
        own.reverse();
        for branch in &self.branches {
            branch.collect(&path, out);
        }
        out.extend(own);
    }
}

/// Diagnostic context handed to compiled checkers
#[derive(Debug)]
pub enum Context {
    /// Pass/fail only
    Noop(NoopContext),
    /// Full failure recording
    Detail(DetailContext),
}

impl Context {
    /// Create a noop context
    pub fn noop() -> Context {
        Context::Noop(NoopContext::default())
    }

    /// Create a detail context
    pub fn detail() -> Context {
        Context::Detail(DetailContext::default())
    }

    /// Record a failure and return `false`
    pub fn fail(&mut self, key: Key<'_>, message: Option<&str>, score: i32) -> bool {
        match self {
            Context::Noop(noop) => noop.failed = true,
            Context::Detail(detail) => detail.innermost().push(key, message, score),
        }
        false
    }

    /// Open an isolated fork for one conjunct, base, property or element
    pub fn fork(&mut self) {
        if let Context::Detail(detail) = self {
            detail.open_fork();
        }
    }

    /// Merge the most recent fork back; returns whether validation should
    /// continue. Detail contexts accumulate (always `true`); the noop
    /// context short-circuits as soon as anything failed.
    pub fn complete_fork(&mut self) -> bool {
        match self {
            Context::Noop(noop) => !noop.failed,
            Context::Detail(detail) => {
                detail.seal_fork();
                true
            }
        }
    }

    /// Whether any failure was recorded
    pub fn failed(&self) -> bool {
        match self {
            Context::Noop(noop) => noop.failed,
            Context::Detail(detail) => detail.failed(),
        }
    }

    /// Create a resolver for evaluating union alternatives
    pub fn union_resolver(&self) -> UnionResolver {
        match self {
            Context::Noop(_) => UnionResolver::Noop(Context::noop()),
            Context::Detail(_) => UnionResolver::Detail(Vec::new()),
        }
    }

    /// Resolve a failed union: promote the most informative branch into
    /// this context. Returns `true` if a branch was promoted, in which case
    /// the union's generic summary should be suppressed.
    pub fn resolve_union(&mut self, resolver: UnionResolver) -> bool {
        let (detail, contexts) = match (self, resolver) {
            (Context::Detail(detail), UnionResolver::Detail(contexts)) => (detail, contexts),
            _ => return false,
        };

        let mut best: Option<(usize, usize, i32)> = None;
        for (index, ctx) in contexts.iter().enumerate() {
            let Context::Detail(candidate) = ctx else {
                continue;
            };
            let depth = candidate.depth();
            let score = candidate.score();
            let better = match best {
                None => true,
                Some((_, best_depth, best_score)) => {
                    depth > best_depth || (depth == best_depth && score > best_score)
                }
            };
            if better {
                best = Some((index, depth, score));
            }
        }

        match best {
            Some((index, depth, score)) if depth > 0 || score > 0 => {
                if let Some(Context::Detail(winner)) = contexts.into_iter().nth(index) {
                    detail.innermost().branches.push(winner);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Render recorded failures as path/message entries rooted at
    /// `root_path`, most specific first. Empty when nothing failed or for
    /// noop contexts.
    pub fn error_details(&self, root_path: &str) -> Vec<ErrorDetail> {
        match self {
            Context::Noop(_) => Vec::new(),
            Context::Detail(detail) => {
                let mut collected = Vec::new();
                detail.collect(root_path, &mut collected);
                // Sibling conjuncts can record the same failure; report it
                // once.
                let mut out: Vec<ErrorDetail> = Vec::with_capacity(collected.len());
                for entry in collected {
                    if !out.contains(&entry) {
                        out.push(entry);
                    }
                }
                if out.is_empty() && detail.failed() {
                    out.push(ErrorDetail {
                        path: root_path.to_string(),
                        message: "is invalid".to_string(),
                    });
                }
                out
            }
        }
    }
}

/// Per-union diagnostic helper: one child context per alternative
#[derive(Debug)]
pub enum UnionResolver {
    /// Reuses a single noop child, reset per alternative
    Noop(Context),
    /// One detail child per alternative, resolved after all fail
    Detail(Vec<Context>),
}

impl UnionResolver {
    /// Context for evaluating the next union alternative
    pub fn next_context(&mut self) -> &mut Context {
        match self {
            UnionResolver::Noop(ctx) => {
                if let Context::Noop(noop) = ctx {
                    noop.failed = false;
                }
                ctx
            }
            UnionResolver::Detail(contexts) => {
                contexts.push(Context::detail());
                contexts.last_mut().expect("context just pushed")
            }
        }
    }
}
