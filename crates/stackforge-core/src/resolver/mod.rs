//! The fixpoint resolver.
//!
//! A single engine keeps every entry point (flags, prompts, visual builder)
//! consistent: it repeatedly applies the priority-ordered
//! [`rules::RULE_TABLE`] to a configuration until a full pass changes
//! nothing.
//!
//! Two operating contracts share the engine:
//!
//! - **Strict** ([`Resolver::resolve_strict`]) — used for flags. A patch
//!   that would override a field the user explicitly provided is a fatal
//!   conflict naming both inputs; nothing explicit is ever silently
//!   overridden. Patches to *inferred* fields still apply — filling a gap is
//!   inference, not correction.
//! - **Adaptive** ([`Resolver::resolve_adaptive`]) — used for prompts and
//!   the builder. Never fails with a user-facing error; every forced change
//!   is recorded as a [`Change`] and surfaced as a per-field note. The
//!   tie-break is fixed: the dependent field moves, never the driving field.
//!
//! The engine is pure and synchronous — no I/O, no globals — so calling it
//! after every keystroke or render is safe. Idempotence
//! (`resolve(resolve(s)) == resolve(s)` with zero further changes) is
//! enforced by tests.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::{debug, error};

use crate::domain::config::StackConfig;
use crate::domain::fields::{Assign, FieldEdit, FieldId, SetMember};

pub mod rules;

pub use rules::{RULE_TABLE, Rule};

/// Fixpoint iteration guard. A correctly authored rule table converges in a
/// handful of passes; hitting this limit is an authoring defect, never a
/// user error.
pub const MAX_PASSES: usize = 10;

// ── Outcome records ───────────────────────────────────────────────────────────

/// One Adaptive-mode auto-correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// The field that was rewritten.
    pub field: FieldId,
    /// The id of the rule that forced it.
    pub category: &'static str,
    /// Human-readable explanation, e.g.
    /// `--database set to sqlite (the mongodb driver does not run on workers)`.
    pub message: String,
}

/// A Strict-mode rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Two explicitly provided inputs are mutually incompatible.
    FatalFlagConflict,
    /// A value outside its field's declared domain reached the resolver.
    UnsupportedValue,
}

/// The result of an Adaptive resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub config: StackConfig,
    pub changes: Vec<Change>,
}

impl Resolution {
    /// Group change messages by field, for per-field advisory notes in the
    /// builder.
    pub fn notes(&self) -> BTreeMap<FieldId, Vec<String>> {
        let mut notes: BTreeMap<FieldId, Vec<String>> = BTreeMap::new();
        for change in &self.changes {
            notes.entry(change.field).or_default().push(change.message.clone());
        }
        notes
    }
}

// ── Failure types ─────────────────────────────────────────────────────────────

/// The fixpoint failed to converge within [`MAX_PASSES`]. Indicates a cyclic
/// or mis-prioritized rule in the table — an authoring defect, logged
/// distinctly from user-facing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("resolver failed to converge after {passes} passes (rule table authoring defect)")]
pub struct ResolverFault {
    pub passes: usize,
}

/// A Strict resolve outcome that is not a clean configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("configuration rejected: {}", format_rejections(.0))]
    Rejected(Vec<ValidationError>),

    #[error(transparent)]
    Fault(#[from] ResolverFault),
}

fn format_rejections(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Rule-table validation failures, rejected at construction — process
/// start — not per resolve call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleSetError {
    #[error("rules '{first}' and '{second}' share priority {priority}")]
    DuplicatePriority {
        first: &'static str,
        second: &'static str,
        priority: u8,
    },

    #[error("rule '{rule}' must read its driver field and never write it")]
    MisdeclaredDriver { rule: &'static str },

    #[error("dependency cycle among equal-precedence rules: {rules:?}")]
    DependencyCycle { rules: Vec<&'static str> },
}

// ── Resolver ──────────────────────────────────────────────────────────────────

/// The shared fixpoint engine. Construct once per process (or per session);
/// construction validates the rule table and fails fast on authoring errors.
#[derive(Debug, Clone)]
pub struct Resolver {
    /// Rules sorted by descending priority.
    rules: Vec<Rule>,
}

impl Resolver {
    /// Build a resolver over the built-in [`RULE_TABLE`].
    pub fn new() -> Result<Self, RuleSetError> {
        Self::with_rules(RULE_TABLE)
    }

    /// Build a resolver over a custom table. Used by tests; the validation
    /// is identical.
    pub fn with_rules(table: &[Rule]) -> Result<Self, RuleSetError> {
        validate_table(table)?;
        let mut rules = table.to_vec();
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(Self { rules })
    }

    /// Adaptive resolve: always produces a configuration, recording every
    /// forced change. The only failure is [`ResolverFault`], which a
    /// correctly authored table never produces.
    pub fn resolve_adaptive(&self, initial: &StackConfig) -> Result<Resolution, ResolverFault> {
        let (config, changes, _) = self.run(initial, None)?;
        Ok(Resolution { config, changes })
    }

    /// Strict resolve: `explicit` is the set of fields the user explicitly
    /// provided. Stops at the end of the first pass that found a conflict
    /// and reports every conflict of that pass.
    pub fn resolve_strict(
        &self,
        initial: &StackConfig,
        explicit: &BTreeSet<FieldId>,
    ) -> Result<StackConfig, ResolveError> {
        let (config, _, errors) = self.run(initial, Some(explicit))?;
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ResolveError::Rejected(errors))
        }
    }

    /// Speculative compatibility check: would `edit` survive an Adaptive
    /// resolve? Pure and side-effect-free; used to grey out options in a UI
    /// before commitment.
    ///
    /// Toggling an already-selected set member off is always legal.
    pub fn is_compatible(&self, current: &StackConfig, edit: &FieldEdit) -> bool {
        let mut candidate = current.clone();
        if let FieldEdit::Toggle(member) = edit {
            if member_selected(current, *member) {
                return true;
            }
        }
        candidate.apply_edit(edit);

        let resolved = match self.resolve_adaptive(&candidate) {
            Ok(resolution) => resolution.config,
            Err(fault) => {
                error!(%fault, "speculative resolve faulted");
                return false;
            }
        };

        match edit {
            FieldEdit::Set(assign) => resolved.current(assign.field()) == *assign,
            FieldEdit::Toggle(member) => member_selected(&resolved, *member),
        }
    }

    /// The shared pass loop.
    ///
    /// In strict mode, the pass that records a conflict is the last one: its
    /// conflicting patches are withheld (the explicit value stays), so the
    /// loop must not continue from a half-patched state.
    fn run(
        &self,
        initial: &StackConfig,
        explicit: Option<&BTreeSet<FieldId>>,
    ) -> Result<(StackConfig, Vec<Change>, Vec<ValidationError>), ResolverFault> {
        let mut cfg = initial.clone();
        let mut changes = Vec::new();

        for pass in 0..MAX_PASSES {
            let mut dirty = false;
            let mut errors = Vec::new();

            for rule in &self.rules {
                if !(rule.predicate)(&cfg) {
                    continue;
                }
                let patch = (rule.patch)(&cfg);
                for assign in patch {
                    let field = assign.field();
                    debug_assert!(
                        rule.writes.contains(&field),
                        "{}: undeclared write to {field}",
                        rule.id
                    );
                    if cfg.current(field) == assign {
                        continue;
                    }
                    if explicit.is_some_and(|e| e.contains(&field)) {
                        errors.push(conflict(rule, &cfg, &assign));
                        continue;
                    }
                    debug!(
                        rule = rule.id,
                        field = %field,
                        value = %assign.value_str(),
                        pass,
                        "rule applied"
                    );
                    let message =
                        format!("--{} set to {} ({})", field.flag(), assign.value_str(), rule.note);
                    cfg.apply(&assign);
                    changes.push(Change {
                        field,
                        category: rule.id,
                        message,
                    });
                    dirty = true;
                }
            }

            if !errors.is_empty() {
                return Ok((cfg, changes, errors));
            }
            if !dirty {
                return Ok((cfg, changes, errors));
            }
        }

        error!(
            passes = MAX_PASSES,
            "resolver failed to converge; the rule table is cyclic or mis-prioritized"
        );
        Err(ResolverFault { passes: MAX_PASSES })
    }
}

fn member_selected(cfg: &StackConfig, member: SetMember) -> bool {
    match member {
        SetMember::Frontend(f) => cfg.frontend.contains(&f),
        SetMember::Addon(a) => cfg.addons.contains(&a),
        SetMember::Example(e) => cfg.examples.contains(&e),
    }
}

fn conflict(rule: &Rule, cfg: &StackConfig, forced: &Assign) -> ValidationError {
    let field = forced.field();
    ValidationError {
        code: ErrorCode::FatalFlagConflict,
        message: format!(
            "--{} {} conflicts with --{} {}: {} (would force --{} {})",
            rule.driver.flag(),
            cfg.value_str(rule.driver),
            field.flag(),
            cfg.value_str(field),
            rule.note,
            field.flag(),
            forced.value_str(),
        ),
    }
}

// ── Table validation ──────────────────────────────────────────────────────────

/// Startup validation of a rule table.
///
/// Priorities must be unique (the table is totally ordered) and each rule's
/// driver must be read, never written. Within a priority band, the
/// reads/writes dependency graph must be acyclic: rules in the same band
/// share a precedence slot, so a cycle among them cannot be linearized by
/// priority and is a true authoring cycle. Cross-band cycles are broken by
/// the band order; the iteration guard backstops the rest at runtime.
fn validate_table(table: &[Rule]) -> Result<(), RuleSetError> {
    for (i, a) in table.iter().enumerate() {
        if !a.reads.contains(&a.driver) || a.writes.contains(&a.driver) {
            return Err(RuleSetError::MisdeclaredDriver { rule: a.id });
        }
        for b in &table[i + 1..] {
            if a.priority == b.priority {
                return Err(RuleSetError::DuplicatePriority {
                    first: a.id,
                    second: b.id,
                    priority: a.priority,
                });
            }
        }
    }

    // In-band cycle detection (iterative DFS, three colors).
    let depends = |from: &Rule, to: &Rule| {
        from.writes
            .iter()
            .any(|w| to.reads.contains(w) && *w != to.driver)
    };
    let bands: BTreeSet<u8> = table.iter().map(Rule::band).collect();
    for band in bands {
        let members: Vec<&Rule> = table.iter().filter(|r| r.band() == band).collect();
        let n = members.len();
        let mut color = vec![0u8; n]; // 0 = white, 1 = gray, 2 = black
        for start in 0..n {
            if color[start] != 0 {
                continue;
            }
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
            color[start] = 1;
            while let Some(frame) = stack.last_mut() {
                let (node, succ) = (frame.0, frame.1);
                if succ >= n {
                    color[node] = 2;
                    stack.pop();
                    continue;
                }
                frame.1 += 1;
                if succ == node || !depends(members[node], members[succ]) {
                    continue;
                }
                match color[succ] {
                    1 => {
                        let mut cycle: Vec<&'static str> =
                            stack.iter().map(|&(i, _)| members[i].id).collect();
                        cycle.push(members[succ].id);
                        return Err(RuleSetError::DependencyCycle { rules: cycle });
                    }
                    0 => {
                        color[succ] = 1;
                        stack.push((succ, 0));
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
