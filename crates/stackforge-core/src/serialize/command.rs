//! Minimal reproducible command serialization.
//!
//! [`serialize_command`] is the inverse mapping from a resolved
//! configuration back to the smallest flag string that reproduces it: a
//! flag is emitted only where the resolved value differs from the
//! registry's conditional default for that field *in the resolved state*.
//! Booleans whose non-default is `false` emit a negated `--no-*` flag;
//! set-valued fields emit the `none` sentinel for the empty set.
//!
//! [`parse_command`] is the inverse: a flag string back to the partial
//! configuration (with its explicit-field set implied by `Some`ness).

use crate::domain::config::{PartialConfig, StackConfig};
use crate::domain::error::DomainError;
use crate::domain::fields::{Assign, FieldId};
use crate::domain::registry;

use super::parse_assign;

/// The minimal flag list reproducing `cfg`, in field-precedence order.
pub fn minimal_flags(cfg: &StackConfig) -> Vec<String> {
    let mut flags = Vec::new();
    for field in FieldId::ALL {
        let current = cfg.current(*field);
        if current == registry::default_for(*field, cfg) {
            continue;
        }
        match current {
            Assign::Auth(on) | Assign::Git(on) | Assign::Install(on) => {
                if on {
                    flags.push(format!("--{}", field.flag()));
                } else {
                    flags.push(format!("--no-{}", field.flag()));
                }
            }
            other => {
                flags.push(format!("--{}", field.flag()));
                flags.push(other.value_str());
            }
        }
    }
    flags
}

/// The minimal flag string reproducing `cfg`. Empty for the default
/// configuration.
pub fn serialize_command(cfg: &StackConfig) -> String {
    minimal_flags(cfg).join(" ")
}

/// Parse a flag string produced by [`serialize_command`] (or typed by a
/// user) back into a partial configuration.
///
/// Accepted grammar: `--<flag> <value>` for scalar and set fields,
/// `--<flag>` / `--no-<flag>` for booleans.
pub fn parse_command(input: &str) -> Result<PartialConfig, DomainError> {
    let mut partial = PartialConfig::default();
    let mut tokens = input.split_whitespace();

    while let Some(token) = tokens.next() {
        let Some(name) = token.strip_prefix("--") else {
            return Err(DomainError::MalformedInput {
                source_kind: "command string",
                reason: format!("expected a flag, found '{token}'"),
            });
        };

        if let Some(bare) = name.strip_prefix("no-") {
            if let Some(field) = FieldId::from_flag(bare) {
                if field.is_boolean() {
                    partial.set(field.parse_scalar("false")?);
                    continue;
                }
            }
        }

        let field = FieldId::from_flag(name).ok_or_else(|| DomainError::MalformedInput {
            source_kind: "command string",
            reason: format!("unknown flag --{name}"),
        })?;

        if field.is_boolean() {
            partial.set(field.parse_scalar("true")?);
        } else {
            let value = tokens.next().ok_or_else(|| DomainError::MalformedInput {
                source_kind: "command string",
                reason: format!("--{name} requires a value"),
            })?;
            partial.set(parse_assign(field, value)?);
        }
    }

    Ok(partial)
}
