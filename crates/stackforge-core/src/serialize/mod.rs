//! Serialized forms of a resolved configuration.
//!
//! Two codecs share this module, both built on the flag names in
//! [`FieldId::flag`] so the CLI, the command serializer, and the URL state
//! can never drift apart:
//!
//! - [`command`] — the minimal flag string that reproduces a resolved
//!   configuration, and its inverse parser.
//! - [`url`] — the one-parameter-per-field query string the builder
//!   persists as a shareable link.

use std::collections::BTreeSet;
use std::str::FromStr;

use crate::domain::error::DomainError;
use crate::domain::fields::{Arity, Assign, EMPTY_SET_SENTINEL, FieldId};

pub mod command;
pub mod url;

pub use command::{minimal_flags, parse_command, serialize_command};
pub use url::{decode_url_state, encode_url_state};

/// Parse a raw value string into an assignment, honouring the field's arity.
///
/// Set-valued fields take a comma-joined member list or the `none` sentinel
/// for the empty set.
pub fn parse_assign(field: FieldId, raw: &str) -> Result<Assign, DomainError> {
    match field.arity() {
        Arity::Single => field.parse_scalar(raw),
        Arity::Multi => parse_set(field, raw),
    }
}

/// Parse a comma-joined member list (or the `none` sentinel) for a
/// set-valued field.
pub fn parse_set(field: FieldId, raw: &str) -> Result<Assign, DomainError> {
    match field {
        FieldId::Frontend => Ok(Assign::Frontend(parse_members(raw)?)),
        FieldId::Addons => Ok(Assign::Addons(parse_members(raw)?)),
        FieldId::Examples => Ok(Assign::Examples(parse_members(raw)?)),
        _ => Err(DomainError::MalformedInput {
            source_kind: "field value",
            reason: format!("{} is single-valued", field.flag()),
        }),
    }
}

fn parse_members<T>(raw: &str) -> Result<BTreeSet<T>, DomainError>
where
    T: FromStr<Err = DomainError> + Ord,
{
    if raw.trim() == EMPTY_SET_SENTINEL {
        return Ok(BTreeSet::new());
    }
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(T::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Addon, Frontend};

    #[test]
    fn parse_assign_dispatches_on_arity() {
        assert!(matches!(
            parse_assign(FieldId::Backend, "hono").unwrap(),
            Assign::Backend(_)
        ));
        assert_eq!(
            parse_assign(FieldId::Frontend, "nuxt,native").unwrap(),
            Assign::Frontend(BTreeSet::from([Frontend::Nuxt, Frontend::Native]))
        );
    }

    #[test]
    fn sentinel_parses_to_empty_set() {
        assert_eq!(
            parse_set(FieldId::Addons, "none").unwrap(),
            Assign::Addons(BTreeSet::new())
        );
    }

    #[test]
    fn member_list_tolerates_spacing() {
        assert_eq!(
            parse_set(FieldId::Addons, "pwa, biome").unwrap(),
            Assign::Addons(BTreeSet::from([Addon::Pwa, Addon::Biome]))
        );
    }

    #[test]
    fn unknown_member_errors() {
        assert!(parse_set(FieldId::Examples, "todo,blog").is_err());
    }

    #[test]
    fn parse_set_rejects_scalar_fields() {
        assert!(parse_set(FieldId::Backend, "hono").is_err());
    }
}
