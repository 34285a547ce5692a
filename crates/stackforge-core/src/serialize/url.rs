//! URL query-string persistence for the visual builder.
//!
//! The builder persists a configuration as a shareable link: one query
//! parameter per field, set values comma-joined, the empty set spelled as
//! the `none` sentinel. All field values are kebab-case identifiers, so no
//! percent-encoding is required.
//!
//! Contract: `decode_url_state(encode_url_state(s)) == s` for any
//! resolver-stable `s`. Decoding tolerates missing parameters (they fall
//! back to conditional defaults) so old links keep working when fields are
//! added.

use crate::domain::config::{PartialConfig, StackConfig};
use crate::domain::error::DomainError;
use crate::domain::fields::FieldId;

use super::parse_assign;

/// Encode a configuration as a query string, one parameter per field.
pub fn encode_url_state(cfg: &StackConfig) -> String {
    FieldId::ALL
        .iter()
        .map(|field| format!("{}={}", field.flag(), cfg.value_str(*field)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Decode a query string back into a configuration.
///
/// Unknown parameter names and malformed pairs are errors; absent
/// parameters take their conditional defaults.
pub fn decode_url_state(input: &str) -> Result<StackConfig, DomainError> {
    let mut partial = PartialConfig::default();

    for pair in input
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
    {
        let (name, value) = pair.split_once('=').ok_or_else(|| DomainError::MalformedInput {
            source_kind: "URL state",
            reason: format!("expected name=value, found '{pair}'"),
        })?;
        let field = FieldId::from_flag(name).ok_or_else(|| DomainError::MalformedInput {
            source_kind: "URL state",
            reason: format!("unknown parameter '{name}'"),
        })?;
        partial.set(parse_assign(field, value)?);
    }

    Ok(partial.into_config())
}
