//! Field identifiers and typed field assignments.
//!
//! [`FieldId`] names the fourteen stack fields. [`Assign`] is a typed
//! single-field write — the unit a rule patch is made of and the unit the
//! resolver diffs, applies, and reports. Keeping the write typed means the
//! engine can stay generic over fields without ever leaving the enum domains.

use std::collections::BTreeSet;
use std::fmt;

use crate::domain::error::DomainError;
use crate::domain::value_objects::{
    Addon, ApiStyle, Backend, Database, DbSetup, Example, Frontend, Orm, PackageManager, Runtime,
    WebDeploy,
};

// ── Field identity ────────────────────────────────────────────────────────────

/// One configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    Backend,
    Runtime,
    Database,
    DbSetup,
    Orm,
    Frontend,
    Api,
    Auth,
    Addons,
    Examples,
    WebDeploy,
    PackageManager,
    Git,
    Install,
}

/// Whether a field holds one value or a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Single,
    Multi,
}

impl FieldId {
    /// All fields, in default-computation order: a field's conditional
    /// default may only read fields that appear before it here.
    pub const ALL: &'static [FieldId] = &[
        Self::Backend,
        Self::Runtime,
        Self::Database,
        Self::DbSetup,
        Self::Orm,
        Self::Frontend,
        Self::Api,
        Self::Auth,
        Self::Addons,
        Self::Examples,
        Self::WebDeploy,
        Self::PackageManager,
        Self::Git,
        Self::Install,
    ];

    /// The long flag name (also the URL query parameter name).
    pub const fn flag(&self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Runtime => "runtime",
            Self::Database => "database",
            Self::DbSetup => "db-setup",
            Self::Orm => "orm",
            Self::Frontend => "frontend",
            Self::Api => "api",
            Self::Auth => "auth",
            Self::Addons => "addons",
            Self::Examples => "examples",
            Self::WebDeploy => "web-deploy",
            Self::PackageManager => "package-manager",
            Self::Git => "git",
            Self::Install => "install",
        }
    }

    pub const fn arity(&self) -> Arity {
        match self {
            Self::Frontend | Self::Addons | Self::Examples => Arity::Multi,
            _ => Arity::Single,
        }
    }

    pub const fn is_boolean(&self) -> bool {
        matches!(self, Self::Auth | Self::Git | Self::Install)
    }

    /// Whether the empty set is a legal resolved state. All three set-valued
    /// fields allow it (a project with no frontend, no addons, or no
    /// examples is valid).
    pub const fn allows_empty(&self) -> bool {
        matches!(self.arity(), Arity::Multi)
    }

    /// Look a field up by its flag / query-parameter name.
    pub fn from_flag(name: &str) -> Option<FieldId> {
        Self::ALL.iter().copied().find(|f| f.flag() == name)
    }

    /// Every legal assignment for a single-valued field, in domain order.
    /// Empty for set-valued fields; those enumerate via
    /// [`FieldId::member_domain`].
    pub fn scalar_domain(&self) -> Vec<Assign> {
        match self {
            Self::Backend => Backend::ALL.iter().copied().map(Assign::Backend).collect(),
            Self::Runtime => Runtime::ALL.iter().copied().map(Assign::Runtime).collect(),
            Self::Database => Database::ALL.iter().copied().map(Assign::Database).collect(),
            Self::DbSetup => DbSetup::ALL.iter().copied().map(Assign::DbSetup).collect(),
            Self::Orm => Orm::ALL.iter().copied().map(Assign::Orm).collect(),
            Self::Api => ApiStyle::ALL.iter().copied().map(Assign::Api).collect(),
            Self::WebDeploy => WebDeploy::ALL.iter().copied().map(Assign::WebDeploy).collect(),
            Self::PackageManager => PackageManager::ALL
                .iter()
                .copied()
                .map(Assign::PackageManager)
                .collect(),
            Self::Auth => vec![Assign::Auth(true), Assign::Auth(false)],
            Self::Git => vec![Assign::Git(true), Assign::Git(false)],
            Self::Install => vec![Assign::Install(true), Assign::Install(false)],
            Self::Frontend | Self::Addons | Self::Examples => Vec::new(),
        }
    }

    /// Every member of a set-valued field's domain. Empty for scalar fields.
    pub fn member_domain(&self) -> Vec<SetMember> {
        match self {
            Self::Frontend => Frontend::ALL
                .iter()
                .copied()
                .map(SetMember::Frontend)
                .collect(),
            Self::Addons => Addon::ALL.iter().copied().map(SetMember::Addon).collect(),
            Self::Examples => Example::ALL
                .iter()
                .copied()
                .map(SetMember::Example)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Parse a raw string into an assignment for a single-valued field.
    ///
    /// Multi-valued fields go through [`FieldId::parse_member`] instead.
    pub fn parse_scalar(&self, raw: &str) -> Result<Assign, DomainError> {
        match self {
            Self::Backend => Ok(Assign::Backend(raw.parse()?)),
            Self::Runtime => Ok(Assign::Runtime(raw.parse()?)),
            Self::Database => Ok(Assign::Database(raw.parse()?)),
            Self::DbSetup => Ok(Assign::DbSetup(raw.parse()?)),
            Self::Orm => Ok(Assign::Orm(raw.parse()?)),
            Self::Api => Ok(Assign::Api(raw.parse()?)),
            Self::WebDeploy => Ok(Assign::WebDeploy(raw.parse()?)),
            Self::PackageManager => Ok(Assign::PackageManager(raw.parse()?)),
            Self::Auth => Ok(Assign::Auth(parse_bool(self.flag(), raw)?)),
            Self::Git => Ok(Assign::Git(parse_bool(self.flag(), raw)?)),
            Self::Install => Ok(Assign::Install(parse_bool(self.flag(), raw)?)),
            Self::Frontend | Self::Addons | Self::Examples => {
                Err(DomainError::MalformedInput {
                    source_kind: "field edit",
                    reason: format!("{} is set-valued; toggle a member instead", self.flag()),
                })
            }
        }
    }

    /// Parse a raw string into a set member for a multi-valued field.
    pub fn parse_member(&self, raw: &str) -> Result<SetMember, DomainError> {
        match self {
            Self::Frontend => Ok(SetMember::Frontend(raw.parse()?)),
            Self::Addons => Ok(SetMember::Addon(raw.parse()?)),
            Self::Examples => Ok(SetMember::Example(raw.parse()?)),
            _ => Err(DomainError::MalformedInput {
                source_kind: "field edit",
                reason: format!("{} is single-valued; assign a value instead", self.flag()),
            }),
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

fn parse_bool(field: &'static str, raw: &str) -> Result<bool, DomainError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        other => Err(DomainError::UnsupportedValue {
            field,
            value: other.to_string(),
            supported: vec!["true", "false"],
        }),
    }
}

// ── Typed assignments ─────────────────────────────────────────────────────────

/// A typed write to exactly one field. Rule patches, registry defaults, and
/// builder edits are all expressed as `Assign`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assign {
    Backend(Backend),
    Runtime(Runtime),
    Database(Database),
    DbSetup(DbSetup),
    Orm(Orm),
    Frontend(BTreeSet<Frontend>),
    Api(ApiStyle),
    Auth(bool),
    Addons(BTreeSet<Addon>),
    Examples(BTreeSet<Example>),
    WebDeploy(WebDeploy),
    PackageManager(PackageManager),
    Git(bool),
    Install(bool),
}

impl Assign {
    pub const fn field(&self) -> FieldId {
        match self {
            Self::Backend(_) => FieldId::Backend,
            Self::Runtime(_) => FieldId::Runtime,
            Self::Database(_) => FieldId::Database,
            Self::DbSetup(_) => FieldId::DbSetup,
            Self::Orm(_) => FieldId::Orm,
            Self::Frontend(_) => FieldId::Frontend,
            Self::Api(_) => FieldId::Api,
            Self::Auth(_) => FieldId::Auth,
            Self::Addons(_) => FieldId::Addons,
            Self::Examples(_) => FieldId::Examples,
            Self::WebDeploy(_) => FieldId::WebDeploy,
            Self::PackageManager(_) => FieldId::PackageManager,
            Self::Git(_) => FieldId::Git,
            Self::Install(_) => FieldId::Install,
        }
    }

    /// Human/flag rendering of the assigned value. Set values are
    /// comma-joined; the empty set renders as the `none` sentinel.
    pub fn value_str(&self) -> String {
        match self {
            Self::Backend(v) => v.as_str().into(),
            Self::Runtime(v) => v.as_str().into(),
            Self::Database(v) => v.as_str().into(),
            Self::DbSetup(v) => v.as_str().into(),
            Self::Orm(v) => v.as_str().into(),
            Self::Api(v) => v.as_str().into(),
            Self::WebDeploy(v) => v.as_str().into(),
            Self::PackageManager(v) => v.as_str().into(),
            Self::Auth(v) | Self::Git(v) | Self::Install(v) => v.to_string(),
            Self::Frontend(set) => join_set(set.iter().map(Frontend::as_str)),
            Self::Addons(set) => join_set(set.iter().map(Addon::as_str)),
            Self::Examples(set) => join_set(set.iter().map(Example::as_str)),
        }
    }
}

impl fmt::Display for Assign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field(), self.value_str())
    }
}

/// The empty-set sentinel used by flags and URL state.
pub const EMPTY_SET_SENTINEL: &str = "none";

fn join_set<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let joined: Vec<&str> = items.collect();
    if joined.is_empty() {
        EMPTY_SET_SENTINEL.to_string()
    } else {
        joined.join(",")
    }
}

// ── Set edits ─────────────────────────────────────────────────────────────────

/// One member of a set-valued field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMember {
    Frontend(Frontend),
    Addon(Addon),
    Example(Example),
}

impl SetMember {
    pub const fn field(&self) -> FieldId {
        match self {
            Self::Frontend(_) => FieldId::Frontend,
            Self::Addon(_) => FieldId::Addons,
            Self::Example(_) => FieldId::Examples,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Frontend(v) => v.as_str(),
            Self::Addon(v) => v.as_str(),
            Self::Example(v) => v.as_str(),
        }
    }
}

/// A single user edit, as the visual builder and the speculative check see
/// it: either a scalar replacement or a set-member toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Set(Assign),
    Toggle(SetMember),
}

impl FieldEdit {
    pub const fn field(&self) -> FieldId {
        match self {
            Self::Set(assign) => assign.field(),
            Self::Toggle(member) => member.field(),
        }
    }

    /// Parse a `(field, raw value)` pair into an edit, honouring the field's
    /// arity.
    pub fn parse(field: FieldId, raw: &str) -> Result<FieldEdit, DomainError> {
        match field.arity() {
            Arity::Single => Ok(FieldEdit::Set(field.parse_scalar(raw)?)),
            Arity::Multi => Ok(FieldEdit::Toggle(field.parse_member(raw)?)),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_names_are_unique() {
        let mut seen = BTreeSet::new();
        for f in FieldId::ALL {
            assert!(seen.insert(f.flag()), "duplicate flag {}", f.flag());
        }
        assert_eq!(seen.len(), 14);
    }

    #[test]
    fn from_flag_round_trips() {
        for f in FieldId::ALL {
            assert_eq!(FieldId::from_flag(f.flag()), Some(*f));
        }
        assert_eq!(FieldId::from_flag("framework"), None);
    }

    #[test]
    fn arity_matches_field_kind() {
        assert_eq!(FieldId::Backend.arity(), Arity::Single);
        assert_eq!(FieldId::Frontend.arity(), Arity::Multi);
        assert!(FieldId::Frontend.allows_empty());
        assert!(!FieldId::Backend.allows_empty());
    }

    #[test]
    fn parse_scalar_rejects_set_fields() {
        assert!(FieldId::Frontend.parse_scalar("nuxt").is_err());
        assert!(FieldId::Backend.parse_scalar("hono").is_ok());
    }

    #[test]
    fn parse_member_rejects_scalar_fields() {
        assert!(FieldId::Backend.parse_member("hono").is_err());
        assert_eq!(
            FieldId::Frontend.parse_member("nuxt").unwrap(),
            SetMember::Frontend(Frontend::Nuxt)
        );
    }

    #[test]
    fn boolean_parsing_accepts_aliases() {
        assert_eq!(
            FieldId::Auth.parse_scalar("on").unwrap(),
            Assign::Auth(true)
        );
        assert_eq!(
            FieldId::Git.parse_scalar("false").unwrap(),
            Assign::Git(false)
        );
        assert!(FieldId::Install.parse_scalar("maybe").is_err());
    }

    #[test]
    fn domains_match_arity() {
        for field in FieldId::ALL {
            match field.arity() {
                Arity::Single => {
                    assert!(!field.scalar_domain().is_empty(), "{field} has no domain");
                    assert!(field.member_domain().is_empty());
                }
                Arity::Multi => {
                    assert!(field.scalar_domain().is_empty());
                    assert!(!field.member_domain().is_empty(), "{field} has no domain");
                }
            }
        }
    }

    #[test]
    fn scalar_domain_assigns_its_own_field() {
        for field in FieldId::ALL {
            for assign in field.scalar_domain() {
                assert_eq!(assign.field(), *field);
            }
            for member in field.member_domain() {
                assert_eq!(member.field(), *field);
            }
        }
    }

    #[test]
    fn empty_set_renders_sentinel() {
        let assign = Assign::Addons(BTreeSet::new());
        assert_eq!(assign.value_str(), "none");
    }

    #[test]
    fn set_renders_comma_joined() {
        let assign = Assign::Frontend(BTreeSet::from([Frontend::TanstackRouter, Frontend::Native]));
        assert_eq!(assign.value_str(), "tanstack-router,native");
    }

    #[test]
    fn edit_parse_honours_arity() {
        assert!(matches!(
            FieldEdit::parse(FieldId::Database, "postgres").unwrap(),
            FieldEdit::Set(Assign::Database(Database::Postgres))
        ));
        assert!(matches!(
            FieldEdit::parse(FieldId::Addons, "pwa").unwrap(),
            FieldEdit::Toggle(SetMember::Addon(Addon::Pwa))
        ));
    }
}
