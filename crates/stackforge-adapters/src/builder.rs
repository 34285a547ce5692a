//! Visual-builder entry point: one Adaptive resolve per edit.
//!
//! A [`BuilderSession`] holds the single live configuration of one builder
//! tab. Every widget click becomes a [`FieldEdit`]; the session applies it,
//! runs the shared resolver in Adaptive mode, and keeps the resulting
//! per-field notes for display. [`BuilderSession::options`] uses the
//! speculative check to grey out values that would not survive selection,
//! and the session can always be restored to an earlier configuration by
//! re-submitting it through the same resolve path — edits are reversible,
//! there is no separate undo machinery.

use std::collections::BTreeMap;

use tracing::debug;

use stackforge_core::domain::{FieldEdit, FieldId, SetMember, StackConfig};
use stackforge_core::error::StackforgeError;
use stackforge_core::resolver::{Change, Resolver, ResolverFault};
use stackforge_core::serialize::{decode_url_state, encode_url_state, serialize_command};

/// One selectable value in a rendered field widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionState {
    /// The edit choosing this option.
    pub edit: FieldEdit,
    /// Display label (the value's flag spelling).
    pub label: String,
    /// Whether the option is part of the current configuration.
    pub selected: bool,
    /// Whether choosing the option would survive resolution. Rendered
    /// greyed out when `false`.
    pub enabled: bool,
}

/// The state of one visual-builder session.
#[derive(Debug, Clone)]
pub struct BuilderSession {
    resolver: Resolver,
    config: StackConfig,
    notes: BTreeMap<FieldId, Vec<String>>,
    last_changes: Vec<Change>,
}

impl BuilderSession {
    /// Start a session on the default configuration.
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            config: stackforge_core::domain::registry::default_config(),
            notes: BTreeMap::new(),
            last_changes: Vec::new(),
        }
    }

    /// Restore a session from a shared link. A well-formed link is
    /// resolver-stable; a hand-edited one gets the same treatment as any
    /// other edit.
    pub fn from_url(resolver: Resolver, url: &str) -> Result<Self, StackforgeError> {
        let decoded = decode_url_state(url)?;
        let mut session = Self::new(resolver);
        session.restore(decoded)?;
        Ok(session)
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// The auto-corrections recorded by the most recent edit.
    pub fn last_changes(&self) -> &[Change] {
        &self.last_changes
    }

    /// Advisory notes for one field, from the most recent edit.
    pub fn notes(&self, field: FieldId) -> &[String] {
        self.notes.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Apply one widget edit and resolve.
    pub fn apply(&mut self, edit: FieldEdit) -> Result<&[Change], ResolverFault> {
        debug!(field = %edit.field(), "builder edit");
        let mut next = self.config.clone();
        next.apply_edit(&edit);
        self.commit(next)
    }

    /// Re-submit an earlier configuration through the same resolve path.
    pub fn restore(&mut self, config: StackConfig) -> Result<&[Change], ResolverFault> {
        self.commit(config)
    }

    fn commit(&mut self, raw: StackConfig) -> Result<&[Change], ResolverFault> {
        let resolution = self.resolver.resolve_adaptive(&raw)?;
        self.notes = resolution.notes();
        self.config = resolution.config;
        self.last_changes = resolution.changes;
        Ok(&self.last_changes)
    }

    /// The rendered option list for one field, with incompatible values
    /// greyed out via the speculative check.
    pub fn options(&self, field: FieldId) -> Vec<OptionState> {
        let scalars = field.scalar_domain().into_iter().map(|assign| OptionState {
            selected: self.config.current(field) == assign,
            label: assign.value_str(),
            enabled: self
                .resolver
                .is_compatible(&self.config, &FieldEdit::Set(assign.clone())),
            edit: FieldEdit::Set(assign),
        });
        let members = field.member_domain().into_iter().map(|member| OptionState {
            selected: self.member_selected(member),
            label: member.as_str().to_string(),
            enabled: self
                .resolver
                .is_compatible(&self.config, &FieldEdit::Toggle(member)),
            edit: FieldEdit::Toggle(member),
        });
        scalars.chain(members).collect()
    }

    /// The shareable link encoding the current configuration.
    pub fn share_url(&self) -> String {
        encode_url_state(&self.config)
    }

    /// The minimal command string reproducing the current configuration.
    pub fn command(&self) -> String {
        serialize_command(&self.config)
    }

    fn member_selected(&self, member: SetMember) -> bool {
        match member {
            SetMember::Frontend(f) => self.config.frontend.contains(&f),
            SetMember::Addon(a) => self.config.addons.contains(&a),
            SetMember::Example(e) => self.config.examples.contains(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackforge_core::domain::registry::default_config;
    use stackforge_core::domain::{Assign, Backend, Database, Frontend, Runtime};

    fn session() -> BuilderSession {
        BuilderSession::new(Resolver::new().unwrap())
    }

    #[test]
    fn new_session_starts_on_the_default_snapshot() {
        let session = session();
        assert_eq!(session.config(), &default_config());
        assert!(session.last_changes().is_empty());
    }

    #[test]
    fn edit_cascades_and_records_notes() {
        let mut session = session();
        session
            .apply(FieldEdit::Set(Assign::Backend(Backend::Convex)))
            .unwrap();
        assert_eq!(session.config().database, Database::None);
        assert!(!session.config().auth);
        // The database note explains why the field moved.
        assert!(!session.notes(FieldId::Database).is_empty());
        assert!(session.notes(FieldId::PackageManager).is_empty());
    }

    #[test]
    fn options_grey_out_incompatible_values() {
        let mut session = session();
        session
            .apply(FieldEdit::Set(Assign::Runtime(Runtime::Workers)))
            .unwrap();
        let options = session.options(FieldId::Database);
        let mongodb = options
            .iter()
            .find(|o| o.label == "mongodb")
            .expect("mongodb is in the database domain");
        assert!(!mongodb.enabled);
        let sqlite = options.iter().find(|o| o.label == "sqlite").unwrap();
        assert!(sqlite.enabled);
        assert!(sqlite.selected);
    }

    #[test]
    fn member_options_track_selection() {
        let session = session();
        let options = session.options(FieldId::Frontend);
        let tanstack = options
            .iter()
            .find(|o| o.label == "tanstack-router")
            .unwrap();
        assert!(tanstack.selected);
        let nuxt = options.iter().find(|o| o.label == "nuxt").unwrap();
        assert!(!nuxt.selected);
        assert!(nuxt.enabled);
    }

    #[test]
    fn restore_reverts_an_edit() {
        let mut session = session();
        let before = session.config().clone();
        session
            .apply(FieldEdit::Set(Assign::Backend(Backend::Convex)))
            .unwrap();
        assert_ne!(session.config(), &before);
        session.restore(before.clone()).unwrap();
        assert_eq!(session.config(), &before);
        assert!(session.last_changes().is_empty());
    }

    #[test]
    fn share_url_round_trips_the_session() {
        let mut session = session();
        session
            .apply(FieldEdit::Toggle(SetMember::Frontend(Frontend::Nuxt)))
            .unwrap();
        let url = session.share_url();
        let restored = BuilderSession::from_url(Resolver::new().unwrap(), &url).unwrap();
        assert_eq!(restored.config(), session.config());
    }

    #[test]
    fn command_reflects_the_current_configuration() {
        let mut session = session();
        session
            .apply(FieldEdit::Set(Assign::Database(Database::Postgres)))
            .unwrap();
        // The edit kept drizzle (compatible with postgres), which is not
        // the registry default for postgres, so both flags appear.
        assert_eq!(session.command(), "--database postgres --orm drizzle");
    }
}
