//! The stack configuration aggregate.
//!
//! [`StackConfig`] is the Configuration: one typed value per field. A config
//! is cloned per session from the registry's immutable default snapshot and
//! only ever mutated through typed [`Assign`]s / [`FieldEdit`]s, so every
//! value stays inside its declared domain by construction.
//!
//! [`PartialConfig`] is the overlay all three entry points produce (parsed
//! flags, a completed prompt sequence, a decoded URL): `Option`-typed fields,
//! where `Some` means *explicitly provided by the user* — the distinction
//! Strict mode is built on.
//!
//! # Domain purity
//!
//! This module must not import `tracing`. Observability is the
//! responsibility of the resolver and CLI layers, not the domain.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::fields::{Assign, FieldEdit, FieldId, SetMember};
use crate::domain::registry;
use crate::domain::value_objects::{
    Addon, ApiStyle, Backend, Database, DbSetup, Example, Frontend, Orm, PackageManager, Runtime,
    WebDeploy,
};

// ── StackConfig ───────────────────────────────────────────────────────────────

/// A complete stack selection. Every field always holds a value from its
/// declared domain; whether the *combination* is consistent is the
/// resolver's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackConfig {
    pub backend: Backend,
    pub runtime: Runtime,
    pub database: Database,
    pub db_setup: DbSetup,
    pub orm: Orm,
    pub frontend: BTreeSet<Frontend>,
    pub api: ApiStyle,
    pub auth: bool,
    pub addons: BTreeSet<Addon>,
    pub examples: BTreeSet<Example>,
    pub web_deploy: WebDeploy,
    pub package_manager: PackageManager,
    pub git: bool,
    pub install: bool,
}

impl StackConfig {
    /// Snapshot the current value of one field as a typed assignment.
    pub fn current(&self, field: FieldId) -> Assign {
        match field {
            FieldId::Backend => Assign::Backend(self.backend),
            FieldId::Runtime => Assign::Runtime(self.runtime),
            FieldId::Database => Assign::Database(self.database),
            FieldId::DbSetup => Assign::DbSetup(self.db_setup),
            FieldId::Orm => Assign::Orm(self.orm),
            FieldId::Frontend => Assign::Frontend(self.frontend.clone()),
            FieldId::Api => Assign::Api(self.api),
            FieldId::Auth => Assign::Auth(self.auth),
            FieldId::Addons => Assign::Addons(self.addons.clone()),
            FieldId::Examples => Assign::Examples(self.examples.clone()),
            FieldId::WebDeploy => Assign::WebDeploy(self.web_deploy),
            FieldId::PackageManager => Assign::PackageManager(self.package_manager),
            FieldId::Git => Assign::Git(self.git),
            FieldId::Install => Assign::Install(self.install),
        }
    }

    /// Flag-style rendering of one field's current value.
    pub fn value_str(&self, field: FieldId) -> String {
        self.current(field).value_str()
    }

    /// Apply a typed assignment. Returns `true` when the value actually
    /// changed — the signal the fixpoint loop keys on.
    pub fn apply(&mut self, assign: &Assign) -> bool {
        if self.current(assign.field()) == *assign {
            return false;
        }
        match assign.clone() {
            Assign::Backend(v) => self.backend = v,
            Assign::Runtime(v) => self.runtime = v,
            Assign::Database(v) => self.database = v,
            Assign::DbSetup(v) => self.db_setup = v,
            Assign::Orm(v) => self.orm = v,
            Assign::Frontend(v) => self.frontend = v,
            Assign::Api(v) => self.api = v,
            Assign::Auth(v) => self.auth = v,
            Assign::Addons(v) => self.addons = v,
            Assign::Examples(v) => self.examples = v,
            Assign::WebDeploy(v) => self.web_deploy = v,
            Assign::PackageManager(v) => self.package_manager = v,
            Assign::Git(v) => self.git = v,
            Assign::Install(v) => self.install = v,
        }
        true
    }

    /// Toggle one member of a set-valued field, honouring the field's
    /// selection semantics: picking a *web* frontend replaces any other web
    /// frontend (single web app per project), while `native` and all addon /
    /// example members toggle independently.
    pub fn toggle(&mut self, member: SetMember) {
        match member {
            SetMember::Frontend(fe) => {
                if !self.frontend.remove(&fe) {
                    if registry::is_web_frontend(fe) {
                        self.frontend.retain(|f| !registry::is_web_frontend(*f));
                    }
                    self.frontend.insert(fe);
                }
            }
            SetMember::Addon(addon) => {
                if !self.addons.remove(&addon) {
                    self.addons.insert(addon);
                }
            }
            SetMember::Example(example) => {
                if !self.examples.remove(&example) {
                    self.examples.insert(example);
                }
            }
        }
    }

    /// Apply a single builder edit (scalar replace or set toggle).
    pub fn apply_edit(&mut self, edit: &FieldEdit) {
        match edit {
            FieldEdit::Set(assign) => {
                self.apply(assign);
            }
            FieldEdit::Toggle(member) => self.toggle(*member),
        }
    }
}

// ── PartialConfig ─────────────────────────────────────────────────────────────

/// An `Option`-typed overlay over [`StackConfig`]: `Some` marks a field the
/// user explicitly provided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialConfig {
    pub backend: Option<Backend>,
    pub runtime: Option<Runtime>,
    pub database: Option<Database>,
    pub db_setup: Option<DbSetup>,
    pub orm: Option<Orm>,
    pub frontend: Option<BTreeSet<Frontend>>,
    pub api: Option<ApiStyle>,
    pub auth: Option<bool>,
    pub addons: Option<BTreeSet<Addon>>,
    pub examples: Option<BTreeSet<Example>>,
    pub web_deploy: Option<WebDeploy>,
    pub package_manager: Option<PackageManager>,
    pub git: Option<bool>,
    pub install: Option<bool>,
}

impl PartialConfig {
    pub fn is_empty(&self) -> bool {
        self.provided_fields().is_empty()
    }

    /// The fields this overlay explicitly sets.
    pub fn provided_fields(&self) -> BTreeSet<FieldId> {
        FieldId::ALL
            .iter()
            .copied()
            .filter(|f| self.get(*f).is_some())
            .collect()
    }

    pub fn get(&self, field: FieldId) -> Option<Assign> {
        match field {
            FieldId::Backend => self.backend.map(Assign::Backend),
            FieldId::Runtime => self.runtime.map(Assign::Runtime),
            FieldId::Database => self.database.map(Assign::Database),
            FieldId::DbSetup => self.db_setup.map(Assign::DbSetup),
            FieldId::Orm => self.orm.map(Assign::Orm),
            FieldId::Frontend => self.frontend.clone().map(Assign::Frontend),
            FieldId::Api => self.api.map(Assign::Api),
            FieldId::Auth => self.auth.map(Assign::Auth),
            FieldId::Addons => self.addons.clone().map(Assign::Addons),
            FieldId::Examples => self.examples.clone().map(Assign::Examples),
            FieldId::WebDeploy => self.web_deploy.map(Assign::WebDeploy),
            FieldId::PackageManager => self.package_manager.map(Assign::PackageManager),
            FieldId::Git => self.git.map(Assign::Git),
            FieldId::Install => self.install.map(Assign::Install),
        }
    }

    pub fn set(&mut self, assign: Assign) {
        match assign {
            Assign::Backend(v) => self.backend = Some(v),
            Assign::Runtime(v) => self.runtime = Some(v),
            Assign::Database(v) => self.database = Some(v),
            Assign::DbSetup(v) => self.db_setup = Some(v),
            Assign::Orm(v) => self.orm = Some(v),
            Assign::Frontend(v) => self.frontend = Some(v),
            Assign::Api(v) => self.api = Some(v),
            Assign::Auth(v) => self.auth = Some(v),
            Assign::Addons(v) => self.addons = Some(v),
            Assign::Examples(v) => self.examples = Some(v),
            Assign::WebDeploy(v) => self.web_deploy = Some(v),
            Assign::PackageManager(v) => self.package_manager = Some(v),
            Assign::Git(v) => self.git = Some(v),
            Assign::Install(v) => self.install = Some(v),
        }
    }

    /// Fill any unset field from `seeds` (e.g. config-file defaults). Seeded
    /// values do NOT count as explicitly provided — capture
    /// [`PartialConfig::provided_fields`] before merging.
    pub fn merge_under(&mut self, seeds: &PartialConfig) {
        for field in FieldId::ALL {
            if self.get(*field).is_none() {
                if let Some(assign) = seeds.get(*field) {
                    self.set(assign);
                }
            }
        }
    }

    /// Materialise a full configuration: explicit values overlay the default
    /// snapshot, then every *unset* field is recomputed through
    /// [`registry::default_for`] in default-computation order, so
    /// conditional defaults (ORM from database, API from frontend, ...) see
    /// the user's choices.
    pub fn into_config(self) -> StackConfig {
        let mut cfg = registry::default_config();
        let provided = self.provided_fields();
        for field in FieldId::ALL {
            if let Some(assign) = self.get(*field) {
                cfg.apply(&assign);
            }
        }
        for field in FieldId::ALL {
            if !provided.contains(field) {
                let assign = registry::default_for(*field, &cfg);
                cfg.apply(&assign);
            }
        }
        cfg
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_reports_change() {
        let mut cfg = registry::default_config();
        assert!(!cfg.apply(&Assign::Backend(Backend::Hono)));
        assert!(cfg.apply(&Assign::Backend(Backend::Express)));
        assert_eq!(cfg.backend, Backend::Express);
    }

    #[test]
    fn current_round_trips_every_field() {
        let cfg = registry::default_config();
        for field in FieldId::ALL {
            let snapshot = cfg.current(*field);
            let mut copy = cfg.clone();
            assert!(!copy.apply(&snapshot), "{field} snapshot changed config");
        }
    }

    #[test]
    fn toggling_web_frontend_replaces_existing_web_frontend() {
        let mut cfg = registry::default_config();
        assert!(cfg.frontend.contains(&Frontend::TanstackRouter));
        cfg.toggle(SetMember::Frontend(Frontend::Nuxt));
        assert!(cfg.frontend.contains(&Frontend::Nuxt));
        assert!(!cfg.frontend.contains(&Frontend::TanstackRouter));
    }

    #[test]
    fn native_combines_with_web_frontend() {
        let mut cfg = registry::default_config();
        cfg.toggle(SetMember::Frontend(Frontend::Native));
        assert!(cfg.frontend.contains(&Frontend::TanstackRouter));
        assert!(cfg.frontend.contains(&Frontend::Native));
    }

    #[test]
    fn toggling_selected_member_removes_it() {
        let mut cfg = registry::default_config();
        cfg.toggle(SetMember::Frontend(Frontend::TanstackRouter));
        assert!(cfg.frontend.is_empty());
        cfg.toggle(SetMember::Addon(Addon::Turborepo));
        assert!(cfg.addons.is_empty());
    }

    #[test]
    fn partial_tracks_provided_fields() {
        let mut partial = PartialConfig::default();
        assert!(partial.is_empty());
        partial.set(Assign::Database(Database::Postgres));
        partial.set(Assign::Auth(false));
        assert_eq!(
            partial.provided_fields(),
            BTreeSet::from([FieldId::Database, FieldId::Auth])
        );
    }

    #[test]
    fn merge_under_fills_only_gaps() {
        let mut user = PartialConfig {
            database: Some(Database::Postgres),
            ..Default::default()
        };
        let seeds = PartialConfig {
            database: Some(Database::Mysql),
            package_manager: Some(PackageManager::Pnpm),
            ..Default::default()
        };
        user.merge_under(&seeds);
        assert_eq!(user.database, Some(Database::Postgres));
        assert_eq!(user.package_manager, Some(PackageManager::Pnpm));
    }

    #[test]
    fn into_config_recomputes_conditional_defaults() {
        let partial = PartialConfig {
            database: Some(Database::Postgres),
            ..Default::default()
        };
        let cfg = partial.into_config();
        // ORM default follows the selected database.
        assert_eq!(cfg.orm, Orm::Prisma);
        assert_eq!(cfg.backend, Backend::Hono);
    }

    #[test]
    fn into_config_without_overlay_is_default_snapshot() {
        assert_eq!(
            PartialConfig::default().into_config(),
            registry::default_config()
        );
    }
}
