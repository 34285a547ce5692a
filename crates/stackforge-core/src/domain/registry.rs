//! Field registry: defaults and static compatibility metadata.
//!
//! # Design Rationale
//!
//! The registry is the single source of truth for *data about fields*: the
//! immutable default snapshot, conditional per-field defaults, and the
//! static tables the cascade rules consult (db-setup tuples, addon frontend
//! requirements, the web-frontend group). Cross-field *enforcement* lives in
//! `resolver/rules.rs`; this module only answers lookups.
//!
//! # Adding a New Option
//!
//! 1. Add the enum variant in `value_objects.rs`
//! 2. Register its metadata here (one table entry, or a `default_for` arm
//!    when it changes a conditional default)
//! 3. Add a rule row in `resolver/rules.rs` if the option constrains other
//!    fields
//! 4. That's it — no other files change

use std::collections::BTreeSet;

use crate::domain::config::StackConfig;
use crate::domain::fields::{Assign, FieldId};
use crate::domain::value_objects::{
    Addon, ApiStyle, Backend, Database, DbSetup, Example, Frontend, Orm, PackageManager, Runtime,
    WebDeploy,
};

// ── Default snapshot ──────────────────────────────────────────────────────────

/// The immutable default configuration, cloned once per session.
///
/// This snapshot is resolver-stable: no rule fires on it (the
/// `default_snapshot_is_resolver_stable` test in the resolver enforces
/// this). There is deliberately no process-wide mutable default object.
pub fn default_config() -> StackConfig {
    StackConfig {
        backend: Backend::Hono,
        runtime: Runtime::Bun,
        database: Database::Sqlite,
        db_setup: DbSetup::None,
        orm: Orm::Drizzle,
        frontend: BTreeSet::from([Frontend::TanstackRouter]),
        api: ApiStyle::Trpc,
        auth: true,
        addons: BTreeSet::from([Addon::Turborepo]),
        examples: BTreeSet::new(),
        web_deploy: WebDeploy::None,
        package_manager: PackageManager::Npm,
        git: true,
        install: true,
    }
}

/// The registry default for one field, *conditional on the rest of the
/// configuration*. This is what "reset to default" means for a rule patch
/// and what the command serializer compares against.
///
/// A field's default may only read fields that precede it in
/// [`FieldId::ALL`] — `assert_registry_integrity` spot-checks the ones that
/// matter.
pub fn default_for(field: FieldId, cfg: &StackConfig) -> Assign {
    let backendless = matches!(cfg.backend, Backend::Convex | Backend::None);
    match field {
        FieldId::Backend => Assign::Backend(Backend::Hono),
        FieldId::Runtime => Assign::Runtime(if backendless {
            Runtime::None
        } else {
            Runtime::Bun
        }),
        FieldId::Database => Assign::Database(if backendless {
            Database::None
        } else {
            Database::Sqlite
        }),
        FieldId::DbSetup => Assign::DbSetup(DbSetup::None),
        FieldId::Orm => Assign::Orm(match cfg.database {
            Database::Sqlite | Database::Mysql => Orm::Drizzle,
            Database::Postgres => Orm::Prisma,
            Database::MongoDb => Orm::Mongoose,
            Database::None => Orm::None,
        }),
        FieldId::Frontend => Assign::Frontend(BTreeSet::from([Frontend::TanstackRouter])),
        FieldId::Api => Assign::Api(if backendless {
            ApiStyle::None
        } else if cfg.frontend.iter().any(|f| !supports_trpc(*f)) {
            ApiStyle::Orpc
        } else {
            ApiStyle::Trpc
        }),
        FieldId::Auth => Assign::Auth(!backendless && cfg.database != Database::None),
        FieldId::Addons => Assign::Addons(BTreeSet::from([Addon::Turborepo])),
        FieldId::Examples => Assign::Examples(if cfg.backend == Backend::Convex {
            BTreeSet::from([Example::Todo])
        } else {
            BTreeSet::new()
        }),
        FieldId::WebDeploy => Assign::WebDeploy(WebDeploy::None),
        FieldId::PackageManager => Assign::PackageManager(PackageManager::Npm),
        FieldId::Git => Assign::Git(true),
        FieldId::Install => Assign::Install(true),
    }
}

// ── Frontend grouping ─────────────────────────────────────────────────────────

/// Whether a frontend is a *web* application. At most one web frontend may
/// be selected at a time; `native` sits outside the group.
pub const fn is_web_frontend(frontend: Frontend) -> bool {
    !matches!(frontend, Frontend::Native)
}

/// The selected web frontend, if any.
pub fn web_frontend(cfg: &StackConfig) -> Option<Frontend> {
    cfg.frontend
        .iter()
        .copied()
        .find(|f| is_web_frontend(*f))
}

/// Whether a frontend ships a tRPC integration. The ones that do not get
/// `orpc` forced by the frontend cascade.
pub const fn supports_trpc(frontend: Frontend) -> bool {
    !matches!(frontend, Frontend::Nuxt | Frontend::Svelte | Frontend::Solid)
}

/// Frontends the convex backend has no client bindings for.
pub const fn convex_supports(frontend: Frontend) -> bool {
    !matches!(frontend, Frontend::Nuxt | Frontend::Solid)
}

// ── DB-setup definitions ──────────────────────────────────────────────────────

/// Everything the rules need to know about one hosted-database setup flow.
///
/// Selecting a setup forces every mismatched member of its required tuple to
/// the required value (db-setup cascade).
#[derive(Debug, Clone, Copy)]
pub struct DbSetupDef {
    /// The setup this entry describes.
    pub setup: DbSetup,

    /// The database engine this flow provisions. `None` means any engine
    /// except the banned ones.
    pub database: Option<Database>,

    /// Database engines this flow cannot host. Only meaningful when
    /// `database` is `None`.
    pub banned_databases: &'static [Database],

    /// ORMs this flow supports. Empty means any ORM valid for the database.
    /// The first entry is the one a mismatched ORM is forced to.
    pub orms: &'static [Orm],

    /// Runtime this flow requires, if any.
    pub runtime: Option<Runtime>,

    /// Backend this flow requires, if any.
    pub backend: Option<Backend>,
}

/// Single source of truth for db-setup requirements.
///
/// To add a new setup flow: add one entry here. No `match` arms elsewhere.
pub static DB_SETUP_REGISTRY: &[DbSetupDef] = &[
    DbSetupDef {
        setup: DbSetup::Turso,
        database: Some(Database::Sqlite),
        banned_databases: &[],
        orms: &[Orm::Drizzle],
        runtime: None,
        backend: None,
    },
    DbSetupDef {
        setup: DbSetup::Neon,
        database: Some(Database::Postgres),
        banned_databases: &[],
        orms: &[],
        runtime: None,
        backend: None,
    },
    DbSetupDef {
        setup: DbSetup::PrismaPostgres,
        database: Some(Database::Postgres),
        banned_databases: &[],
        orms: &[Orm::Prisma],
        runtime: None,
        backend: None,
    },
    DbSetupDef {
        setup: DbSetup::MongoDbAtlas,
        database: Some(Database::MongoDb),
        banned_databases: &[],
        orms: &[Orm::Mongoose, Orm::Prisma],
        runtime: None,
        backend: None,
    },
    DbSetupDef {
        setup: DbSetup::Supabase,
        database: Some(Database::Postgres),
        banned_databases: &[],
        orms: &[],
        runtime: None,
        backend: None,
    },
    DbSetupDef {
        // D1 only exists on the Workers platform.
        setup: DbSetup::D1,
        database: Some(Database::Sqlite),
        banned_databases: &[],
        orms: &[Orm::Drizzle],
        runtime: Some(Runtime::Workers),
        backend: Some(Backend::Hono),
    },
    DbSetupDef {
        // Docker hosts server databases; sqlite is embedded and has nothing
        // to containerise.
        setup: DbSetup::Docker,
        database: None,
        banned_databases: &[Database::Sqlite, Database::None],
        orms: &[],
        runtime: None,
        backend: None,
    },
];

/// Find the definition for a setup flow. `DbSetup::None` has no entry.
pub fn find_db_setup(setup: DbSetup) -> Option<&'static DbSetupDef> {
    DB_SETUP_REGISTRY.iter().find(|def| def.setup == setup)
}

/// The database a banned engine falls back to under this setup flow.
pub fn db_setup_fallback_database(def: &DbSetupDef) -> Database {
    def.database.unwrap_or(Database::Postgres)
}

/// Whether a setup flow can run on the Workers platform. Docker needs a
/// daemon and Atlas needs mongodb, which workers bans.
pub fn db_setup_supported_on_workers(setup: DbSetup) -> bool {
    match find_db_setup(setup) {
        Some(def) => def.setup != DbSetup::Docker && def.database != Some(Database::MongoDb),
        None => true,
    }
}

// ── Addon definitions ─────────────────────────────────────────────────────────

/// Frontend requirements for one addon.
#[derive(Debug, Clone, Copy)]
pub struct AddonDef {
    pub addon: Addon,

    /// Web frontends this addon can attach to. Empty means the addon is
    /// frontend-agnostic.
    pub frontends: &'static [Frontend],
}

pub static ADDON_REGISTRY: &[AddonDef] = &[
    AddonDef {
        addon: Addon::Pwa,
        frontends: &[
            Frontend::TanstackRouter,
            Frontend::ReactRouter,
            Frontend::Solid,
            Frontend::Next,
        ],
    },
    AddonDef {
        addon: Addon::Tauri,
        frontends: &[
            Frontend::TanstackRouter,
            Frontend::ReactRouter,
            Frontend::Next,
            Frontend::Nuxt,
            Frontend::Svelte,
            Frontend::Solid,
        ],
    },
    AddonDef {
        addon: Addon::Starlight,
        frontends: &[],
    },
    AddonDef {
        addon: Addon::Biome,
        frontends: &[],
    },
    AddonDef {
        addon: Addon::Husky,
        frontends: &[],
    },
    AddonDef {
        addon: Addon::Turborepo,
        frontends: &[],
    },
];

pub fn find_addon(addon: Addon) -> Option<&'static AddonDef> {
    ADDON_REGISTRY.iter().find(|def| def.addon == addon)
}

/// Whether an addon is compatible with the current frontend selection.
pub fn addon_supported(addon: Addon, cfg: &StackConfig) -> bool {
    match find_addon(addon) {
        Some(def) if !def.frontends.is_empty() => {
            cfg.frontend.iter().any(|f| def.frontends.contains(f))
        }
        _ => true,
    }
}

/// Whether an example is compatible with the current configuration.
pub fn example_supported(example: Example, cfg: &StackConfig) -> bool {
    match example {
        // The todo example needs a data layer: a database, or convex's
        // built-in one.
        Example::Todo => cfg.database != Database::None || cfg.backend == Backend::Convex,
        // The AI example has no solid bindings.
        Example::Ai => !cfg.frontend.contains(&Frontend::Solid),
    }
}

// ── Registry integrity (checked in tests) ────────────────────────────────────

/// Assert that the registries are internally consistent.
///
/// Call this in a test; it panics with a clear message on any violation.
/// Catches registration errors at development time, not at user runtime.
#[doc(hidden)]
pub fn assert_registry_integrity() {
    for def in DB_SETUP_REGISTRY {
        assert_ne!(
            def.setup,
            DbSetup::None,
            "DbSetup::None must not be registered"
        );

        if let Some(db) = def.database {
            assert!(
                !def.banned_databases.contains(&db),
                "{:?}: required database {:?} is also banned",
                def.setup,
                db
            );
            // The allowed ORM list must fit the required engine.
            for orm in def.orms {
                let fits = match db {
                    Database::MongoDb => matches!(orm, Orm::Mongoose | Orm::Prisma),
                    Database::None => false,
                    _ => matches!(orm, Orm::Drizzle | Orm::Prisma),
                };
                assert!(
                    fits,
                    "{:?}: ORM {:?} cannot target database {:?}",
                    def.setup, orm, db
                );
            }
        }

        // A required runtime implies the engine survives that runtime's own
        // cascade (workers bans mongodb).
        if def.runtime == Some(Runtime::Workers) {
            assert_ne!(
                def.database,
                Some(Database::MongoDb),
                "{:?}: workers runtime cannot host mongodb",
                def.setup
            );
        }
    }

    for def in ADDON_REGISTRY {
        for fe in def.frontends {
            assert!(
                is_web_frontend(*fe),
                "{:?}: addon requirements must name web frontends, got {:?}",
                def.addon,
                fe
            );
        }
    }

    // Conditional defaults only read earlier fields: ORM reads database,
    // API reads backend + frontend, auth reads backend + database.
    let order = |f: FieldId| FieldId::ALL.iter().position(|x| *x == f).unwrap();
    assert!(order(FieldId::Database) < order(FieldId::Orm));
    assert!(order(FieldId::Frontend) < order(FieldId::Api));
    assert!(order(FieldId::Database) < order(FieldId::Auth));
}

// ── Tests ─────────────────────────────────────────────────────────────────────
