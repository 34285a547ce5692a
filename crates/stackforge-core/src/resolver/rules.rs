//! The compatibility rule table.
//!
//! # Design Rationale
//!
//! The previous generation of tools encodes stack compatibility as
//! hand-written conditional blocks mutating a shared object, duplicated
//! between the CLI validator and the web builder. This module replaces that
//! with a single declarative table: each rule is one [`Rule`] row with a
//! trigger predicate, a patch, and a priority. The fixpoint engine in
//! [`crate::resolver`] is generic over the table, so adding a technology
//! option is a data change, not a new code branch.
//!
//! # Priorities
//!
//! Rules are totally ordered by a unique `priority`; higher runs first
//! within a pass. The tens digit is the *band* of the driving field, which
//! is the documented precedence:
//!
//! | Band | Driving field |
//! |------|---------------|
//! |  9x  | backend       |
//! |  8x  | runtime       |
//! |  7x  | database      |
//! |  6x  | db-setup      |
//! |  5x  | orm           |
//! |  4x  | frontend      |
//! |  3x  | addons        |
//! |  2x  | examples      |
//! |  1x  | deploy        |
//!
//! When two rules could claim the same field, the higher band wins — that
//! ordering is the confluence guarantee, and `Resolver::new` rejects tables
//! where it cannot hold (duplicate priorities, in-band dependency cycles).
//!
//! # Authoring contract
//!
//! - `reads` lists exactly the fields the *predicate* depends on; the
//!   engine's cycle check is built on it.
//! - `patch` may return assignments equal to the current value; the engine
//!   diffs, so only real changes count.
//! - `driver` is the field whose value forces the change. It must be in
//!   `reads` and never in `writes`; conflict messages name it.

use std::collections::BTreeSet;

use crate::domain::config::StackConfig;
use crate::domain::fields::{Assign, FieldId};
use crate::domain::registry;
use crate::domain::value_objects::{
    ApiStyle, Backend, Database, DbSetup, Example, Orm, Runtime, WebDeploy,
};

/// One compatibility rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Stable identifier, used as the change category and in logs.
    pub id: &'static str,

    /// Unique evaluation priority; higher runs first.
    pub priority: u8,

    /// The field whose value forces the change.
    pub driver: FieldId,

    /// Fields the trigger predicate depends on.
    pub reads: &'static [FieldId],

    /// Fields the patch may assign.
    pub writes: &'static [FieldId],

    /// Trigger: does this rule apply to the configuration?
    pub predicate: fn(&StackConfig) -> bool,

    /// Effect: the values the written fields are forced to.
    pub patch: fn(&StackConfig) -> Vec<Assign>,

    /// Human-readable explanation, shown in change notes and conflicts.
    pub note: &'static str,
}

impl Rule {
    /// The priority band (tens digit) — the driving-field precedence class.
    pub const fn band(&self) -> u8 {
        self.priority / 10
    }
}

/// The fields the backend cascades force as a bundle.
const BACKEND_BUNDLE: &[FieldId] = &[
    FieldId::Runtime,
    FieldId::Database,
    FieldId::Orm,
    FieldId::Api,
    FieldId::Auth,
    FieldId::DbSetup,
    FieldId::Examples,
];

fn backendless_bundle(examples: BTreeSet<Example>) -> Vec<Assign> {
    vec![
        Assign::Runtime(Runtime::None),
        Assign::Database(Database::None),
        Assign::Orm(Orm::None),
        Assign::Api(ApiStyle::None),
        Assign::Auth(false),
        Assign::DbSetup(DbSetup::None),
        Assign::Examples(examples),
    ]
}

/// The complete rule table, authored in priority order for readability.
/// The order is not semantic: `Resolver::new` sorts by priority.
pub static RULE_TABLE: &[Rule] = &[
    // ── Backend cascade (band 9) ─────────────────────────────────────────────
    Rule {
        id: "backend-convex",
        priority: 92,
        driver: FieldId::Backend,
        reads: &[FieldId::Backend],
        writes: BACKEND_BUNDLE,
        predicate: |cfg| cfg.backend == Backend::Convex,
        patch: |_| backendless_bundle(BTreeSet::from([Example::Todo])),
        note: "convex replaces the server, database, ORM, API, and auth layers",
    },
    Rule {
        id: "backend-convex-frontend",
        priority: 91,
        driver: FieldId::Backend,
        reads: &[FieldId::Backend],
        writes: &[FieldId::Frontend],
        predicate: |cfg| cfg.backend == Backend::Convex,
        patch: |cfg| {
            let kept: BTreeSet<_> = cfg
                .frontend
                .iter()
                .copied()
                .filter(|f| registry::convex_supports(*f))
                .collect();
            vec![Assign::Frontend(kept)]
        },
        note: "convex has no client bindings for this frontend",
    },
    Rule {
        id: "backend-none",
        priority: 90,
        driver: FieldId::Backend,
        reads: &[FieldId::Backend],
        writes: BACKEND_BUNDLE,
        predicate: |cfg| cfg.backend == Backend::None,
        patch: |_| backendless_bundle(BTreeSet::new()),
        note: "a frontend-only project has no server stack",
    },
    // ── Runtime cascade (band 8) ─────────────────────────────────────────────
    Rule {
        id: "workers-backend",
        priority: 83,
        driver: FieldId::Runtime,
        reads: &[FieldId::Runtime, FieldId::Backend],
        writes: &[FieldId::Backend],
        predicate: |cfg| cfg.runtime == Runtime::Workers && cfg.backend != Backend::Hono,
        patch: |_| vec![Assign::Backend(Backend::Hono)],
        note: "hono is the only backend that runs on workers",
    },
    Rule {
        id: "workers-database",
        priority: 82,
        driver: FieldId::Runtime,
        reads: &[FieldId::Runtime, FieldId::Database],
        writes: &[FieldId::Database],
        predicate: |cfg| cfg.runtime == Runtime::Workers && cfg.database == Database::MongoDb,
        patch: |_| vec![Assign::Database(Database::Sqlite)],
        note: "the mongodb driver does not run on workers",
    },
    Rule {
        id: "workers-orm",
        priority: 81,
        driver: FieldId::Runtime,
        reads: &[FieldId::Runtime, FieldId::Orm],
        writes: &[FieldId::Orm],
        predicate: |cfg| {
            cfg.runtime == Runtime::Workers && matches!(cfg.orm, Orm::Prisma | Orm::Mongoose)
        },
        patch: |_| vec![Assign::Orm(Orm::Drizzle)],
        note: "workers supports drizzle (or no ORM) only",
    },
    Rule {
        id: "workers-db-setup",
        priority: 80,
        driver: FieldId::Runtime,
        reads: &[FieldId::Runtime, FieldId::DbSetup],
        writes: &[FieldId::DbSetup],
        predicate: |cfg| {
            cfg.runtime == Runtime::Workers
                && !registry::db_setup_supported_on_workers(cfg.db_setup)
        },
        patch: |_| vec![Assign::DbSetup(DbSetup::None)],
        note: "this database setup flow is unavailable on workers",
    },
    // ── Database cascade (band 7) ────────────────────────────────────────────
    Rule {
        id: "database-none",
        priority: 71,
        driver: FieldId::Database,
        reads: &[FieldId::Database],
        writes: &[FieldId::Orm, FieldId::Auth, FieldId::DbSetup],
        predicate: |cfg| cfg.database == Database::None,
        patch: |_| {
            vec![
                Assign::Orm(Orm::None),
                Assign::Auth(false),
                Assign::DbSetup(DbSetup::None),
            ]
        },
        note: "ORM, auth, and database setup need a database",
    },
    Rule {
        id: "database-mongodb-orm",
        priority: 70,
        driver: FieldId::Database,
        reads: &[FieldId::Database, FieldId::Orm],
        writes: &[FieldId::Orm],
        predicate: |cfg| cfg.database == Database::MongoDb && cfg.orm == Orm::Drizzle,
        patch: |cfg| vec![registry::default_for(FieldId::Orm, cfg)],
        note: "mongodb requires prisma or mongoose",
    },
    // ── DB-setup cascade (band 6) ────────────────────────────────────────────
    Rule {
        id: "db-setup-requirements",
        priority: 60,
        driver: FieldId::DbSetup,
        reads: &[
            FieldId::DbSetup,
            FieldId::Database,
            FieldId::Orm,
            FieldId::Runtime,
            FieldId::Backend,
        ],
        writes: &[
            FieldId::Database,
            FieldId::Orm,
            FieldId::Runtime,
            FieldId::Backend,
        ],
        predicate: |cfg| {
            registry::find_db_setup(cfg.db_setup).is_some_and(|def| {
                def.database.is_some_and(|db| db != cfg.database)
                    || def.banned_databases.contains(&cfg.database)
                    || (!def.orms.is_empty() && !def.orms.contains(&cfg.orm))
                    || def.runtime.is_some_and(|rt| rt != cfg.runtime)
                    || def.backend.is_some_and(|be| be != cfg.backend)
            })
        },
        patch: |cfg| {
            let def = match registry::find_db_setup(cfg.db_setup) {
                Some(def) => def,
                None => return Vec::new(),
            };
            let mut assigns = Vec::new();
            if let Some(db) = def.database {
                assigns.push(Assign::Database(db));
            } else if def.banned_databases.contains(&cfg.database) {
                assigns.push(Assign::Database(registry::db_setup_fallback_database(def)));
            }
            if !def.orms.is_empty() && !def.orms.contains(&cfg.orm) {
                assigns.push(Assign::Orm(def.orms[0]));
            }
            if let Some(rt) = def.runtime {
                assigns.push(Assign::Runtime(rt));
            }
            if let Some(be) = def.backend {
                assigns.push(Assign::Backend(be));
            }
            assigns
        },
        note: "this database setup flow fixes the database, ORM, runtime, and backend",
    },
    // ── ORM fit (band 5) ─────────────────────────────────────────────────────
    Rule {
        id: "orm-database-fit",
        priority: 50,
        driver: FieldId::Database,
        reads: &[FieldId::Database, FieldId::Orm],
        writes: &[FieldId::Orm],
        predicate: |cfg| {
            (cfg.orm == Orm::None && cfg.database != Database::None)
                || (cfg.orm == Orm::Mongoose && cfg.database != Database::MongoDb)
        },
        patch: |cfg| vec![registry::default_for(FieldId::Orm, cfg)],
        note: "the selected database needs a matching ORM",
    },
    // ── Frontend cascade (band 4) ────────────────────────────────────────────
    Rule {
        id: "frontend-api",
        priority: 40,
        driver: FieldId::Frontend,
        reads: &[FieldId::Frontend, FieldId::Api],
        writes: &[FieldId::Api],
        predicate: |cfg| {
            cfg.api == ApiStyle::Trpc && cfg.frontend.iter().any(|f| !registry::supports_trpc(*f))
        },
        patch: |_| vec![Assign::Api(ApiStyle::Orpc)],
        note: "this frontend has no tRPC bindings; oRPC works everywhere",
    },
    // ── Addon compatibility (band 3) ─────────────────────────────────────────
    Rule {
        id: "addon-frontend-fit",
        priority: 30,
        driver: FieldId::Frontend,
        reads: &[FieldId::Addons, FieldId::Frontend],
        writes: &[FieldId::Addons],
        predicate: |cfg| {
            cfg.addons
                .iter()
                .any(|a| !registry::addon_supported(*a, cfg))
        },
        patch: |cfg| {
            let kept: BTreeSet<_> = cfg
                .addons
                .iter()
                .copied()
                .filter(|a| registry::addon_supported(*a, cfg))
                .collect();
            vec![Assign::Addons(kept)]
        },
        note: "this addon does not support the selected frontend",
    },
    // ── Example compatibility (band 2) ───────────────────────────────────────
    Rule {
        id: "example-todo-data",
        priority: 21,
        driver: FieldId::Database,
        reads: &[FieldId::Database, FieldId::Backend],
        writes: &[FieldId::Examples],
        predicate: |cfg| cfg.database == Database::None && cfg.backend != Backend::Convex,
        patch: |cfg| {
            let mut kept = cfg.examples.clone();
            kept.remove(&Example::Todo);
            vec![Assign::Examples(kept)]
        },
        note: "the todo example needs a database",
    },
    Rule {
        id: "example-ai-frontend",
        priority: 20,
        driver: FieldId::Frontend,
        reads: &[FieldId::Frontend],
        writes: &[FieldId::Examples],
        predicate: |cfg| !registry::example_supported(Example::Ai, cfg),
        patch: |cfg| {
            let mut kept = cfg.examples.clone();
            kept.remove(&Example::Ai);
            vec![Assign::Examples(kept)]
        },
        note: "the AI example does not support this frontend",
    },
    // ── Deploy (band 1) ──────────────────────────────────────────────────────
    Rule {
        id: "web-deploy-platform",
        priority: 10,
        driver: FieldId::Runtime,
        reads: &[FieldId::WebDeploy, FieldId::Runtime],
        writes: &[FieldId::WebDeploy],
        predicate: |cfg| cfg.web_deploy == WebDeploy::Workers && cfg.runtime != Runtime::Workers,
        patch: |_| vec![Assign::WebDeploy(WebDeploy::None)],
        note: "deploying to workers requires the workers runtime",
    },
];
