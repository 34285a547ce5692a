//! Flag entry point: Strict resolution of a parsed flag set.
//!
//! The CLI's argument layer produces a [`PartialConfig`] (one `Some` per
//! flag the user actually typed) plus optional config-file seeds. This
//! adapter materialises the overlay and runs the resolver in Strict mode:
//! a rule that would override an explicitly typed flag is a fatal conflict
//! naming both inputs, never a silent correction.
//!
//! Seeded values are treated like defaults, not like user input — a
//! config-file default that loses to a cascade is corrected silently.

use tracing::debug;

use stackforge_core::domain::{PartialConfig, StackConfig};
use stackforge_core::resolver::{ResolveError, Resolver};

/// Strict-mode adapter for the flag entry point.
#[derive(Debug, Clone)]
pub struct FlagAdapter {
    resolver: Resolver,
}

impl FlagAdapter {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    /// Resolve a flag selection, filling unset fields from `seeds` and then
    /// from conditional defaults.
    ///
    /// Only the fields in `user` count as explicitly provided; everything
    /// else may be moved by the cascade rules without error.
    pub fn resolve(
        &self,
        user: PartialConfig,
        seeds: &PartialConfig,
    ) -> Result<StackConfig, ResolveError> {
        let explicit = user.provided_fields();
        debug!(explicit = explicit.len(), "resolving flag selection");

        let mut merged = user;
        merged.merge_under(seeds);

        self.resolver.resolve_strict(&merged.into_config(), &explicit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackforge_core::domain::{Backend, Database, DbSetup, Orm, PackageManager};
    use stackforge_core::resolver::ErrorCode;

    fn adapter() -> FlagAdapter {
        FlagAdapter::new(Resolver::new().unwrap())
    }

    #[test]
    fn consistent_flags_resolve() {
        let user = PartialConfig {
            database: Some(Database::Postgres),
            orm: Some(Orm::Prisma),
            ..Default::default()
        };
        let cfg = adapter().resolve(user, &PartialConfig::default()).unwrap();
        assert_eq!(cfg.database, Database::Postgres);
        assert_eq!(cfg.orm, Orm::Prisma);
    }

    #[test]
    fn conflicting_flags_name_both_inputs() {
        let user = PartialConfig {
            backend: Some(Backend::Convex),
            database: Some(Database::Postgres),
            ..Default::default()
        };
        let err = adapter()
            .resolve(user, &PartialConfig::default())
            .unwrap_err();
        match err {
            ResolveError::Rejected(errors) => {
                assert_eq!(errors[0].code, ErrorCode::FatalFlagConflict);
                assert!(errors[0].message.contains("--backend convex"));
                assert!(errors[0].message.contains("--database postgres"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn seeds_fill_gaps_without_becoming_explicit() {
        // The config file seeds mongodb, the user picks turso; turso's
        // cascade moves the database to sqlite. Seeded values lose silently.
        let user = PartialConfig {
            db_setup: Some(DbSetup::Turso),
            ..Default::default()
        };
        let seeds = PartialConfig {
            database: Some(Database::MongoDb),
            package_manager: Some(PackageManager::Pnpm),
            ..Default::default()
        };
        let cfg = adapter().resolve(user, &seeds).unwrap();
        assert_eq!(cfg.database, Database::Sqlite);
        assert_eq!(cfg.package_manager, PackageManager::Pnpm);
    }

    #[test]
    fn explicit_flag_beats_a_seed() {
        let user = PartialConfig {
            package_manager: Some(PackageManager::Bun),
            ..Default::default()
        };
        let seeds = PartialConfig {
            package_manager: Some(PackageManager::Pnpm),
            ..Default::default()
        };
        let cfg = adapter().resolve(user, &seeds).unwrap();
        assert_eq!(cfg.package_manager, PackageManager::Bun);
    }
}
