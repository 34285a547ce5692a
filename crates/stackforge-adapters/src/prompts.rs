//! Prompt entry point: Adaptive resolution of a sequential answer chain.
//!
//! The CLI asks one question per field, in precedence order. Before each
//! question this adapter projects the answers given so far into a full
//! configuration and filters the question's options through the
//! speculative check, so no incompatible answer is ever offered. The
//! completed answer map then goes through one Adaptive resolve.
//!
//! Rendering (dialoguer, terminal handling, cancellation) stays in the CLI;
//! this adapter is pure.

use tracing::debug;

use stackforge_core::domain::{Assign, FieldEdit, FieldId, PartialConfig, SetMember, StackConfig};
use stackforge_core::resolver::{Resolution, Resolver, ResolverFault};

/// Adaptive-mode adapter for the prompt entry point.
#[derive(Debug, Clone)]
pub struct PromptAdapter {
    resolver: Resolver,
}

impl PromptAdapter {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    /// The prompt sequence: every field, in precedence order, so each
    /// question is filtered against the answers that drive it.
    pub fn sequence() -> &'static [FieldId] {
        FieldId::ALL
    }

    /// Project the answers given so far into the configuration the next
    /// question should be filtered against.
    pub fn preview(&self, answered: &PartialConfig) -> Result<StackConfig, ResolverFault> {
        let resolution = self.resolver.resolve_adaptive(&answered.clone().into_config())?;
        Ok(resolution.config)
    }

    /// The answers worth offering for a single-valued field: every domain
    /// value that would survive resolution against the answers so far.
    pub fn scalar_options(
        &self,
        answered: &PartialConfig,
        field: FieldId,
    ) -> Result<Vec<Assign>, ResolverFault> {
        let preview = self.preview(answered)?;
        let options: Vec<Assign> = field
            .scalar_domain()
            .into_iter()
            .filter(|assign| {
                self.resolver
                    .is_compatible(&preview, &FieldEdit::Set(assign.clone()))
            })
            .collect();
        debug!(field = %field, options = options.len(), "filtered prompt options");
        Ok(options)
    }

    /// The members worth offering for a set-valued field.
    pub fn member_options(
        &self,
        answered: &PartialConfig,
        field: FieldId,
    ) -> Result<Vec<SetMember>, ResolverFault> {
        let preview = self.preview(answered)?;
        Ok(field
            .member_domain()
            .into_iter()
            .filter(|member| {
                self.resolver
                    .is_compatible(&preview, &FieldEdit::Toggle(*member))
            })
            .collect())
    }

    /// Resolve the completed answer map. Never fails with a user-facing
    /// error; forced changes come back as [`stackforge_core::resolver::Change`]s.
    pub fn finish(&self, answered: PartialConfig) -> Result<Resolution, ResolverFault> {
        self.resolver.resolve_adaptive(&answered.into_config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackforge_core::domain::{Backend, Database, Frontend, Orm, Runtime};

    fn adapter() -> PromptAdapter {
        PromptAdapter::new(Resolver::new().unwrap())
    }

    fn answers(f: impl FnOnce(&mut PartialConfig)) -> PartialConfig {
        let mut partial = PartialConfig::default();
        f(&mut partial);
        partial
    }

    #[test]
    fn sequence_covers_every_field() {
        assert_eq!(PromptAdapter::sequence().len(), FieldId::ALL.len());
    }

    #[test]
    fn workers_answer_removes_mongodb_from_the_database_question() {
        let answered = answers(|a| a.runtime = Some(Runtime::Workers));
        let options = adapter()
            .scalar_options(&answered, FieldId::Database)
            .unwrap();
        assert!(!options.contains(&Assign::Database(Database::MongoDb)));
        assert!(options.contains(&Assign::Database(Database::Sqlite)));
    }

    #[test]
    fn mongodb_answer_limits_the_orm_question() {
        let answered = answers(|a| a.database = Some(Database::MongoDb));
        let options = adapter().scalar_options(&answered, FieldId::Orm).unwrap();
        assert!(options.contains(&Assign::Orm(Orm::Prisma)));
        assert!(options.contains(&Assign::Orm(Orm::Mongoose)));
        assert!(!options.contains(&Assign::Orm(Orm::Drizzle)));
    }

    #[test]
    fn convex_answer_prunes_frontend_members() {
        let answered = answers(|a| a.backend = Some(Backend::Convex));
        let members = adapter()
            .member_options(&answered, FieldId::Frontend)
            .unwrap();
        assert!(!members.contains(&SetMember::Frontend(Frontend::Nuxt)));
        assert!(members.contains(&SetMember::Frontend(Frontend::Native)));
    }

    #[test]
    fn finish_resolves_the_completed_chain() {
        let answered = answers(|a| {
            a.backend = Some(Backend::Convex);
            a.auth = Some(true);
        });
        let resolution = adapter().finish(answered).unwrap();
        assert!(!resolution.config.auth);
        assert_eq!(resolution.changes.len(), 1);
    }

    #[test]
    fn unconstrained_questions_offer_the_full_domain() {
        let options = adapter()
            .scalar_options(&PartialConfig::default(), FieldId::PackageManager)
            .unwrap();
        assert_eq!(options.len(), FieldId::PackageManager.scalar_domain().len());
    }
}
