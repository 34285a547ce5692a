//! Stack value objects: one enum per configuration field domain.
//!
//! # Design
//!
//! These are pure value types — `Copy`, equality-by-value, no identity.
//! They hold NO compatibility logic. All defaults and cross-field rules live
//! in `registry.rs` and `resolver/rules.rs`. This file's only job is to
//! define the types, their string representations, and their `FromStr`
//! parsers.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. Register defaults/compatibility in `registry.rs` (and a rule row in
//!    `resolver/rules.rs` if the option constrains other fields)
//! 4. Done — nothing else changes

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! field_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field_label:literal {
            $( $variant:ident => $text:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( Self::$variant, )+ ];

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $( $text $(| $alias)* => Ok(Self::$variant), )+
                    other => Err(DomainError::UnsupportedValue {
                        field: $field_label,
                        value: other.to_string(),
                        supported: Self::ALL.iter().map(|v| v.as_str()).collect(),
                    }),
                }
            }
        }
    };
}

field_enum! {
    /// The server framework powering the backend, or `Convex`/`None` for the
    /// two backend-less modes.
    Backend, "backend" {
        Hono => "hono",
        Express => "express",
        Fastify => "fastify",
        Elysia => "elysia",
        Next => "next",
        Convex => "convex",
        None => "none",
    }
}

field_enum! {
    /// JavaScript runtime the backend runs on.
    Runtime, "runtime" {
        Bun => "bun",
        Node => "node" | "nodejs",
        Workers => "workers" | "cloudflare-workers",
        None => "none",
    }
}

field_enum! {
    /// Database engine.
    Database, "database" {
        Sqlite => "sqlite",
        Postgres => "postgres" | "postgresql" | "pg",
        Mysql => "mysql",
        MongoDb => "mongodb" | "mongo",
        None => "none",
    }
}

field_enum! {
    /// Object-relational (or object-document) mapper.
    Orm, "orm" {
        Drizzle => "drizzle",
        Prisma => "prisma",
        Mongoose => "mongoose",
        None => "none",
    }
}

field_enum! {
    /// RPC layer between frontend and backend.
    ApiStyle, "api" {
        Trpc => "trpc",
        Orpc => "orpc",
        None => "none",
    }
}

field_enum! {
    /// Hosted-database provisioning flow to run after scaffolding.
    DbSetup, "db-setup" {
        Turso => "turso",
        Neon => "neon",
        PrismaPostgres => "prisma-postgres",
        MongoDbAtlas => "mongodb-atlas" | "atlas",
        Supabase => "supabase",
        D1 => "d1",
        Docker => "docker",
        None => "none",
    }
}

field_enum! {
    /// Deployment target for the web frontend.
    WebDeploy, "web-deploy" {
        Workers => "workers",
        None => "none",
    }
}

field_enum! {
    /// Frontend applications to scaffold. Set-valued: at most one *web*
    /// frontend, optionally combined with the native app (see
    /// `registry::is_web_frontend`).
    Frontend, "frontend" {
        TanstackRouter => "tanstack-router",
        ReactRouter => "react-router",
        TanstackStart => "tanstack-start",
        Next => "next",
        Nuxt => "nuxt",
        Svelte => "svelte",
        Solid => "solid",
        Native => "native" | "native-nativewind",
    }
}

field_enum! {
    /// Optional tooling and integrations. Set-valued.
    Addon, "addons" {
        Pwa => "pwa",
        Tauri => "tauri",
        Starlight => "starlight",
        Biome => "biome",
        Husky => "husky",
        Turborepo => "turborepo",
    }
}

field_enum! {
    /// Example applications to include. Set-valued.
    Example, "examples" {
        Todo => "todo",
        Ai => "ai",
    }
}

field_enum! {
    /// Package manager used for dependency installation.
    PackageManager, "package-manager" {
        Npm => "npm",
        Pnpm => "pnpm",
        Bun => "bun",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_kebab_lowercase() {
        assert_eq!(Backend::Hono.to_string(), "hono");
        assert_eq!(Database::MongoDb.to_string(), "mongodb");
        assert_eq!(DbSetup::PrismaPostgres.to_string(), "prisma-postgres");
        assert_eq!(Frontend::TanstackRouter.to_string(), "tanstack-router");
    }

    #[test]
    fn from_str_accepts_aliases() {
        assert_eq!("pg".parse::<Database>().unwrap(), Database::Postgres);
        assert_eq!("mongo".parse::<Database>().unwrap(), Database::MongoDb);
        assert_eq!("nodejs".parse::<Runtime>().unwrap(), Runtime::Node);
        assert_eq!("atlas".parse::<DbSetup>().unwrap(), DbSetup::MongoDbAtlas);
        assert_eq!(
            "native-nativewind".parse::<Frontend>().unwrap(),
            Frontend::Native
        );
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("HONO".parse::<Backend>().unwrap(), Backend::Hono);
        assert_eq!("Drizzle".parse::<Orm>().unwrap(), Orm::Drizzle);
    }

    #[test]
    fn from_str_unknown_errors_and_lists_supported() {
        let err = "rails".parse::<Backend>().unwrap_err();
        match err {
            DomainError::UnsupportedValue {
                field, supported, ..
            } => {
                assert_eq!(field, "backend");
                assert!(supported.contains(&"hono"));
                assert!(supported.contains(&"convex"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn round_trips_through_as_str() {
        for v in Backend::ALL {
            assert_eq!(v.as_str().parse::<Backend>().unwrap(), *v);
        }
        for v in DbSetup::ALL {
            assert_eq!(v.as_str().parse::<DbSetup>().unwrap(), *v);
        }
        for v in Frontend::ALL {
            assert_eq!(v.as_str().parse::<Frontend>().unwrap(), *v);
        }
        for v in Addon::ALL {
            assert_eq!(v.as_str().parse::<Addon>().unwrap(), *v);
        }
    }
}
