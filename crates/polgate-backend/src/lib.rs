//! External collaborator adapters.
//!
//! The decision engine treats checks and comment history as opaque
//! boundaries; this crate provides the concrete implementations:
//! - `OpaBackend`: one `opa eval` subprocess per (policy, environment)
//! - `GithubCommentSource`: pull-request comment history over REST
//! - artifact verification for the `.rego` / `_test.rego` convention

#![forbid(unsafe_code)]

mod comments;
mod opa;
mod verify;

pub use comments::{CommentSource, GithubCommentSource, StaticComments};
pub use opa::{CheckBackend, OpaBackend};
pub use verify::verify_artifacts;
