//! Pure authorization decisions over roles and relationship facts.
//!
//! No I/O happens here: callers gather the facts (task snapshot, project
//! membership, looked-up roles) and the policy answers allow/deny. Every
//! failed lookup denies rather than faulting.

mod policy;

pub use policy::{AccessDenial, AccessPolicy, ActorContext, AssignmentFacts};
