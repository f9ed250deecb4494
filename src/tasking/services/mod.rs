//! Orchestration services for the tasking module.

mod error;
mod keyed_lock;
mod lifecycle;
mod listing;
mod rating;

pub use error::{
    ConflictError, DependencyError, MissingEntity, TaskServiceError, TaskServiceResult,
    ValidationError,
};
pub use keyed_lock::KeyedLock;
pub use lifecycle::{
    CreateTaskRequest, EditTaskRequest, MutationOutcome, RateTaskRequest, TaskLifecycleDeps,
    TaskLifecycleService,
};
pub use listing::{GroupedTaskReport, TaskGroup, TaskListQuery, TaskListingService};
pub use rating::RatingAggregator;
