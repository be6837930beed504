//! Domain primitives, services, and ports.
//!
//! Purpose: model the signed-in user's recommendations and the operations a
//! presentation layer performs on them, without depending on any transport.
//!
//! Public surface:
//! - `Recommendation`, `NewRecommendation`, `RecommendationId`: the entity
//!   model.
//! - `Session`, `UserId`, `AccessToken`: the signed-in context a cache is
//!   bound to.
//! - `FilterSpec` and the `filter` functions: stateless visibility rules.
//! - `RecommendationCache`: session-scoped snapshot with reload and
//!   invalidation.
//! - `MutationPipeline`: add, delete, and toggle-used with cache
//!   reconciliation and notices.
//! - `RecommendationError`: typed failures returned to callers.

mod cache;
mod draft;
mod error;
pub mod filter;
mod friend_focus;
mod keyed_lock;
mod mutation_service;
mod notice;
pub mod ports;
mod recommendation;
mod session;

pub use self::cache::{CacheEvent, CacheSnapshot, RecommendationCache};
pub use self::draft::{CUSTOM_CATEGORY_CHOICE, DraftError, RecommendationDraft};
pub use self::error::RecommendationError;
pub use self::filter::{
    ALL_CATEGORIES, CategoryFilter, DEFAULT_CATEGORIES, DateRange, EmptyState, FilterSpec,
    StatusFilter, StatusFilterParseError, VisibleRecommendations,
};
pub use self::mutation_service::MutationPipeline;
pub use self::notice::{MutationKind, Notice, NoticeLevel};
pub use self::recommendation::{
    NewRecommendation, Recommendation, RecommendationId, RecommendationIdError,
};
pub use self::session::{AccessToken, Session, SessionValidationError, UserId};
