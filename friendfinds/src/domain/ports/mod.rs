//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod notification_sink;
mod recommendation_store;

#[cfg(test)]
pub use notification_sink::MockNotificationSink;
pub use notification_sink::{NoOpNotificationSink, NotificationSink};
#[cfg(test)]
pub use recommendation_store::MockRecommendationStore;
pub use recommendation_store::{
    RecommendationPatch, RecommendationStore, RecommendationStoreError,
};
