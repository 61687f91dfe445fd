//! Error handling for diagramkit
//!
//! Canvas operations that violate a precondition (duplicate membership,
//! unknown endpoints, reentrant synchronization, ...) return [`CanvasError`].
//! Plain lookups that may miss return `Option` instead.

use thiserror::Error;

use crate::ids::{ContainerId, ObjectId};

/// Canvas error type
///
/// Represents contract violations on the item collection, the container
/// pool, selection synchronization, and gesture lifecycles.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanvasError {
    /// The object is already a member of the collection
    #[error("Item {id} is already in the collection")]
    DuplicateItem {
        /// The duplicated object id.
        id: ObjectId,
    },

    /// The object is not a member of the collection
    #[error("Item {id} is not in the collection")]
    UnknownItem {
        /// The missing object id.
        id: ObjectId,
    },

    /// A connection references an entity that is not in the collection
    #[error("Connection {connection} references unknown entity {entity}")]
    UnknownEndpoint {
        /// The connection being added.
        connection: ObjectId,
        /// The endpoint entity that could not be found.
        entity: ObjectId,
    },

    /// The container is not currently bound to an item
    #[error("{container} is not bound to an item")]
    ContainerNotBound {
        /// The container handle.
        container: ContainerId,
    },

    /// The container handle was never produced by this generator
    #[error("{container} is unknown to the generator")]
    UnknownContainer {
        /// The container handle.
        container: ContainerId,
    },

    /// A selection synchronization pass was entered while one was active
    #[error("Selection synchronization re-entered while a pass is active")]
    ReentrantSynchronization,

    /// A gesture update arrived with no gesture in progress
    #[error("No gesture in progress")]
    NoActiveGesture,

    /// A gesture was started while another one is still running
    #[error("A gesture is already in progress")]
    GestureInProgress,

    /// The operation requires an entity
    #[error("Item {id} is not an entity")]
    NotAnEntity {
        /// The offending object id.
        id: ObjectId,
    },
}

/// Result type for canvas operations
pub type Result<T> = std::result::Result<T, CanvasError>;
