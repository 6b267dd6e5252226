// Service exports
pub mod cache;
pub mod firestore;

pub use cache::DisasterCache;
pub use firestore::{FirestoreClient, FirestoreCollections, FirestoreError};
