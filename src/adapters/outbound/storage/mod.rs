/// Storage adapters for the publish destination
mod gcs_object_store;

pub use gcs_object_store::GcsObjectStore;
