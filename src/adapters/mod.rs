// Adapters layer: concrete implementations for external systems (http, ui surface, storage).

pub mod http;
pub mod storage;
pub mod surface;
