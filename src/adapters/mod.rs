// Adapters layer: concrete implementations of the domain ports (catalog, http backend, contract).

pub mod catalog;
pub mod contract;
pub mod http;
