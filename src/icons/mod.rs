pub mod store;

pub use store::IconStore;
