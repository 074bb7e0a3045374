pub mod controller;
pub mod cookies;
pub mod router;
pub mod service;
pub mod store;
