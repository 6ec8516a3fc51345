pub mod controller;
pub mod import;
pub mod router;
pub mod service;
