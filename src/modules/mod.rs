pub mod accounts;
pub mod admins;
pub mod auth;
pub mod class_access;
pub mod classes;
pub mod colleges;
pub mod students;
pub mod teachers;
pub mod videos;
