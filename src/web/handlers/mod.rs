pub mod auth;
pub mod classes;
pub mod dashboards;
pub mod pages;
pub mod portfolio;
pub mod progress;
pub mod projects;
