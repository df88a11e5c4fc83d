pub mod client;
pub mod controller;
pub mod registry;
pub mod retry;
