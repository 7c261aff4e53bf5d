// Document builder API: create, update, fetch, list, archive/restore.
// Handlers stay thin; all rules live in `service` and `merge`.

pub mod handlers;
pub mod ids;
pub mod merge;
pub mod payload;
pub mod service;
