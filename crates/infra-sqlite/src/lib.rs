// Hireflow Infrastructure - SQLite Adapter
// Implements: JobStore, ApplicationStore, InterviewStore, CatalogStore

mod application_store;
mod catalog_store;
mod connection;
mod error;
mod interview_store;
mod job_store;
mod migration;
mod query;

#[cfg(test)]
mod testing;

pub use application_store::SqliteApplicationStore;
pub use catalog_store::SqliteCatalogStore;
pub use connection::create_pool;
pub use interview_store::SqliteInterviewStore;
pub use job_store::SqliteJobStore;
pub use migration::run_migrations;
