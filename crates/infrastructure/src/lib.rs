//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_skill_repository;
mod postgres_audit_repository;
mod postgres_directory_repository;
mod postgres_job_profile_repository;
mod postgres_reporting_repository;
mod postgres_skill_repository;
mod rows;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_skill_repository::InMemorySkillRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_directory_repository::PostgresDirectoryRepository;
pub use postgres_job_profile_repository::PostgresJobProfileRepository;
pub use postgres_reporting_repository::PostgresReportingRepository;
pub use postgres_skill_repository::{PostgresAssessmentUnitOfWork, PostgresSkillRepository};
