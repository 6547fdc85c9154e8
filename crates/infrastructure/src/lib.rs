//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_security_store;
mod postgres_audit_repository;
mod postgres_authorization_repository;
mod postgres_security_admin_repository;
mod postgres_security_rows;

pub use in_memory_security_store::InMemorySecurityStore;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_security_admin_repository::PostgresSecurityAdminRepository;
