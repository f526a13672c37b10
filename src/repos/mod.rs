pub mod error;
pub mod memory_principal_repo;
pub mod pg_principal_repo;
pub mod principal_repo;

pub use memory_principal_repo::InMemoryPrincipalRepo;
pub use pg_principal_repo::PgPrincipalRepo;
pub use principal_repo::{NewPrincipal, PrincipalDirectory, PrincipalRecord, ProfileUpdate, Role};
