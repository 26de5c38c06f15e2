//! In-memory storage adapters for tests and local development.

mod check_in_repository;
mod member_repository;
mod waiver_repository;

pub use check_in_repository::InMemoryCheckInRepository;
pub use member_repository::InMemoryMemberRepository;
pub use waiver_repository::InMemoryWaiverRepository;
