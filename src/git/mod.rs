pub mod parser;
pub mod repo;

pub use repo::GitRepo;
