// Storage backends shared by the player, game and shot repositories.
//
// Each repository trait is implemented for both stores in its own module's
// repository.rs, so a single store instance can be handed out as every
// repository at once.

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use relation::{first_related, Related};

mod memory;
pub(crate) mod postgres;
mod relation;
