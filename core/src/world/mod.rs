//! World state and event dispatch
//!
//! - **Actors**: snapshot types owned by the world
//! - **Events**: tagged-union change notifications, drained once per tick
//! - **Party**: stable slot roster
//! - **State**: the authoritative snapshot and its ingest API

mod actor;
mod event;
mod party;
mod state;


pub use actor::{ActionId, Actor, ActorId, ActorType, CastInfo, MAX_STATUSES, Status, Tether};
pub use event::{CastEvent, CastTarget, WorldEvent};
pub use party::{MAX_PARTY_SIZE, PartyState};
pub use state::WorldState;
