// Network Monitor Core
//
// DB-agnostic domain types shared by the control plane and the CLI:
// - Event: one connectivity observation (wifi + internet reachability)
// - NewEvent: input for event creation, before the store assigns an id
// - EventFilter: the named "disconnected" views over the event log
// - Limit handling: 0 or negative means unlimited

pub mod event;
pub mod filter;
pub mod timestamp;

pub use event::{most_recent_first, Event, EventId, NewEvent, MAX_MESSAGE_CHARS};
pub use filter::{effective_limit, EventFilter, ParseFilterError};
