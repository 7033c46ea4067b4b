//! Stores: the contract the adapter consumes, and a reducer-backed implementation.
//!
//! A store holds the current state, accepts actions through `dispatch`, and
//! calls registered listeners after every change. Listeners receive no
//! payload; they read the state back with `get_state`.
//!
//! # Example
//!
//! ```ignore
//! let store = ReducerStore::new(0, |state: &i64, delta: &i64| state + delta);
//!
//! let unsubscribe = store.subscribe(Box::new(|| println!("changed")))?;
//! store.dispatch(5)?;
//! unsubscribe.call()?;
//! ```

mod contract;
mod listeners;
mod reducer;

pub use contract::{Listener, Store, Unsubscribe};
pub use listeners::{ListenerId, ListenerRegistry};
pub use reducer::ReducerStore;
