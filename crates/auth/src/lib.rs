//! Session lifecycle for Budgetra.
//!
//! - [`AuthBackend`]: the hosted auth service as seen by the app, with a
//!   [`GoTrueClient`] implementation over HTTP and an in-process
//!   [`InMemoryAuthBackend`].
//! - [`SessionStore`]: owned, observable `{identity, loading}` state.
//! - [`SessionBootstrapper`]: fetches the initial session, follows change
//!   notifications and is the only writer of the store.
//! - [`resolve_view`]: pure mapping from store state to the [`View`] to show.

pub mod backend;
pub mod bootstrap;
pub mod error;
pub mod gate;
pub mod gotrue;
pub mod memory;
pub mod session;
pub mod storage;
pub mod store;

pub use backend::{AuthBackend, AuthEvents, AuthSubscription, Notification};
pub use bootstrap::{BootstrapHandle, SessionBootstrapper};
pub use error::{AuthError, StorageError};
pub use gate::{resolve_view, View};
pub use gotrue::GoTrueClient;
pub use memory::InMemoryAuthBackend;
pub use session::{AuthChangeEvent, AuthStateChange, Session, SignUpOutcome, User};
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};
pub use store::{SessionPatch, SessionState, SessionStore};
