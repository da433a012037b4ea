pub mod extractor;
pub mod handlers;
pub mod middleware;
pub mod provider;
pub mod store;

pub use extractor::CurrentUser;
pub use provider::{AuthProvider, HostedAuthProvider, MockAuthProvider, ProviderSession};
pub use store::{AuthState, ProfileUpdate, SessionStore};
