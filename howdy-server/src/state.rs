use howdy_core::MessageProvider;

/// Shared application state, cloned into every handler.
///
/// The provider never mutates after startup, so handlers may read it
/// concurrently without locks.
#[derive(Clone)]
pub struct AppState {
    pub provider: MessageProvider,
}
