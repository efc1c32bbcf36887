// ── Client handle registry ──
//
// Holds the active controller client so it survives reconfiguration and
// can be picked up by services built later, without threading it through
// every call site. The handle is cloned into whoever needs it; there is no
// process-global instance.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::debug;

use crate::client::ControllerClient;

type SharedClient = Arc<dyn ControllerClient>;

/// Replaceable, shareable reference to the active [`ControllerClient`].
///
/// Cheaply cloneable; all clones observe the same slot. Reads and writes
/// are lock-free atomic swaps, so `set` may race with `get_or_default`
/// from other tasks.
#[derive(Clone, Default)]
pub struct ClientRegistry {
    // `ArcSwap` needs a sized payload, hence the inner `Arc<dyn _>`.
    slot: Arc<ArcSwapOption<SharedClient>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active client. `None` clears the registry.
    pub fn set(&self, client: Option<SharedClient>) {
        debug!(present = client.is_some(), "controller client registry updated");
        self.slot.store(client.map(Arc::new));
    }

    /// The active client, if any.
    pub fn get(&self) -> Option<SharedClient> {
        self.slot.load_full().map(|c| Arc::clone(c.as_ref()))
    }

    /// `explicit` when given, otherwise the registered client.
    pub fn get_or_default(&self, explicit: Option<SharedClient>) -> Option<SharedClient> {
        explicit.or_else(|| self.get())
    }

    pub fn is_set(&self) -> bool {
        self.slot.load().is_some()
    }
}

impl std::fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("set", &self.is_set())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::service::testing::FakeController;

    fn fake() -> SharedClient {
        Arc::new(FakeController::new())
    }

    #[test]
    fn empty_registry_yields_nothing() {
        let registry = ClientRegistry::new();
        assert!(!registry.is_set());
        assert!(registry.get_or_default(None).is_none());
    }

    #[test]
    fn registered_client_is_the_default() {
        let registry = ClientRegistry::new();
        let client = fake();
        registry.set(Some(Arc::clone(&client)));

        let resolved = registry.get_or_default(None).unwrap();
        assert!(Arc::ptr_eq(&resolved, &client));
    }

    #[test]
    fn explicit_client_wins() {
        let registry = ClientRegistry::new();
        registry.set(Some(fake()));
        let explicit = fake();

        let resolved = registry.get_or_default(Some(Arc::clone(&explicit))).unwrap();
        assert!(Arc::ptr_eq(&resolved, &explicit));
    }

    #[test]
    fn clones_share_the_slot_and_none_clears() {
        let registry = ClientRegistry::new();
        let other = registry.clone();
        registry.set(Some(fake()));
        assert!(other.is_set());

        other.set(None);
        assert!(!registry.is_set());
    }
}
