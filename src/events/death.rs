//! Death notifications.
//!
//! When a generator's lifetime ends, its `on_death` callback posts a
//! [`DeathNotice`] on an unbounded channel owned by the
//! [`Registry`](crate::resources::registry::Registry). The registry drains
//! the channel in [`removal_system`](crate::systems::lifetime::removal_system),
//! which is the only place generators leave the live set.

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::components::generator::GeneratorId;
use crate::components::lifetime::DeathCallback;

/// Posted by each death subscription when a generator's life ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeathNotice {
    pub id: GeneratorId,
}

/// Both ends of the death notice channel.
#[derive(Clone, Debug)]
pub struct DeathChannel {
    tx: Sender<DeathNotice>,
    rx: Receiver<DeathNotice>,
}

impl Default for DeathChannel {
    fn default() -> Self {
        let (tx, rx) = unbounded::<DeathNotice>();
        DeathChannel { tx, rx }
    }
}

impl DeathChannel {
    /// A callback suitable for `LifetimeManager::on_death` that reports `id`.
    pub fn notifier(&self, id: GeneratorId) -> DeathCallback {
        let tx = self.tx.clone();
        Box::new(move || {
            // A failed send means the registry is gone; nothing left to remove.
            let _ = tx.send(DeathNotice { id });
        })
    }

    /// Take every notice posted so far.
    pub fn drain(&self) -> Vec<DeathNotice> {
        self.rx.try_iter().collect()
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifier_posts_its_id() {
        let channel = DeathChannel::default();
        (channel.notifier(GeneratorId(4)))();
        (channel.notifier(GeneratorId(9)))();
        assert_eq!(channel.pending(), 2);
        let ids: Vec<_> = channel.drain().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![GeneratorId(4), GeneratorId(9)]);
        assert_eq!(channel.pending(), 0);
    }
}
