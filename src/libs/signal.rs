//! Typed signals flowing from the input listeners (and Ctrl-C) into the
//! tracking loop.

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// First input after an AFK period.
    Wake,
    /// The menu hotkey was pressed.
    MenuRequested,
    /// Tracking should end after the current tick.
    Stop,
}

pub type SignalSender = mpsc::UnboundedSender<Signal>;
pub type SignalReceiver = mpsc::UnboundedReceiver<Signal>;

pub fn channel() -> (SignalSender, SignalReceiver) {
    mpsc::unbounded_channel()
}

/// Signals received but not yet acted on.
///
/// Each flag is edge-triggered: repeated signals before the next tick
/// collapse into one, and taking a flag clears it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PendingSignals {
    pub wake: bool,
    pub menu: bool,
    pub stop: bool,
}

impl PendingSignals {
    pub fn absorb(&mut self, signal: Signal) {
        match signal {
            Signal::Wake => self.wake = true,
            Signal::MenuRequested => self.menu = true,
            Signal::Stop => self.stop = true,
        }
    }

    /// Moves everything already queued on `receiver` into the flags.
    pub fn drain(&mut self, receiver: &mut SignalReceiver) {
        while let Ok(signal) = receiver.try_recv() {
            self.absorb(signal);
        }
    }

    pub fn take_wake(&mut self) -> bool {
        std::mem::take(&mut self.wake)
    }

    pub fn take_menu(&mut self) -> bool {
        std::mem::take(&mut self.menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_signals_collapse() {
        let (tx, mut rx) = channel();
        tx.send(Signal::Wake).unwrap();
        tx.send(Signal::Wake).unwrap();
        tx.send(Signal::MenuRequested).unwrap();

        let mut pending = PendingSignals::default();
        pending.drain(&mut rx);

        assert!(pending.take_wake());
        assert!(!pending.take_wake());
        assert!(pending.take_menu());
        assert!(!pending.stop);
    }

    #[test]
    fn drain_on_empty_channel_is_noop() {
        let (_tx, mut rx) = channel();
        let mut pending = PendingSignals::default();
        pending.drain(&mut rx);
        assert_eq!(pending, PendingSignals::default());
    }
}
