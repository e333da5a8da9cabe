//! Data-ready interrupt bridge.
//!
//! The sensor pulls its INT line low when a new frame is available.
//! [`InterruptBridge`] turns that edge into a single-slot readiness flag:
//!
//! ```text
//!            notify()                      notify()
//!   Idle ──────────────────▶ Ready ◀──────────────────┐
//!    ▲                        │   └───────────────────┘
//!    └──── wait() returns ────┘      (coalesced)
//! ```
//!
//! Several interrupts before the consumer waits collapse into one Ready
//! state. The *occurrence* of an interrupt is never lost, but the count is.
//! The ranging layer reads one frame per wake-up, so this is the intended
//! behaviour; a consumer that needs per-event accounting needs a counting
//! primitive instead.

use core::convert::Infallible;
use core::future::Future;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::digital::Wait;

use crate::error::Interrupted;

/// Readiness flag shared between the interrupt context and one consumer.
///
/// Set and consume run under a critical section, so a `notify()` racing
/// with a `wait()` that is clearing the flag is either consumed by that
/// wait or left pending for the next one.
///
/// Create one per sensor, usually as a `static`:
///
/// ```ignore
/// static SENSOR_READY: InterruptBridge = InterruptBridge::new();
/// ```
pub struct InterruptBridge {
    ready: Signal<CriticalSectionRawMutex, ()>,
}

impl InterruptBridge {
    /// Create a bridge in the Idle state.
    pub const fn new() -> Self {
        Self {
            ready: Signal::new(),
        }
    }

    /// Mark data ready and wake the waiter, if any.
    ///
    /// Safe to call from an interrupt handler: never blocks and does no bus
    /// I/O. Idempotent while Ready.
    pub fn notify(&self) {
        self.ready.signal(());
    }

    /// Whether an interrupt is pending (Ready state). Does not consume it.
    pub fn is_ready(&self) -> bool {
        self.ready.signaled()
    }

    /// Suspend until Ready, then atomically return to Idle.
    ///
    /// Only one task may wait on a bridge at a time; a second waiter
    /// replaces the first one's wake-up registration.
    pub async fn wait(&self) {
        self.ready.wait().await;
    }

    /// Like [`wait`](Self::wait), but returns [`Interrupted`] if `cancel`
    /// completes first.
    ///
    /// A pending interrupt wins over a cancellation that is already
    /// complete. On cancellation the flag is left untouched.
    pub async fn wait_or<C: Future>(&self, cancel: C) -> Result<(), Interrupted> {
        match select(self.ready.wait(), cancel).await {
            Either::First(()) => Ok(()),
            Either::Second(_) => {
                #[cfg(feature = "defmt")]
                defmt::info!("wait for data ready interrupted");
                Err(Interrupted)
            }
        }
    }
}

impl Default for InterruptBridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward falling edges on the sensor's INT pin to `bridge`.
///
/// Runs forever in its own task; it only returns if the pin reports an
/// error.
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn sensor_int_task(mut pin: Input<'static>) {
///     let _ = forward_interrupts(&mut pin, &SENSOR_READY).await;
/// }
/// ```
pub async fn forward_interrupts<P: Wait>(
    pin: &mut P,
    bridge: &InterruptBridge,
) -> Result<Infallible, P::Error> {
    loop {
        pin.wait_for_falling_edge().await?;
        bridge.notify();
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPin;
    use embassy_futures::{block_on, poll_once};
    use std::task::Poll;

    // ── State machine ────────────────────────────────────────────────

    #[test]
    fn starts_idle() {
        let bridge = InterruptBridge::new();
        assert!(!bridge.is_ready());
        assert_eq!(poll_once(bridge.wait()), Poll::Pending);
    }

    #[test]
    fn notify_then_wait_returns_to_idle() {
        let bridge = InterruptBridge::new();
        bridge.notify();
        assert!(bridge.is_ready());

        block_on(bridge.wait());
        assert!(!bridge.is_ready());
    }

    #[test]
    fn burst_of_interrupts_coalesces_into_one_wake() {
        let bridge = InterruptBridge::new();
        bridge.notify();
        bridge.notify();

        assert_eq!(poll_once(bridge.wait()), Poll::Ready(()));
        // The second interrupt did not leave a second Ready behind.
        assert_eq!(poll_once(bridge.wait()), Poll::Pending);
    }

    #[test]
    fn interrupt_from_another_thread_wakes_waiter() {
        let bridge = InterruptBridge::new();

        std::thread::scope(|s| {
            s.spawn(|| {
                std::thread::sleep(std::time::Duration::from_millis(20));
                bridge.notify();
            });
            block_on(bridge.wait());
        });

        assert!(!bridge.is_ready());
        assert_eq!(poll_once(bridge.wait()), Poll::Pending);
    }

    #[test]
    fn interrupt_after_wait_started_wakes_waiter() {
        let bridge = InterruptBridge::new();
        let waiter = async {
            bridge.wait().await;
            7u8
        };
        let notifier = async {
            bridge.notify();
        };
        let (value, ()) = block_on(embassy_futures::join::join(waiter, notifier));
        assert_eq!(value, 7);
        assert!(!bridge.is_ready());
    }

    // ── Cancellation ─────────────────────────────────────────────────

    #[test]
    fn cancelled_wait_returns_interrupted_and_stays_idle() {
        let bridge = InterruptBridge::new();
        let result = block_on(bridge.wait_or(core::future::ready(())));
        assert_eq!(result, Err(Interrupted));
        assert!(!bridge.is_ready());

        // A later interrupt is still delivered normally.
        bridge.notify();
        assert_eq!(poll_once(bridge.wait()), Poll::Ready(()));
    }

    #[test]
    fn pending_interrupt_beats_cancellation() {
        let bridge = InterruptBridge::new();
        bridge.notify();
        let result = block_on(bridge.wait_or(core::future::ready(())));
        assert_eq!(result, Ok(()));
        assert!(!bridge.is_ready());
    }

    #[test]
    fn wait_without_cancellation_does_not_complete() {
        let bridge = InterruptBridge::new();
        let result = poll_once(bridge.wait_or(core::future::pending::<()>()));
        assert_eq!(result, Poll::Pending);
    }

    // ── Pin forwarding ───────────────────────────────────────────────

    #[test]
    fn forwarder_sets_flag_per_edge_until_pin_error() {
        let bridge = InterruptBridge::new();
        let mut pin = MockPin::with_edges(3);

        let result = block_on(forward_interrupts(&mut pin, &bridge));
        assert!(result.is_err());
        // Three edges coalesced into one pending wake-up.
        assert!(bridge.is_ready());
        assert_eq!(pin.edges_seen, 3);
    }
}
