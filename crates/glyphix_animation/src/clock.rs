//! Frame clock
//!
//! The host owns the display-synchronization source and forwards its ticks
//! as [`FrameContext`] values. Components that animate hold a [`FrameLink`],
//! which subscribes to the host's [`FrameSource`] only while something is
//! moving and turns consecutive ticks into speed-scaled frame deltas.
//!
//! # Example
//!
//! ```ignore
//! use glyphix_animation::{FrameContext, FrameLink, RecordingFrameSource};
//!
//! let source = RecordingFrameSource::new();
//! let mut link = FrameLink::new(source.clone());
//! link.request();
//! assert!(source.is_subscribed());
//!
//! link.delta(&FrameContext::new(0.0, 1.0 / 60.0));
//! let dt = link.delta(&FrameContext::new(1.0 / 60.0, 2.0 / 60.0));
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// One display refresh, in seconds
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameContext {
    /// When the previous frame was presented
    pub timestamp: f64,
    /// When the frame being prepared will be presented
    pub target_timestamp: f64,
    /// Nominal refresh interval
    pub duration: f64,
}

impl FrameContext {
    pub fn new(timestamp: f64, target_timestamp: f64) -> Self {
        Self {
            timestamp,
            target_timestamp,
            duration: target_timestamp - timestamp,
        }
    }
}

/// A source of frame ticks that can be switched on and off.
///
/// Implementations deliver ticks to the owner on its own thread; the
/// subscriber never locks.
pub trait FrameSource {
    fn subscribe(&mut self);
    fn unsubscribe(&mut self);
}

// ============================================================================
// Frame timing
// ============================================================================

/// Converts consecutive frame ticks into elapsed animation time
#[derive(Clone, Copy, Debug)]
pub struct FrameTimer {
    last_target: Option<f64>,
    speed: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last_target: None,
            speed: 1.0,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Scale elapsed time; values below 1 slow animations down
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// Forget the previous tick so the next one measures nothing
    pub fn reset(&mut self) {
        self.last_target = None;
    }

    /// Elapsed animation time since the previous tick.
    ///
    /// The first tick after construction or [`reset`](Self::reset) yields 0.
    /// Timestamps that go backwards yield a non-positive delta.
    pub fn delta(&mut self, frame: &FrameContext) -> f32 {
        let Some(last) = self.last_target.replace(frame.target_timestamp) else {
            return 0.0;
        };
        ((frame.target_timestamp - last) * self.speed as f64) as f32
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Subscription bookkeeping
// ============================================================================

/// A subscription to a [`FrameSource`] that is only active while requested
pub struct FrameLink {
    source: Box<dyn FrameSource>,
    timer: FrameTimer,
    subscribed: bool,
}

impl FrameLink {
    pub fn new(source: impl FrameSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            timer: FrameTimer::new(),
            subscribed: false,
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Start receiving ticks if not already subscribed
    pub fn request(&mut self) {
        if self.subscribed {
            return;
        }
        self.timer.reset();
        self.source.subscribe();
        self.subscribed = true;
        tracing::debug!("FrameLink: subscribed");
    }

    /// Stop receiving ticks if subscribed
    pub fn release(&mut self) {
        if !self.subscribed {
            return;
        }
        self.source.unsubscribe();
        self.subscribed = false;
        tracing::debug!("FrameLink: unsubscribed");
    }

    pub fn delta(&mut self, frame: &FrameContext) -> f32 {
        self.timer.delta(frame)
    }

    pub fn speed(&self) -> f32 {
        self.timer.speed()
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.timer.set_speed(speed);
    }
}

impl fmt::Debug for FrameLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameLink")
            .field("timer", &self.timer)
            .field("subscribed", &self.subscribed)
            .finish_non_exhaustive()
    }
}

impl Drop for FrameLink {
    fn drop(&mut self) {
        self.release();
    }
}

// ============================================================================
// Frame sources
// ============================================================================

/// Forwards subscription changes to a closure (`true` on subscribe).
///
/// Use this to start and stop a platform display link or to wake an event
/// loop.
pub struct CallbackFrameSource {
    callback: Box<dyn FnMut(bool)>,
}

impl CallbackFrameSource {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnMut(bool) + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }
}

impl FrameSource for CallbackFrameSource {
    fn subscribe(&mut self) {
        (self.callback)(true);
    }

    fn unsubscribe(&mut self) {
        (self.callback)(false);
    }
}

/// Frame source that only records subscription changes.
///
/// Clones share their counters, so a test can keep one handle while the
/// animating component owns another.
#[derive(Clone, Debug, Default)]
pub struct RecordingFrameSource {
    state: Rc<RecordingState>,
}

#[derive(Debug, Default)]
struct RecordingState {
    subscribes: Cell<usize>,
    unsubscribes: Cell<usize>,
    active: Cell<bool>,
}

impl RecordingFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_count(&self) -> usize {
        self.state.subscribes.get()
    }

    pub fn unsubscribe_count(&self) -> usize {
        self.state.unsubscribes.get()
    }

    pub fn is_subscribed(&self) -> bool {
        self.state.active.get()
    }
}

impl FrameSource for RecordingFrameSource {
    fn subscribe(&mut self) {
        self.state.subscribes.set(self.state.subscribes.get() + 1);
        self.state.active.set(true);
    }

    fn unsubscribe(&mut self) {
        self.state.unsubscribes.set(self.state.unsubscribes.get() + 1);
        self.state.active.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_first_tick_measures_nothing() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.delta(&FrameContext::new(0.0, 0.016)), 0.0);
        let dt = timer.delta(&FrameContext::new(0.016, 0.032));
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_speed_scales_delta() {
        let mut timer = FrameTimer::new();
        timer.set_speed(0.5);
        timer.delta(&FrameContext::new(0.0, 1.0));
        assert!((timer.delta(&FrameContext::new(1.0, 1.1)) - 0.05).abs() < 1e-6);

        timer.set_speed(-3.0);
        assert_eq!(timer.speed(), 0.0);
    }

    #[test]
    fn test_backwards_timestamp_is_non_positive() {
        let mut timer = FrameTimer::new();
        timer.delta(&FrameContext::new(1.0, 2.0));
        assert!(timer.delta(&FrameContext::new(1.0, 1.5)) <= 0.0);
        assert!(timer.delta(&FrameContext::new(1.5, 1.5)) <= 0.0);
    }

    #[test]
    fn test_link_subscribes_once() {
        let source = RecordingFrameSource::new();
        let mut link = FrameLink::new(source.clone());

        link.request();
        link.request();
        assert_eq!(source.subscribe_count(), 1);
        assert!(source.is_subscribed());

        link.release();
        link.release();
        assert_eq!(source.unsubscribe_count(), 1);
        assert!(!source.is_subscribed());
    }

    #[test]
    fn test_resubscribe_resets_timer() {
        let source = RecordingFrameSource::new();
        let mut link = FrameLink::new(source);
        link.request();
        link.delta(&FrameContext::new(0.0, 1.0));
        link.release();

        link.request();
        // A long idle gap must not show up as one huge step.
        assert_eq!(link.delta(&FrameContext::new(9.0, 10.0)), 0.0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let source = RecordingFrameSource::new();
        {
            let mut link = FrameLink::new(source.clone());
            link.request();
        }
        assert!(!source.is_subscribed());
    }

    #[test]
    fn test_callback_source() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let mut link = FrameLink::new(CallbackFrameSource::new(move |on| {
            sink.borrow_mut().push(on);
        }));
        link.request();
        link.release();
        assert_eq!(*events.borrow(), vec![true, false]);
    }
}
