//! Input interception: the per-event decision path
//!
//! Every system-wide key and mouse event reaches an [`InputSink`] on the hook
//! thread, synchronously, before any application sees it. The sink answers
//! [`Verdict::Pass`] or [`Verdict::Suppress`]. Everything here runs inside the
//! OS input path, so it does no I/O and never blocks for long.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::actions::ActionExecutor;
use crate::bindings::{Binding, MouseButton, SharedBindings, Trigger, WheelDirection};

use super::keys::is_modifier_key;
use super::modifiers::ModifierStateSource;
use super::suppression::SuppressionGuard;

/// Decision for one input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Forward unchanged to the next hook and the OS
    Pass,
    /// Consume the event; nothing else observes it
    Suppress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTransition {
    Down,
    Up,
}

/// A keyboard event as reported by the platform hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: u16,
    pub transition: KeyTransition,
    /// Synthesized by this process; other injected input counts as physical
    pub self_injected: bool,
}

#[cfg(test)]
impl KeyEvent {
    pub fn down(code: u16) -> Self {
        Self {
            code,
            transition: KeyTransition::Down,
            self_injected: false,
        }
    }

    pub fn up(code: u16) -> Self {
        Self {
            code,
            transition: KeyTransition::Up,
            self_injected: false,
        }
    }

    pub fn self_injected(mut self) -> Self {
        self.self_injected = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    ButtonDown(MouseButton),
    ButtonUp(MouseButton),
    /// Vertical wheel; positive is away from the user
    Wheel { delta: i32 },
    /// Movement, horizontal wheel and anything else
    Other,
}

/// A mouse event as reported by the platform hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub self_injected: bool,
}

#[cfg(test)]
impl MouseEvent {
    pub fn new(kind: MouseEventKind) -> Self {
        Self {
            kind,
            self_injected: false,
        }
    }

    pub fn self_injected(mut self) -> Self {
        self.self_injected = true;
        self
    }
}

/// Receiver of raw input, called once per event in delivery order
pub trait InputSink: Send + Sync {
    fn on_key_event(&self, event: KeyEvent) -> Verdict;
    fn on_mouse_event(&self, event: MouseEvent) -> Verdict;
}

/// Matches events against the active bindings and fires actions
pub struct Interceptor {
    bindings: SharedBindings,
    modifiers: Arc<dyn ModifierStateSource>,
    guard: SuppressionGuard,
    executor: ActionExecutor,
    /// Buttons whose press was consumed; their release is consumed too
    held_buttons: Mutex<HashSet<MouseButton>>,
}

impl Interceptor {
    pub fn new(
        bindings: SharedBindings,
        modifiers: Arc<dyn ModifierStateSource>,
        executor: ActionExecutor,
    ) -> Self {
        Self {
            bindings,
            modifiers,
            guard: SuppressionGuard::new(),
            executor,
            held_buttons: Mutex::new(HashSet::new()),
        }
    }

    #[cfg(test)]
    pub fn guard(&self) -> &SuppressionGuard {
        &self.guard
    }

    /// Match a trigger; on a match fire the action and consume the event
    fn try_fire(&self, trigger: Trigger) -> Verdict {
        let table = self.bindings.snapshot();
        let Some(binding) = table.find(trigger, self.modifiers.as_ref()) else {
            return Verdict::Pass;
        };

        self.fire(binding);
        Verdict::Suppress
    }

    fn fire(&self, binding: &Binding) {
        self.guard.mark_pending(self.modifiers.as_ref());
        let dispatch = self.executor.execute(binding.action);
        debug!(%binding, ?dispatch, "binding fired");
    }

    /// A new press ends any pairing left over from a release the hook never
    /// saw.
    fn button_down(&self, button: MouseButton) -> Verdict {
        if self.held_buttons.lock().remove(&button) {
            debug!(?button, "stale button pairing cleared");
        }

        let verdict = self.try_fire(Trigger::MouseButton(button));
        if verdict == Verdict::Suppress {
            self.held_buttons.lock().insert(button);
        }
        verdict
    }

    /// A release is consumed when its press was, whatever the modifiers do in
    /// between.
    fn button_up(&self, button: MouseButton) -> Verdict {
        if self.held_buttons.lock().remove(&button) {
            Verdict::Suppress
        } else {
            Verdict::Pass
        }
    }
}

impl InputSink for Interceptor {
    fn on_key_event(&self, event: KeyEvent) -> Verdict {
        if event.self_injected {
            return Verdict::Pass;
        }

        match event.transition {
            KeyTransition::Down if is_modifier_key(event.code) => Verdict::Pass,
            KeyTransition::Down => self.try_fire(Trigger::Key(event.code)),
            KeyTransition::Up => {
                if self.guard.on_key_release(event.code, self.executor.injector()) {
                    Verdict::Suppress
                } else {
                    Verdict::Pass
                }
            }
        }
    }

    fn on_mouse_event(&self, event: MouseEvent) -> Verdict {
        if event.self_injected {
            return Verdict::Pass;
        }

        match event.kind {
            MouseEventKind::ButtonDown(button) => self.button_down(button),
            MouseEventKind::ButtonUp(button) => self.button_up(button),
            MouseEventKind::Wheel { delta } => match WheelDirection::from_delta(delta) {
                Some(direction) => self.try_fire(Trigger::Wheel(direction)),
                None => Verdict::Pass,
            },
            MouseEventKind::Other => Verdict::Pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::injector::tests::RecordingInjector;
    use crate::actions::{KeyStroke, UnavailableCapture};
    use crate::bindings::{BindingRecord, BindingTable};
    use crate::hotkey::keys::vk;
    use crate::hotkey::modifiers::tests::FakeKeyboard;
    use crate::hotkey::suppression::INERT_KEY;

    struct Fixture {
        interceptor: Interceptor,
        keyboard: Arc<FakeKeyboard>,
        injector: Arc<RecordingInjector>,
        bindings: SharedBindings,
    }

    impl Fixture {
        fn new(records: &[BindingRecord]) -> Self {
            let (table, _) = BindingTable::from_records(records);
            let bindings = SharedBindings::new(table);
            let keyboard = Arc::new(FakeKeyboard::default());
            let injector = Arc::new(RecordingInjector::default());
            let executor = ActionExecutor::new(injector.clone(), Arc::new(UnavailableCapture));
            let interceptor = Interceptor::new(bindings.clone(), keyboard.clone(), executor);

            Self {
                interceptor,
                keyboard,
                injector,
                bindings,
            }
        }

        /// Physical key press: state changes first, then the hook sees it
        fn key_down(&self, code: u16) -> Verdict {
            self.keyboard.press(code);
            self.interceptor.on_key_event(KeyEvent::down(code))
        }

        fn key_up(&self, code: u16) -> Verdict {
            self.keyboard.release(code);
            self.interceptor.on_key_event(KeyEvent::up(code))
        }

        fn mouse(&self, kind: MouseEventKind) -> Verdict {
            self.interceptor.on_mouse_event(MouseEvent::new(kind))
        }
    }

    fn default_records() -> Vec<BindingRecord> {
        vec![
            BindingRecord::new("wheel_up", "volume_up").with_free("left"),
            BindingRecord::new("wheel_down", "volume_down").with_free("left"),
            BindingRecord::new("mouse_x2", "next_track").with_free("left"),
            BindingRecord::new("mouse_x1", "prev_track").with_free("left"),
            BindingRecord::new("mouse_middle", "play_pause").with_free("left"),
        ]
    }

    #[test]
    fn test_wheel_chord_fires_once_and_suppresses() {
        let fx = Fixture::new(&[BindingRecord::new("wheel_up", "volume_up").with_free("left")]);

        fx.key_down(vk::LWIN);
        let verdict = fx.mouse(MouseEventKind::Wheel { delta: 120 });

        assert_eq!(verdict, Verdict::Suppress);
        assert_eq!(fx.injector.taps(), vec![vk::VOLUME_UP]);
    }

    #[test]
    fn test_unmatched_events_pass() {
        let fx = Fixture::new(&default_records());

        assert_eq!(fx.mouse(MouseEventKind::Wheel { delta: 120 }), Verdict::Pass);
        assert_eq!(fx.mouse(MouseEventKind::ButtonDown(MouseButton::X2)), Verdict::Pass);
        assert_eq!(fx.mouse(MouseEventKind::ButtonUp(MouseButton::X2)), Verdict::Pass);
        assert_eq!(fx.mouse(MouseEventKind::Wheel { delta: 0 }), Verdict::Pass);
        assert_eq!(fx.mouse(MouseEventKind::Other), Verdict::Pass);
        assert_eq!(fx.key_down(0x41), Verdict::Pass);
        assert!(fx.injector.batches().is_empty());
    }

    #[test]
    fn test_wheel_ticks_are_not_coalesced() {
        let fx = Fixture::new(&default_records());
        fx.key_down(vk::LWIN);

        for _ in 0..3 {
            assert_eq!(fx.mouse(MouseEventKind::Wheel { delta: -120 }), Verdict::Suppress);
        }
        assert_eq!(fx.injector.taps(), vec![vk::VOLUME_DOWN; 3]);
    }

    #[test]
    fn test_first_match_wins() {
        let fx = Fixture::new(&[
            BindingRecord::new("key_f13", "play_pause"),
            BindingRecord::new("key_f13", "volume_mute"),
        ]);

        for _ in 0..5 {
            assert_eq!(fx.key_down(0x7C), Verdict::Suppress);
            assert_eq!(fx.key_up(0x7C), Verdict::Pass);
        }
        assert_eq!(fx.injector.taps(), vec![vk::MEDIA_PLAY_PAUSE; 5]);
    }

    #[test]
    fn test_modifier_keys_never_trigger() {
        let fx = Fixture::new(&[BindingRecord::new("key_lctrl", "volume_up")]);

        assert_eq!(fx.key_down(vk::LCONTROL), Verdict::Pass);
        assert_eq!(fx.key_up(vk::LCONTROL), Verdict::Pass);
        assert!(fx.injector.batches().is_empty());
    }

    #[test]
    fn test_suppression_sequence() {
        let fx = Fixture::new(&default_records());

        assert_eq!(fx.key_down(vk::LWIN), Verdict::Pass);

        assert_eq!(fx.mouse(MouseEventKind::ButtonDown(MouseButton::X2)), Verdict::Suppress);
        assert_eq!(fx.mouse(MouseEventKind::ButtonUp(MouseButton::X2)), Verdict::Suppress);
        assert_eq!(fx.injector.taps(), vec![vk::MEDIA_NEXT_TRACK]);
        assert!(fx.interceptor.guard().is_pending());

        // The physical release is replaced by an inert tap plus a synthetic release
        assert_eq!(fx.key_up(vk::LWIN), Verdict::Suppress);
        let batches = fx.injector.batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(
            batches[1],
            vec![
                KeyStroke::press(INERT_KEY),
                KeyStroke::release(INERT_KEY),
                KeyStroke::release(vk::LWIN),
            ]
        );
        assert!(!fx.interceptor.guard().is_pending());

        // The synthetic release comes back through the hook and passes
        let replayed = KeyEvent::up(vk::LWIN).self_injected();
        assert_eq!(fx.interceptor.on_key_event(replayed), Verdict::Pass);

        // A plain Windows key tap afterwards is untouched
        assert_eq!(fx.key_down(vk::LWIN), Verdict::Pass);
        assert_eq!(fx.key_up(vk::LWIN), Verdict::Pass);
        assert_eq!(fx.injector.batches().len(), 2);
    }

    #[test]
    fn test_action_without_free_modifier_does_not_arm_guard() {
        let fx = Fixture::new(&[
            BindingRecord::new("mouse_middle", "play_pause").with_ctrl("either"),
        ]);

        fx.key_down(vk::RCONTROL);
        assert_eq!(fx.mouse(MouseEventKind::ButtonDown(MouseButton::Middle)), Verdict::Suppress);
        assert!(!fx.interceptor.guard().is_pending());
    }

    #[test]
    fn test_extended_button_up_suppressed_after_modifier_change() {
        let fx = Fixture::new(&default_records());

        fx.key_down(vk::LWIN);
        assert_eq!(fx.mouse(MouseEventKind::ButtonDown(MouseButton::X1)), Verdict::Suppress);

        // Modifier released between down and up: the up is still consumed
        fx.key_up(vk::LWIN);
        assert_eq!(fx.mouse(MouseEventKind::ButtonUp(MouseButton::X1)), Verdict::Suppress);

        // Action fired exactly once, on the press
        assert_eq!(
            fx.injector.taps().iter().filter(|&&c| c == vk::MEDIA_PREV_TRACK).count(),
            1
        );

        // The next unmatched press/release pair passes
        assert_eq!(fx.mouse(MouseEventKind::ButtonDown(MouseButton::X1)), Verdict::Pass);
        assert_eq!(fx.mouse(MouseEventKind::ButtonUp(MouseButton::X1)), Verdict::Pass);
    }

    #[test]
    fn test_release_without_matched_press_passes() {
        let fx = Fixture::new(&default_records());

        assert_eq!(fx.mouse(MouseEventKind::ButtonDown(MouseButton::X2)), Verdict::Pass);
        fx.key_down(vk::LWIN);
        // Modifiers now match, but the press was forwarded, so the release is too
        assert_eq!(fx.mouse(MouseEventKind::ButtonUp(MouseButton::X2)), Verdict::Pass);
        assert!(fx.injector.batches().is_empty());
    }

    #[test]
    fn test_both_sides_requirement() {
        let fx = Fixture::new(&[BindingRecord {
            shift: Some("both".into()),
            ..BindingRecord::new("key_f14", "volume_mute")
        }]);

        fx.key_down(vk::LSHIFT);
        assert_eq!(fx.key_down(0x7D), Verdict::Pass);
        fx.key_up(0x7D);

        fx.key_down(vk::RSHIFT);
        assert_eq!(fx.key_down(0x7D), Verdict::Suppress);
        fx.key_up(0x7D);

        fx.key_up(vk::LSHIFT);
        assert_eq!(fx.key_down(0x7D), Verdict::Pass);
        assert_eq!(fx.injector.taps(), vec![vk::VOLUME_MUTE]);
    }

    #[test]
    fn test_self_injected_events_are_ignored() {
        let fx = Fixture::new(&[
            BindingRecord::new("key_volume_up", "volume_down"),
            BindingRecord::new("wheel_up", "volume_up"),
        ]);

        let key = KeyEvent::down(vk::VOLUME_UP).self_injected();
        assert_eq!(fx.interceptor.on_key_event(key), Verdict::Pass);

        let wheel = MouseEvent::new(MouseEventKind::Wheel { delta: 120 }).self_injected();
        assert_eq!(fx.interceptor.on_mouse_event(wheel), Verdict::Pass);
        assert!(fx.injector.batches().is_empty());
    }

    #[test]
    fn test_foreign_injected_side_button_matches() {
        let fx = Fixture::new(&default_records());
        fx.key_down(vk::LWIN);

        // Re-emitted by a mouse utility: flagged injected by the OS, but not ours
        let press = MouseEvent::new(MouseEventKind::ButtonDown(MouseButton::X2));
        assert_eq!(fx.interceptor.on_mouse_event(press), Verdict::Suppress);
        assert_eq!(fx.mouse(MouseEventKind::ButtonUp(MouseButton::X2)), Verdict::Suppress);
        assert_eq!(fx.injector.taps(), vec![vk::MEDIA_NEXT_TRACK]);
    }

    #[test]
    fn test_matched_middle_click_consumed_both_ways() {
        let fx = Fixture::new(&default_records());
        fx.key_down(vk::LWIN);

        assert_eq!(fx.mouse(MouseEventKind::ButtonDown(MouseButton::Middle)), Verdict::Suppress);
        assert_eq!(fx.mouse(MouseEventKind::ButtonUp(MouseButton::Middle)), Verdict::Suppress);
        assert_eq!(fx.injector.taps(), vec![vk::MEDIA_PLAY_PAUSE]);

        // Unmatched left click is untouched
        assert_eq!(fx.mouse(MouseEventKind::ButtonDown(MouseButton::Left)), Verdict::Pass);
        assert_eq!(fx.mouse(MouseEventKind::ButtonUp(MouseButton::Left)), Verdict::Pass);
    }

    #[test]
    fn test_lost_release_does_not_swallow_next_click() {
        let fx = Fixture::new(&default_records());

        fx.key_down(vk::LWIN);
        assert_eq!(fx.mouse(MouseEventKind::ButtonDown(MouseButton::X1)), Verdict::Suppress);
        // The X1 release never reaches the hook
        fx.key_up(vk::LWIN);

        assert_eq!(fx.mouse(MouseEventKind::ButtonDown(MouseButton::X1)), Verdict::Pass);
        assert_eq!(fx.mouse(MouseEventKind::ButtonUp(MouseButton::X1)), Verdict::Pass);
    }

    #[test]
    fn test_none_action_still_consumes_event() {
        let fx = Fixture::new(&[
            BindingRecord::new("mouse_right", "none"),
            BindingRecord::new("mouse_x2", "none"),
        ]);

        assert_eq!(fx.mouse(MouseEventKind::ButtonDown(MouseButton::Right)), Verdict::Suppress);
        assert_eq!(fx.mouse(MouseEventKind::ButtonUp(MouseButton::Right)), Verdict::Suppress);

        assert_eq!(fx.mouse(MouseEventKind::ButtonDown(MouseButton::X2)), Verdict::Suppress);
        assert_eq!(fx.mouse(MouseEventKind::ButtonUp(MouseButton::X2)), Verdict::Suppress);
        assert!(fx.injector.batches().is_empty());
    }

    #[test]
    fn test_sees_reloaded_table() {
        let fx = Fixture::new(&[]);
        assert_eq!(fx.mouse(MouseEventKind::ButtonDown(MouseButton::Middle)), Verdict::Pass);

        let (table, _) =
            BindingTable::from_records(&[BindingRecord::new("mouse_middle", "play_pause")]);
        fx.bindings.replace(table);

        assert_eq!(fx.mouse(MouseEventKind::ButtonDown(MouseButton::Middle)), Verdict::Suppress);
        assert_eq!(fx.injector.taps(), vec![vk::MEDIA_PLAY_PAUSE]);
    }
}
