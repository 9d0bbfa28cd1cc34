//! Windows adapter: low-level hooks, async key state and SendInput.

use std::cell::RefCell;
use std::mem;
use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Weak};

use tracing::{info, warn};
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetAsyncKeyState, SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_KEYUP, VIRTUAL_KEY,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PostThreadMessageW, SetWindowsHookExW,
    TranslateMessage, UnhookWindowsHookEx, HHOOK, KBDLLHOOKSTRUCT, LLKHF_INJECTED, LLMHF_INJECTED,
    MSG, MSLLHOOKSTRUCT, WH_KEYBOARD_LL, WH_MOUSE_LL, WM_KEYDOWN, WM_KEYUP, WM_LBUTTONDOWN,
    WM_LBUTTONUP, WM_MBUTTONDOWN, WM_MBUTTONUP, WM_MOUSEWHEEL, WM_QUIT, WM_RBUTTONDOWN,
    WM_RBUTTONUP, WM_SYSKEYDOWN, WM_SYSKEYUP, WM_XBUTTONDOWN, WM_XBUTTONUP,
};

use crate::actions::{InjectError, InputInjector, KeyDirection, KeyStroke, UnavailableCapture};
use crate::bindings::MouseButton;
use crate::hotkey::{
    HotkeyError, InputSink, KeyEvent, KeyTransition, ModifierStateSource, MouseEvent,
    MouseEventKind, Verdict,
};

use super::{is_self_injected, Capabilities, INJECTION_TAG};

pub type HookThreadId = u32;

const XBUTTON1: u16 = 0x0001;
const XBUTTON2: u16 = 0x0002;

/// Hook handles, kept static for the hook callbacks
static KEYBOARD_HOOK: AtomicIsize = AtomicIsize::new(0);
static MOUSE_HOOK: AtomicIsize = AtomicIsize::new(0);

thread_local! {
    /// Event receiver for the hooks installed on this thread
    static SINK: RefCell<Option<Weak<dyn InputSink>>> = const { RefCell::new(None) };
}

pub fn capabilities() -> Result<Capabilities, HotkeyError> {
    Ok(Capabilities {
        modifiers: Arc::new(AsyncKeyState),
        injector: Arc::new(SendInputInjector),
        capture: Arc::new(UnavailableCapture),
    })
}

/// Physical key state via `GetAsyncKeyState`
pub struct AsyncKeyState;

impl ModifierStateSource for AsyncKeyState {
    fn is_down(&self, code: u16) -> bool {
        // High bit set means the key is down right now
        unsafe { GetAsyncKeyState(code as i32) < 0 }
    }
}

/// Synthetic keyboard input via `SendInput`
pub struct SendInputInjector;

impl InputInjector for SendInputInjector {
    fn send(&self, strokes: &[KeyStroke]) -> Result<(), InjectError> {
        let inputs: Vec<INPUT> = strokes.iter().map(keyboard_input).collect();
        let sent = unsafe { SendInput(&inputs, mem::size_of::<INPUT>() as i32) } as usize;

        if sent == inputs.len() {
            Ok(())
        } else {
            Err(InjectError::Blocked {
                sent,
                requested: inputs.len(),
            })
        }
    }
}

fn keyboard_input(stroke: &KeyStroke) -> INPUT {
    let flags = match stroke.direction {
        KeyDirection::Press => KEYBD_EVENT_FLAGS(0),
        KeyDirection::Release => KEYEVENTF_KEYUP,
    };

    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(stroke.code),
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: INJECTION_TAG,
            },
        },
    }
}

/// Installed hooks; unhooked on drop
struct InstalledHooks {
    keyboard: HHOOK,
    mouse: HHOOK,
}

impl InstalledHooks {
    fn install() -> Result<Self, HotkeyError> {
        let failed = |e: windows::core::Error| HotkeyError::HookInstall(e.to_string());

        unsafe {
            let module = GetModuleHandleW(None).map_err(failed)?;

            let keyboard =
                SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_proc), Some(module.into()), 0)
                    .map_err(failed)?;

            let mouse =
                SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_proc), Some(module.into()), 0);
            let mouse = match mouse {
                Ok(hook) => hook,
                Err(e) => {
                    let _ = UnhookWindowsHookEx(keyboard);
                    return Err(failed(e));
                }
            };

            KEYBOARD_HOOK.store(keyboard.0 as isize, Ordering::SeqCst);
            MOUSE_HOOK.store(mouse.0 as isize, Ordering::SeqCst);
            Ok(Self { keyboard, mouse })
        }
    }
}

impl Drop for InstalledHooks {
    fn drop(&mut self) {
        unsafe {
            if let Err(e) = UnhookWindowsHookEx(self.keyboard) {
                warn!(error = %e, "failed to remove keyboard hook");
            }
            if let Err(e) = UnhookWindowsHookEx(self.mouse) {
                warn!(error = %e, "failed to remove mouse hook");
            }
        }
        KEYBOARD_HOOK.store(0, Ordering::SeqCst);
        MOUSE_HOOK.store(0, Ordering::SeqCst);
    }
}

/// Install both hooks on the calling thread and pump messages until
/// [`stop_hooks`] posts a quit.
///
/// The installation result is reported through `ready` before the loop
/// starts.
pub fn run_hooks(
    sink: Weak<dyn InputSink>,
    ready: Sender<Result<HookThreadId, HotkeyError>>,
) -> Result<(), HotkeyError> {
    SINK.with(|slot| *slot.borrow_mut() = Some(sink));

    let hooks = match InstalledHooks::install() {
        Ok(hooks) => hooks,
        Err(e) => {
            SINK.with(|slot| slot.borrow_mut().take());
            let _ = ready.send(Err(e.clone()));
            return Err(e);
        }
    };

    let thread_id = unsafe { GetCurrentThreadId() };
    let _ = ready.send(Ok(thread_id));
    info!(thread_id, "input hooks installed");

    let mut msg = MSG::default();
    unsafe {
        // 0 is WM_QUIT, -1 is an error
        while GetMessageW(&mut msg, None, 0, 0).0 > 0 {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    drop(hooks);
    SINK.with(|slot| slot.borrow_mut().take());
    info!("input hooks removed");
    Ok(())
}

/// Ask the hook thread to leave its message loop
pub fn stop_hooks(thread_id: HookThreadId) {
    if let Err(e) = unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) } {
        warn!(thread_id, error = %e, "failed to signal hook thread");
    }
}

/// Hand an event to the sink, passing it if the sink is gone
fn dispatch(deliver: impl FnOnce(&dyn InputSink) -> Verdict) -> Verdict {
    let sink = SINK.with(|slot| slot.borrow().as_ref().and_then(Weak::upgrade));
    match sink {
        Some(sink) => deliver(sink.as_ref()),
        None => Verdict::Pass,
    }
}

fn next_hook(slot: &AtomicIsize, code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let hook = HHOOK(slot.load(Ordering::SeqCst) as *mut _);
    unsafe { CallNextHookEx(Some(hook), code, wparam, lparam) }
}

/// Low-level keyboard hook procedure
unsafe extern "system" fn keyboard_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code >= 0 {
        let info = &*(lparam.0 as *const KBDLLHOOKSTRUCT);

        let transition = match wparam.0 as u32 {
            WM_KEYDOWN | WM_SYSKEYDOWN => Some(KeyTransition::Down),
            WM_KEYUP | WM_SYSKEYUP => Some(KeyTransition::Up),
            _ => None,
        };

        if let Some(transition) = transition {
            let event = KeyEvent {
                code: info.vkCode as u16,
                transition,
                self_injected: is_self_injected(
                    info.flags.0 & LLKHF_INJECTED.0 != 0,
                    info.dwExtraInfo,
                ),
            };

            if dispatch(|sink| sink.on_key_event(event)) == Verdict::Suppress {
                return LRESULT(1);
            }
        }
    }

    next_hook(&KEYBOARD_HOOK, code, wparam, lparam)
}

/// Low-level mouse hook procedure
unsafe extern "system" fn mouse_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code >= 0 {
        let info = &*(lparam.0 as *const MSLLHOOKSTRUCT);
        let high = (info.mouseData >> 16) as u16;

        let kind = match wparam.0 as u32 {
            WM_LBUTTONDOWN => MouseEventKind::ButtonDown(MouseButton::Left),
            WM_LBUTTONUP => MouseEventKind::ButtonUp(MouseButton::Left),
            WM_RBUTTONDOWN => MouseEventKind::ButtonDown(MouseButton::Right),
            WM_RBUTTONUP => MouseEventKind::ButtonUp(MouseButton::Right),
            WM_MBUTTONDOWN => MouseEventKind::ButtonDown(MouseButton::Middle),
            WM_MBUTTONUP => MouseEventKind::ButtonUp(MouseButton::Middle),
            WM_XBUTTONDOWN => {
                x_button(high).map_or(MouseEventKind::Other, MouseEventKind::ButtonDown)
            }
            WM_XBUTTONUP => x_button(high).map_or(MouseEventKind::Other, MouseEventKind::ButtonUp),
            WM_MOUSEWHEEL => MouseEventKind::Wheel {
                delta: high as i16 as i32,
            },
            _ => MouseEventKind::Other,
        };

        let event = MouseEvent {
            kind,
            self_injected: is_self_injected(info.flags & LLMHF_INJECTED != 0, info.dwExtraInfo),
        };

        if dispatch(|sink| sink.on_mouse_event(event)) == Verdict::Suppress {
            return LRESULT(1);
        }
    }

    next_hook(&MOUSE_HOOK, code, wparam, lparam)
}

fn x_button(id: u16) -> Option<MouseButton> {
    match id {
        XBUTTON1 => Some(MouseButton::X1),
        XBUTTON2 => Some(MouseButton::X2),
        _ => None,
    }
}
