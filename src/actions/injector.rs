//! Synthetic input injection capability

use thiserror::Error;

/// Direction of a synthetic key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    Press,
    Release,
}

/// One synthetic key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub code: u16,
    pub direction: KeyDirection,
}

impl KeyStroke {
    pub fn press(code: u16) -> Self {
        Self {
            code,
            direction: KeyDirection::Press,
        }
    }

    pub fn release(code: u16) -> Self {
        Self {
            code,
            direction: KeyDirection::Release,
        }
    }
}

/// Errors raised while injecting input
#[derive(Debug, Error)]
pub enum InjectError {
    #[error("input injection blocked: {sent} of {requested} events delivered")]
    Blocked { sent: usize, requested: usize },
}

/// Emits synthetic key events that the OS treats like physical input
pub trait InputInjector: Send + Sync {
    /// Send the strokes as one uninterrupted batch
    fn send(&self, strokes: &[KeyStroke]) -> Result<(), InjectError>;

    /// Press and release a single key
    fn tap(&self, code: u16) -> Result<(), InjectError> {
        self.send(&[KeyStroke::press(code), KeyStroke::release(code)])
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Injector that records every batch it is asked to send
    #[derive(Default)]
    pub struct RecordingInjector {
        batches: Mutex<Vec<Vec<KeyStroke>>>,
        fail: bool,
    }

    impl RecordingInjector {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn batches(&self) -> Vec<Vec<KeyStroke>> {
            self.batches.lock().clone()
        }

        /// Codes of every key tapped, in order
        pub fn taps(&self) -> Vec<u16> {
            self.batches
                .lock()
                .iter()
                .filter_map(|batch| match batch.as_slice() {
                    [press, release]
                        if press.direction == KeyDirection::Press
                            && release.direction == KeyDirection::Release
                            && press.code == release.code =>
                    {
                        Some(press.code)
                    }
                    _ => None,
                })
                .collect()
        }
    }

    impl InputInjector for RecordingInjector {
        fn send(&self, strokes: &[KeyStroke]) -> Result<(), InjectError> {
            self.batches.lock().push(strokes.to_vec());
            if self.fail {
                return Err(InjectError::Blocked {
                    sent: 0,
                    requested: strokes.len(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_tap_sends_press_then_release() {
        let injector = RecordingInjector::default();
        injector.tap(0xAF).unwrap();

        assert_eq!(
            injector.batches(),
            vec![vec![KeyStroke::press(0xAF), KeyStroke::release(0xAF)]]
        );
        assert_eq!(injector.taps(), vec![0xAF]);
    }
}
