//! Wall-clock timing of the step phases.

/// Milliseconds since an arbitrary origin.
#[cfg(target_arch = "wasm32")]
#[inline]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    ORIGIN.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Clock for one step. A disabled clock runs phases untimed and reports zero.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StepClock {
    started_ms: Option<f64>,
}

impl StepClock {
    pub(crate) fn new(enabled: bool) -> Self {
        Self { started_ms: enabled.then(now_ms) }
    }

    pub(crate) fn is_on(&self) -> bool {
        self.started_ms.is_some()
    }

    /// Run one phase and return how long it took.
    pub(crate) fn phase(&self, run: impl FnOnce()) -> f64 {
        if !self.is_on() {
            run();
            return 0.0;
        }
        let t0 = now_ms();
        run();
        now_ms() - t0
    }

    /// Time since the clock was made, `None` when disabled.
    pub(crate) fn total_ms(&self) -> Option<f64> {
        self.started_ms.map(|t0| now_ms() - t0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_clock_still_runs_phases() {
        let clock = StepClock::new(false);
        let mut ran = false;
        assert_eq!(clock.phase(|| ran = true), 0.0);
        assert!(ran);
        assert_eq!(clock.total_ms(), None);
    }

    #[test]
    fn enabled_clock_measures() {
        let clock = StepClock::new(true);
        let ms = clock.phase(|| std::thread::sleep(std::time::Duration::from_millis(2)));
        assert!(ms >= 1.0);
        assert!(clock.total_ms().unwrap() >= ms);
    }
}
