use std::time::{Duration, Instant};

/// Single shared cooldown gate for control gestures. A firing is accepted
/// only when the elapsed time since the last accepted firing strictly
/// exceeds the cooldown; suppressed firings leave the gate untouched, so a
/// held gesture cannot push its own window forward.
#[derive(Debug)]
pub struct DebounceGate {
    cooldown: Duration,
    last_accepted: Option<Instant>,
}

impl DebounceGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_accepted: None,
        }
    }

    /// Returns true and stamps the gate when the firing is accepted. The
    /// gate starts open, so the first firing of a session always passes.
    pub fn try_accept(&mut self, now: Instant) -> bool {
        let open = match self.last_accepted {
            Some(last) => now.duration_since(last) > self.cooldown,
            None => true,
        };
        if open {
            self.last_accepted = Some(now);
        }
        open
    }
}
