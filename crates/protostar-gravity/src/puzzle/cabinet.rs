//! Cabinet that unlocks when the telescope light first turns on.

/// Outcome of interacting with the cabinet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CabinetInteraction {
    /// Still closed.
    Locked,
    /// Open: interacting ends the demo.
    EndDemo,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Cabinet {
    open: bool,
    light_was_on: bool,
}

impl Cabinet {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Feed the current telescope light state.
    ///
    /// Opens on the first off-to-on edge and returns `true` only on that call.
    pub fn observe_light(&mut self, light_on: bool) -> bool {
        let rising = light_on && !self.light_was_on;
        self.light_was_on = light_on;
        if rising && !self.open {
            self.open = true;
            tracing::info!("Cabinet opened");
            return true;
        }
        false
    }

    pub fn interact(&self) -> CabinetInteraction {
        if self.open {
            CabinetInteraction::EndDemo
        } else {
            tracing::info!("The cabinet is locked");
            CabinetInteraction::Locked
        }
    }
}
