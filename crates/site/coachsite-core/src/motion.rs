//! Reduced-motion preference, sampled once at load.

use crate::host::Host;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct MotionPreference {
    reduced: bool,
}

impl MotionPreference {
    pub fn read<H: Host + ?Sized>(host: &H) -> Self {
        Self {
            reduced: host.prefers_reduced_motion(),
        }
    }

    pub fn reduced(&self) -> bool {
        self.reduced
    }

    pub fn allows_motion(&self) -> bool {
        !self.reduced
    }
}
