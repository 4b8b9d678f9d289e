/// Two phase reset: the host writes 1 to the reset port, then 0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetLine {
    #[default]
    Running,
    Asserted,
}

/// What a reset port write asks the device to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetAction {
    Assert,
    Release,
    Ignore,
}

impl ResetLine {
    pub fn write(&mut self, value: u8) -> ResetAction {
        match (value, *self) {
            (1, _) => {
                *self = ResetLine::Asserted;
                ResetAction::Assert
            }
            (0, ResetLine::Asserted) => {
                *self = ResetLine::Running;
                ResetAction::Release
            }
            _ => ResetAction::Ignore,
        }
    }

    pub fn is_asserted(&self) -> bool {
        matches!(self, ResetLine::Asserted)
    }
}
