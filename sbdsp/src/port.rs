use crate::{consts::STATUS_BIT, error::Error};

/// DSP registers, by offset from the card's base port.
///
/// Offset 0xC is the data port when written and the write-status port when
/// read, so it appears once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    Reset = 0x6,
    Read = 0xA,
    Write = 0xC,
    ReadStatus = 0xE,
}

impl Port {
    pub const WRITE_STATUS: Port = Port::Write;

    pub fn offset(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Port {
    type Error = Error;

    fn try_from(offset: u8) -> Result<Self, Self::Error> {
        match offset {
            0x6 => Ok(Port::Reset),
            0xA => Ok(Port::Read),
            0xC => Ok(Port::Write),
            0xE => Ok(Port::ReadStatus),
            other => Err(Error::UnknownPort(other)),
        }
    }
}

#[inline]
pub fn status(flag: bool) -> u8 {
    (flag as u8) << STATUS_BIT
}
