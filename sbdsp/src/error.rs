#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Register offset that the DSP does not decode.
    UnknownPort(u8),
    /// Byte that is not a DSP command at all.
    UnknownOpcode(u8),
    /// Command the real DSP knows but this emulation does not implement.
    UnsupportedOpcode(u8),
}
