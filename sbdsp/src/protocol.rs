//! DSP command protocol.
//!
//! The host sends an opcode followed by its parameter bytes through the
//! data port, one byte per handshake. [`CommandState`] collects them; once
//! an opcode has all its parameters it becomes a [`Command`] which the
//! device executes.

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    DmaSingle = 0x14,
    DmaAuto = 0x1C,
    SetTimeConstant = 0x40,
    SetBlockSize = 0x48,
    DmaHighSpeedAuto = 0x90,
    DmaHighSpeedSingle = 0x91,
    DmaPause = 0xD0,
    EnableSpeaker = 0xD1,
    DisableSpeaker = 0xD3,
    DmaResume = 0xD4,
    Identify = 0xE0,
    Version = 0xE1,
    WriteTest = 0xE4,
    ReadTest = 0xE8,
    TriggerIrq = 0xF2,
}

/// Opcodes of the real DSP that are accepted and ignored: direct ADC, MIDI
/// polling, ADPCM, pause duration, sine and checksum.
pub const UNSUPPORTED_OPCODES: [u8; 7] = [0x20, 0x30, 0x38, 0x7F, 0x80, 0xF0, 0xF4];

impl Opcode {
    /// Parameter bytes the host sends after the opcode.
    pub const fn parameter_count(self) -> usize {
        match self {
            Opcode::SetTimeConstant | Opcode::Identify | Opcode::WriteTest => 1,
            Opcode::SetBlockSize | Opcode::DmaSingle => 2,
            Opcode::DmaAuto
            | Opcode::DmaHighSpeedAuto
            | Opcode::DmaHighSpeedSingle
            | Opcode::DmaPause
            | Opcode::EnableSpeaker
            | Opcode::DisableSpeaker
            | Opcode::DmaResume
            | Opcode::Version
            | Opcode::ReadTest
            | Opcode::TriggerIrq => 0,
        }
    }

    /// Builds the command from its collected parameters. Multi byte values
    /// arrive low byte first.
    pub fn assemble(self, params: [u8; 2]) -> Command {
        let word = u16::from_le_bytes(params);
        match self {
            Opcode::DmaSingle => Command::DmaSingle(word),
            Opcode::DmaAuto => Command::DmaAuto,
            Opcode::SetTimeConstant => Command::SetTimeConstant(params[0]),
            Opcode::SetBlockSize => Command::SetBlockSize(word),
            Opcode::DmaHighSpeedAuto => Command::DmaHighSpeedAuto,
            Opcode::DmaHighSpeedSingle => Command::DmaHighSpeedSingle,
            Opcode::DmaPause => Command::DmaPause,
            Opcode::EnableSpeaker => Command::Speaker(true),
            Opcode::DisableSpeaker => Command::Speaker(false),
            Opcode::DmaResume => Command::DmaResume,
            Opcode::Identify => Command::Identify(params[0]),
            Opcode::Version => Command::Version,
            Opcode::WriteTest => Command::WriteTest(params[0]),
            Opcode::ReadTest => Command::ReadTest,
            Opcode::TriggerIrq => Command::TriggerIrq,
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let opcode = match value {
            0x14 => Opcode::DmaSingle,
            0x1C => Opcode::DmaAuto,
            0x40 => Opcode::SetTimeConstant,
            0x48 => Opcode::SetBlockSize,
            0x90 => Opcode::DmaHighSpeedAuto,
            0x91 => Opcode::DmaHighSpeedSingle,
            0xD0 => Opcode::DmaPause,
            0xD1 => Opcode::EnableSpeaker,
            0xD3 => Opcode::DisableSpeaker,
            0xD4 => Opcode::DmaResume,
            0xE0 => Opcode::Identify,
            0xE1 => Opcode::Version,
            0xE4 => Opcode::WriteTest,
            0xE8 => Opcode::ReadTest,
            0xF2 => Opcode::TriggerIrq,
            other if UNSUPPORTED_OPCODES.contains(&other) => {
                return Err(Error::UnsupportedOpcode(other))
            }
            other => return Err(Error::UnknownOpcode(other)),
        };
        Ok(opcode)
    }
}

/// A complete command, parameters included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// 8-bit single cycle DMA of `length` bytes (plus one).
    DmaSingle(u16),
    DmaAuto,
    SetTimeConstant(u8),
    SetBlockSize(u16),
    DmaHighSpeedAuto,
    DmaHighSpeedSingle,
    DmaPause,
    DmaResume,
    Speaker(bool),
    Identify(u8),
    Version,
    WriteTest(u8),
    ReadTest,
    TriggerIrq,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandState {
    #[default]
    Idle,
    /// Waiting for parameter `index` of `opcode`.
    Collecting {
        opcode: Opcode,
        index: usize,
        params: [u8; 2],
    },
    /// Holding a reply byte until the host has read the previous one.
    Emitting { opcode: Opcode, byte: u8 },
}

/// What one byte did to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Feed {
    /// More parameter bytes are needed.
    Pending,
    Complete(Command),
    /// Not a command we execute; the byte was dropped.
    Rejected(Error),
}

impl CommandState {
    /// Takes a freshly written data byte. Only valid while not emitting.
    pub fn feed(&mut self, byte: u8) -> Feed {
        match *self {
            CommandState::Idle => match Opcode::try_from(byte) {
                Ok(opcode) if opcode.parameter_count() == 0 => {
                    Feed::Complete(opcode.assemble([0; 2]))
                }
                Ok(opcode) => {
                    *self = CommandState::Collecting {
                        opcode,
                        index: 0,
                        params: [0; 2],
                    };
                    Feed::Pending
                }
                Err(error) => Feed::Rejected(error),
            },
            CommandState::Collecting {
                opcode,
                index,
                mut params,
            } => {
                params[index] = byte;
                let index = index + 1;

                if index == opcode.parameter_count() {
                    *self = CommandState::Idle;
                    Feed::Complete(opcode.assemble(params))
                } else {
                    *self = CommandState::Collecting {
                        opcode,
                        index,
                        params,
                    };
                    Feed::Pending
                }
            }
            CommandState::Emitting { .. } => Feed::Pending,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, CommandState::Idle)
    }

    /// Opcode currently being assembled.
    pub fn current_command(&self) -> Option<Opcode> {
        match self {
            CommandState::Collecting { opcode, .. } => Some(*opcode),
            CommandState::Emitting { opcode, .. } => Some(*opcode),
            CommandState::Idle => None,
        }
    }

    /// Parameter bytes consumed for the current command.
    pub fn current_command_index(&self) -> usize {
        match self {
            CommandState::Collecting { index, .. } => *index,
            CommandState::Emitting { opcode, .. } => opcode.parameter_count(),
            CommandState::Idle => 0,
        }
    }
}
