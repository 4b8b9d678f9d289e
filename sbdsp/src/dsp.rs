//! Poll side of the DSP: host port access, the command protocol step and the
//! per frame mixer. The interrupt side lives in [`SharedState`].

#[cfg(feature = "defmt")]
use defmt::{debug, trace, warn};
#[cfg(not(feature = "defmt"))]
use log::{debug, trace, warn};

use crate::{
    consts::{DEFAULT_BLOCK_SIZE, RESET_ACK, UNMAPPED_READ},
    error::Error,
    io::{Pic, SecondarySource},
    mixer::{AudioFrame, Mixer},
    port::{status, Port},
    protocol::{Command, CommandState, Feed, Opcode},
    rate::RateParams,
    reset::{ResetAction, ResetLine},
    settings::DspSettings,
    shared::SharedState,
};

pub struct Dsp<'a> {
    shared: &'a SharedState,
    settings: DspSettings,
    state: CommandState,
    reset: ResetLine,
    rate: RateParams,
    block_size: u16,
    test_register: u8,
    speaker: bool,
    mixer: Mixer,
}

impl<'a> Dsp<'a> {
    pub fn new(shared: &'a SharedState, settings: DspSettings) -> Self {
        Self {
            shared,
            settings,
            state: CommandState::Idle,
            reset: ResetLine::Running,
            rate: RateParams::UNSET,
            block_size: DEFAULT_BLOCK_SIZE,
            test_register: 0,
            speaker: false,
            mixer: Mixer::new(&settings),
        }
    }

    pub fn write(&mut self, port: Port, value: u8, pic: &mut impl Pic) {
        match port {
            Port::Write => {
                if self.shared.handshake().host_write(value) {
                    self.shared.counters().overwrite();
                    warn!("dsp inbox overwritten before it was read");
                }
            }
            Port::Reset => self.write_reset(value, pic),
            Port::Read | Port::ReadStatus => trace!("write {:#x} to read only port", value),
        }
    }

    pub fn read(&mut self, port: Port, pic: &mut impl Pic) -> u8 {
        let handshake = self.shared.handshake();
        match port {
            Port::Read => handshake.host_read(),
            Port::ReadStatus => {
                pic.deassert_irq();
                status(handshake.dav_pc())
            }
            Port::Write => status(handshake.dav_dsp() || handshake.busy()),
            Port::Reset => UNMAPPED_READ,
        }
    }

    /// Port write by raw offset from the card's base address.
    pub fn write_offset(
        &mut self,
        offset: u8,
        value: u8,
        pic: &mut impl Pic,
    ) -> Result<(), Error> {
        let port = Port::try_from(offset)?;
        self.write(port, value, pic);
        Ok(())
    }

    /// Port read by raw offset. Offsets the DSP does not decode read as 0xFF.
    pub fn read_offset(&mut self, offset: u8, pic: &mut impl Pic) -> u8 {
        match Port::try_from(offset) {
            Ok(port) => self.read(port, pic),
            Err(_) => {
                trace!("read from unmapped offset {:#x}", offset);
                UNMAPPED_READ
            }
        }
    }

    fn write_reset(&mut self, value: u8, pic: &mut impl Pic) {
        let shared = self.shared;
        let pacer = shared.pacer();
        match self.reset.write(value) {
            ResetAction::Assert => {
                pacer.set_autoinit(false);
                pacer.disable(pic);
                debug!("dsp reset asserted");
            }
            ResetAction::Release => {
                self.state = CommandState::Idle;
                self.block_size = DEFAULT_BLOCK_SIZE;
                pacer.set_sample_count(0);
                pacer.reset_sample_count_rx();
                shared.handshake().output(RESET_ACK);
                debug!("dsp reset released");
            }
            ResetAction::Ignore => {}
        }
    }

    /// Runs one step of the command protocol. Consumes at most one byte from
    /// the host.
    pub fn process(&mut self, pic: &mut impl Pic) {
        if self.reset.is_asserted() {
            return;
        }

        let shared = self.shared;
        let handshake = shared.handshake();
        handshake.set_busy(true);

        match self.state {
            CommandState::Emitting { byte, .. } => {
                if !handshake.dav_pc() {
                    self.state = CommandState::Idle;
                    handshake.output(byte);
                }
            }
            _ => {
                if let Some(byte) = handshake.take_input() {
                    match self.state.feed(byte) {
                        Feed::Pending => {}
                        Feed::Complete(command) => self.execute(command, pic),
                        Feed::Rejected(error) => self.reject(error),
                    }
                }
            }
        }

        handshake.set_busy(false);
    }

    fn reject(&mut self, error: Error) {
        match error {
            Error::UnsupportedOpcode(opcode) => {
                self.shared.counters().unsupported_command();
                debug!("unsupported command {:#x}", opcode);
            }
            _ => {
                self.shared.counters().unknown_command();
                debug!("unknown command {:?}", error);
            }
        }
    }

    fn execute(&mut self, command: Command, pic: &mut impl Pic) {
        debug!("dsp command {:?}", command);

        let shared = self.shared;
        let pacer = shared.pacer();
        let handshake = shared.handshake();

        match command {
            Command::DmaPause => pacer.disable(pic),
            Command::DmaResume => {
                pacer.enable(shared.fifo(), pic);
            }
            Command::DmaAuto | Command::DmaHighSpeedAuto => {
                pacer.set_autoinit(true);
                pacer.set_sample_count(self.block_size as u32);
                pacer.enable(shared.fifo(), pic);
            }
            Command::DmaHighSpeedSingle => {
                pacer.set_autoinit(false);
                pacer.set_sample_count(self.block_size as u32);
                pacer.enable(shared.fifo(), pic);
            }
            Command::DmaSingle(length) => {
                pacer.set_sample_count(length as u32);
                pacer.reset_sample_count_rx();
                pacer.set_autoinit(false);
                pacer.enable(shared.fifo(), pic);
            }
            Command::SetTimeConstant(time_constant) => {
                self.rate =
                    RateParams::from_time_constant(time_constant, self.settings.output_rate);
                pacer.set_interval(self.rate.dma_interval);
            }
            Command::SetBlockSize(size) => self.block_size = size,
            Command::Speaker(on) => self.speaker = on,
            Command::Identify(value) => handshake.output(!value),
            Command::Version => {
                let version = self.settings.version;
                handshake.output(version.major);
                self.state = CommandState::Emitting {
                    opcode: Opcode::Version,
                    byte: version.minor,
                };
            }
            Command::WriteTest(value) => self.test_register = value,
            Command::ReadTest => handshake.output(self.test_register),
            Command::TriggerIrq => pic.assert_irq(),
        }
    }

    /// Produces the next output frame. See [`Mixer::mix`].
    pub fn mix(&mut self, frame: &mut AudioFrame, secondary: &mut impl SecondarySource) {
        self.mixer.mix(self.shared, &self.rate, frame, secondary);
    }

    pub fn shared(&self) -> &'a SharedState {
        self.shared
    }

    pub fn settings(&self) -> &DspSettings {
        &self.settings
    }

    pub fn command_state(&self) -> CommandState {
        self.state
    }

    pub fn current_command(&self) -> Option<Opcode> {
        self.state.current_command()
    }

    pub fn current_command_index(&self) -> usize {
        self.state.current_command_index()
    }

    pub fn rate(&self) -> &RateParams {
        &self.rate
    }

    pub fn block_size(&self) -> u16 {
        self.block_size
    }

    pub fn test_register(&self) -> u8 {
        self.test_register
    }

    /// Speaker commands are accepted but do not gate the output.
    pub fn speaker(&self) -> bool {
        self.speaker
    }

    pub fn reset_line(&self) -> ResetLine {
        self.reset
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }
}
