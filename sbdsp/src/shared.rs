use crate::{
    consts::DSP_FIFO_SIZE,
    diagnostics::{Diagnostics, DiagnosticsSnapshot},
    fifo::SampleFifo,
    handshake::Handshake,
    io::{IsaDma, Pic},
    pacing::{Completion, DmaPacer},
};

/// State touched by both the interrupt context and the poll context.
/// Everything in here is atomic, so it can live in a `static`:
///
/// ```
/// use sbdsp::SharedState;
/// static DSP_SHARED: SharedState = SharedState::new();
/// assert_eq!(DSP_SHARED.fifo().level(), 0);
/// ```
pub struct SharedState {
    fifo: SampleFifo<DSP_FIFO_SIZE>,
    pacer: DmaPacer,
    handshake: Handshake,
    diagnostics: Diagnostics,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            fifo: SampleFifo::new(),
            pacer: DmaPacer::new(),
            handshake: Handshake::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Interrupt context: the scheduled pacing event fired.
    pub fn pacing_event(&self, dma: &mut impl IsaDma) -> bool {
        self.pacer.on_pacing_event(&self.fifo, dma)
    }

    /// Interrupt context: the DMA engine finished a transfer.
    pub fn dma_complete(&self, dma: &mut impl IsaDma, pic: &mut impl Pic) -> Completion {
        self.pacer
            .on_transfer_complete(&self.fifo, dma, pic, &self.diagnostics)
    }

    pub fn fifo(&self) -> &SampleFifo<DSP_FIFO_SIZE> {
        &self.fifo
    }

    pub fn pacer(&self) -> &DmaPacer {
        &self.pacer
    }

    pub fn handshake(&self) -> &Handshake {
        &self.handshake
    }

    pub(crate) fn counters(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
