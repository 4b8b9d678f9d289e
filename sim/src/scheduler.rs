use fugit::MicrosDurationU32;
use log::trace;
use sbdsp::io::{Pic, PicEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    Pic(PicEvent),
    /// The virtual DMA engine finished its byte.
    DmaDone,
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    at_us: u64,
    order: u64,
    event: SimEvent,
}

/// Virtual time interrupt controller. Time only moves when `advance` is
/// called, one microsecond per tick.
#[derive(Debug, Default)]
pub struct VirtualPic {
    now_us: u64,
    next_order: u64,
    pending: Vec<Scheduled>,
    irq_line: bool,
    irq_count: u32,
}

impl VirtualPic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_us(&self) -> u64 {
        self.now_us
    }

    pub fn advance(&mut self, us: u64) {
        self.now_us = self.now_us.saturating_add(us);
    }

    pub fn schedule_in(&mut self, delay_us: u64, event: SimEvent) {
        let entry = Scheduled {
            at_us: self.now_us.saturating_add(delay_us),
            order: self.next_order,
            event,
        };
        self.next_order = self.next_order.saturating_add(1);
        self.pending.push(entry);
    }

    /// Removes and returns every event that is due, oldest first.
    pub fn drain_due_events(&mut self) -> Vec<SimEvent> {
        let now = self.now_us;
        let (mut due, remain): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|entry| entry.at_us <= now);
        self.pending = remain;
        due.sort_by_key(|entry| (entry.at_us, entry.order));
        due.into_iter().map(|entry| entry.event).collect()
    }

    pub fn irq_line(&self) -> bool {
        self.irq_line
    }

    pub fn irq_count(&self) -> u32 {
        self.irq_count
    }
}

impl Pic for VirtualPic {
    fn schedule(&mut self, event: PicEvent, delay: MicrosDurationU32) {
        trace!("{:?} in {}us", event, delay.ticks());
        self.schedule_in(delay.ticks() as u64, SimEvent::Pic(event));
    }

    fn cancel(&mut self, event: PicEvent) {
        self.pending
            .retain(|entry| entry.event != SimEvent::Pic(event));
    }

    fn assert_irq(&mut self) {
        self.irq_line = true;
        self.irq_count += 1;
    }

    fn deassert_irq(&mut self) {
        self.irq_line = false;
    }
}
