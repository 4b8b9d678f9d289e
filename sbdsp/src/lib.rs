#![no_std]

pub mod consts;
pub mod diagnostics;
pub mod dsp;
pub mod error;
pub mod fifo;
pub mod handshake;
pub mod io;
pub mod mixer;
pub mod pacing;
pub mod port;
pub mod protocol;
pub mod rate;
pub mod reset;
pub mod settings;
pub mod shared;

pub use dsp::Dsp;
pub use error::Error;
pub use shared::SharedState;
