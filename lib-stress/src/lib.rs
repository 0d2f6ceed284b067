pub mod clock;
pub mod counter;
pub mod equation;
pub mod gate;
pub mod handshake;
