#![cfg_attr(not(test), no_std)]

//! Drivers for the BCM2837 peripherals the firmware needs: the mini UART
//! console, the free-running system timer, the interrupt controller and the
//! watchdog used for resets.

pub mod common;
pub mod gpio;
pub mod interrupt;
pub mod power;
pub mod timer;
pub mod uart;
