//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in mural-core:
//!
//! - Winch axes (step/dir pin driver, deterministic simulation)
//! - TMC2209 bring-up (UART datagrams, driver identity verification)

#![no_std]
#![deny(unsafe_code)]

pub mod axis;
pub mod stepper;
