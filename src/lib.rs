//! Duplex Recorder - record the microphone and the system output together
//!
//! This crate captures one input device and one output device (through a
//! loopback tap) at the same time, mixes both into a single mono track and
//! saves it as WAV or MP3.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Devices, durations, mixing, output formats, config and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, hound, FFmpeg, XDG config)
//! - **CLI**: Interactive menu, subcommands, prompts and Ctrl+C handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
