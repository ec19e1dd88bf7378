// sidescape_headless: run a Sidescape world without a renderer.
//
// The library half of the CLI. `host.rs` owns everything a real game engine
// would normally supply: the frame loop, a scripted stand-in for keyboard
// input, and a minimal physics pass (gravity, ground contact against the
// grid-aligned terrain surface, window-edge clamping and fruit overlap).
// `main.rs` only parses arguments, sets up logging and prints the summary.
//
// Dependencies: `sidescape_sim` for the world itself. No rendering, audio or
// windowing.

pub mod host;

pub use host::{HostError, HostOptions, RunSummary, run};
