//! Mobile entry point for the Cardless ID wallet core.
//!
//! All functionality lives in [`cardless_core`]; this crate only re-exports it and
//! carries the `UniFFI` scaffolding so Swift and Kotlin bindings can be generated
//! from a single library.

cardless_core::uniffi_reexport_scaffolding!();

pub use cardless_core::*;
