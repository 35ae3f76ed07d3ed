//! Generates the Swift and Kotlin bindings for the `cardless` library.

fn main() {
    uniffi::uniffi_bindgen_main();
}
