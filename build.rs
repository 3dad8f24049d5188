fn main() {
    // Propagate the ESP-IDF toolchain environment only for on-target builds.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
