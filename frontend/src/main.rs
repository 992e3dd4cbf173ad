fn main() {
    #[cfg(target_arch = "wasm32")]
    pitchlab_frontend::run();
}
