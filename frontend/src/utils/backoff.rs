/// Retry policy for transient page-fetch failures: a fixed attempt budget
/// with the delay doubling per attempt.
pub const MAX_ATTEMPTS: u32 = 3;
pub const BASE_DELAY_MS: u32 = 400;

pub fn delay_for_attempt(attempt: u32) -> u32 {
    BASE_DELAY_MS << attempt.min(4)
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep_ms(ms: u32) {
    gloo_timers::future::TimeoutFuture::new(ms).await;
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep_ms(ms: u32) {
    tokio::time::sleep(std::time::Duration::from_millis(u64::from(ms))).await;
}
