use tracing::Level;

/// Plain fmt output for the binary. Safe to call more than once.
pub fn init(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        // disable printing the name of the module in every log line.
        .with_target(false)
        .without_time()
        .try_init();
}

/// Routes output through the test harness so it is only shown for failing tests.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .without_time()
        .with_test_writer()
        .try_init();
}
