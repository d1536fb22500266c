use env_logger::Env;

/// Logger del binario: nivel desde RUST_LOG, `info` si no está definida.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();
}

/// Logger para tests; puede llamarse desde cada test sin fallar.
pub fn init_test_logger() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}
