//! Fixtures shared by the connector integration tests.
mod env;
mod runtime;

pub use env::EnvGuard;
pub use runtime::TestRuntime;

use std::net::TcpListener;

/// Finds a free local port in `lower..upper`, trying random candidates first.
pub fn free_port(lower: u16, upper: u16) -> Option<u16> {
    use rand::Rng;

    if lower >= upper {
        return None;
    }
    let mut rng = rand::thread_rng();
    for _ in 0..100 {
        let port = rng.gen_range(lower..upper);
        if is_free(port) {
            return Some(port);
        }
    }
    (lower..upper).find(|port| is_free(*port))
}

fn is_free(port: u16) -> bool {
    TcpListener::bind(("127.0.0.1", port)).is_ok()
}

/// Routes test logs through the test writer. Safe to call from every test.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
