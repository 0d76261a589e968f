use std::sync::{LazyLock, Mutex, MutexGuard};

static ENV_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Sets environment variables for the lifetime of the guard.
///
/// Holds a process-wide lock so concurrent tests never observe each other's
/// variables. Previous values are restored on drop.
pub struct EnvGuard {
    _lock: MutexGuard<'static, ()>,
    previous: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn new(vars: Vec<(&str, &str)>) -> Self {
        let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let previous = vars
            .iter()
            .map(|(k, v)| {
                let old = std::env::var(k).ok();
                std::env::set_var(k, v);
                (k.to_string(), old)
            })
            .collect();
        Self {
            _lock: lock,
            previous,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old) in &self.previous {
            match old {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restores_previous_value() {
        std::env::remove_var("DSC_TESTING_ENV_GUARD");
        {
            let _guard = EnvGuard::new(vec![("DSC_TESTING_ENV_GUARD", "on")]);
            assert_eq!(std::env::var("DSC_TESTING_ENV_GUARD").unwrap(), "on");
        }
        assert!(std::env::var("DSC_TESTING_ENV_GUARD").is_err());
    }
}
