use crate::value::{error::RuntimeError, LoxValue, NativeFunction};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch, with sub-second precision.
#[derive(Debug)]
pub struct NativeClock;

impl NativeFunction for NativeClock {
    fn get_name(&self) -> &'static str {
        "clock"
    }

    fn get_arity(&self) -> usize {
        0
    }

    fn call(&self, _arguments: &[LoxValue]) -> Result<LoxValue, RuntimeError> {
        // A clock set before the epoch reads as zero.
        let duration_since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Ok(LoxValue::Number(duration_since_epoch.as_secs_f64()))
    }
}
