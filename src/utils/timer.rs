use std::ops::{Deref, DerefMut};

pub struct TimedResult<T> {
    pub res: T,
    pub elapsed: std::time::Duration,
}

impl<T> Deref for TimedResult<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.res
    }
}

impl<T> DerefMut for TimedResult<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.res
    }
}

pub fn timed_scope<R, F: FnOnce() -> R>(f: F) -> TimedResult<R> {
    let begin = std::time::Instant::now();
    let res = f();

    let elapsed = begin.elapsed();

    TimedResult { res, elapsed }
}

pub fn timed_scope_log<R, F: FnOnce() -> R>(label: &str, f: F) -> TimedResult<R> {
    let time_res = timed_scope(f);
    log::debug!(target: "scoped timer", "{}: {}", label, format_elapsed(time_res.elapsed));
    time_res
}

pub fn format_elapsed(elapsed: std::time::Duration) -> String {
    if elapsed < std::time::Duration::from_millis(1) {
        // Micro s
        let micro = elapsed.as_secs_f32() * 1000. * 1000.;
        format!("{micro:.3}µs")
    } else if elapsed < std::time::Duration::from_secs(1) {
        // Milli s
        let milli = elapsed.as_secs_f32() * 1000.;
        format!("{milli:.3}ms")
    } else {
        let s = elapsed.as_secs_f32();
        format!("{s:.3}s")
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn format_units() {
        assert_eq!(format_elapsed(Duration::from_micros(250)), "250.000µs");
        assert_eq!(format_elapsed(Duration::from_millis(12)), "12.000ms");
        assert_eq!(format_elapsed(Duration::from_millis(2500)), "2.500s");
    }

    #[test]
    fn timed_scope_returns_value() {
        let res = timed_scope(|| 21 * 2);
        assert_eq!(*res, 42);
    }
}
