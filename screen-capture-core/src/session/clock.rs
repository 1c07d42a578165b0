use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Called with the new elapsed seconds on every tick.
pub type TickCallback = Arc<dyn Fn(u64) + Send + Sync + 'static>;

/// Wall-clock seconds counter for the active recording.
///
/// Independent of encoder timing. With an interval it ticks on its own
/// thread; without one the host calls [`SessionClock::tick`].
pub struct SessionClock {
    interval: Option<Duration>,
    elapsed: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
    on_tick: Option<TickCallback>,
}

impl SessionClock {
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            interval,
            elapsed: Arc::new(AtomicU64::new(0)),
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
            on_tick: None,
        }
    }

    pub fn set_on_tick(&mut self, callback: TickCallback) {
        self.on_tick = Some(callback);
    }

    pub fn start(&mut self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        let Some(interval) = self.interval else {
            return;
        };

        let running = Arc::clone(&self.running);
        let elapsed = Arc::clone(&self.elapsed);
        let on_tick = self.on_tick.clone();

        let spawned = thread::Builder::new()
            .name("session-clock".into())
            .spawn(move || {
                let mut next = Instant::now() + interval;
                while running.load(Ordering::SeqCst) {
                    let now = Instant::now();
                    if now < next {
                        thread::park_timeout(next - now);
                        continue;
                    }
                    let secs = elapsed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(ref cb) = on_tick {
                        cb(secs);
                    }
                    next += interval;
                }
            });

        match spawned {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => log::error!("Failed to spawn clock thread: {}", e),
        }
    }

    /// Stop ticking. Elapsed time is kept until `reset`.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }

    pub fn reset(&mut self) {
        self.elapsed.store(0, Ordering::SeqCst);
    }

    /// Advance one second by hand. Ignored while stopped.
    pub fn tick(&self) -> u64 {
        if !self.is_running() {
            return self.elapsed();
        }
        let secs = self.elapsed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(ref cb) = self.on_tick {
            cb(secs);
        }
        secs
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        self.stop();
    }
}

/// `MM:SS`, zero padded, minutes unbounded.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
