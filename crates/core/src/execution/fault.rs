//! Fault boundary around task actions
//!
//! A panicking action must not unwind through the engine; the panic becomes an
//! ordinary error and goes through the same error policy as a returned error.
//!
//! The process panic hook stays in place for panics elsewhere; it is only skipped while
//! a guarded action runs on the current thread, since the panic is reported as a task
//! error instead.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use std::time::{Duration, Instant};

use tracing::error;

use crate::task::Action;

thread_local! {
    static GUARDED: Cell<bool> = const { Cell::new(false) };
}

static INSTALL_HOOK: Once = Once::new();

/// Wrap the current panic hook so it stays quiet for guarded actions.
fn install_quiet_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !GUARDED.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

/// Restores the guard flag even if the action unwinds.
struct GuardedScope {
    previous: bool,
}

impl GuardedScope {
    fn enter() -> Self {
        GuardedScope {
            previous: GUARDED.with(|guarded| guarded.replace(true)),
        }
    }
}

impl Drop for GuardedScope {
    fn drop(&mut self) {
        GUARDED.with(|guarded| guarded.set(self.previous));
    }
}

/// Run `action`, converting a panic into an error, and time it.
pub fn run_guarded(action: &mut Action) -> (Duration, anyhow::Result<()>) {
    install_quiet_hook();

    let start = Instant::now();
    let result = {
        let _scope = GuardedScope::enter();
        panic::catch_unwind(AssertUnwindSafe(|| (*action)()))
    };
    let elapsed = start.elapsed();

    let result = match result {
        Ok(result) => result,
        Err(payload) => {
            let err = anyhow::anyhow!("Task panicked: {}", panic_message(payload.as_ref()));
            error!("{}", err);
            Err(err)
        }
    };
    (elapsed, result)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
