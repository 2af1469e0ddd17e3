//! Integration Test: Production Code Rules
//!
//! **Policy**:
//! - The only sleep in production code is the dismiss timer task. Waiting is
//!   done on channels, never by polling.
//! - Library and daemon code propagate errors; `unwrap()` and `expect()`
//!   belong to tests.
//! - Synchronous file access is limited to configuration loading, which runs
//!   before the controller starts.

use architectural_enforcement::{assert_clean, find_violations, production_sources};

#[test]
fn test_no_sleep_outside_dismiss_timer() {
    let files = production_sources();

    let blocking = find_violations(&files, &["thread::sleep"], |_| false);
    assert_clean("Blocking sleep in production code", &blocking);

    let timers = find_violations(&files, &["time::sleep", "sleep_until"], |file| {
        file.is("slider/core/src/controller.rs")
    });
    assert_clean("Sleep outside the controller's dismiss timer", &timers);
}

#[test]
fn test_no_panicking_shortcuts() {
    let files = production_sources();
    let violations = find_violations(&files, &[".unwrap()", ".expect("], |_| false);
    assert_clean("unwrap()/expect() in production code", &violations);
}

#[test]
fn test_file_io_only_in_config() {
    let files = production_sources();
    let violations = find_violations(&files, &["std::fs", "fs::read", "fs::File"], |file| {
        file.is("slider/core/src/config/mod.rs")
    });
    assert_clean("Synchronous file I/O outside configuration loading", &violations);
}

#[test]
fn test_controller_is_the_only_spawner() {
    let files = production_sources();
    let violations = find_violations(&files, &["tokio::spawn", "std::thread::spawn"], |file| {
        file.is("slider/core/src/controller.rs")
    });
    assert_clean("Task spawned outside the controller", &violations);
}
