use std::time::Duration;

use scopetrace::{profile, SessionConfig, Stopwatch};

#[profile]
fn a() {
    std::thread::sleep(Duration::from_millis(50));
}

#[profile]
fn b() {
    std::thread::sleep(Duration::from_millis(50));
}

#[profile]
fn f1() {
    std::thread::sleep(Duration::from_millis(200));
    a();
}

#[profile]
fn f2() {
    std::thread::sleep(Duration::from_millis(200));
    b();
}

#[profile]
fn f3() {
    std::thread::sleep(Duration::from_millis(200));
    a();
    b();
}

fn main() -> std::io::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(output) => SessionConfig::new("profiler-test", output),
        None => SessionConfig::timestamped("profiler-test"),
    }
    .with_env();

    let _total = Stopwatch::new();
    scopetrace::begin_session_with(&config)?;

    let workers = vec![
        std::thread::spawn(f1),
        std::thread::spawn(f2),
        std::thread::spawn(f3),
    ];
    for w in workers {
        w.join().expect("demo worker panicked");
    }

    scopetrace::end_session();
    Ok(())
}
