use crossbeam_channel::Receiver;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use search::Tick;
use std::{
    thread::{self, JoinHandle},
    time::Duration,
};

/// A bar over `total` nodes drawn on stderr.
pub fn progress_bar(total: u128) -> color_eyre::Result<ProgressBar> {
    let progress = ProgressBar::with_draw_target(
        Some(u64::try_from(total).unwrap_or(u64::MAX)),
        ProgressDrawTarget::stderr(),
    );
    progress.set_style(ProgressStyle::with_template(concat!(
        "{elapsed_precise} {wide_bar} {human_pos}/{human_len} nodes ",
        "({percent}%) {per_sec} ETA {eta}",
    ))?);
    Ok(progress)
}

/// Drain `rx` into `progress` on a new thread, redrawing at least once per
/// `interval`. The thread ends once every sender is dropped and returns how
/// many ticks it received.
pub fn spawn_reporter(
    rx: Receiver<Tick>,
    progress: ProgressBar,
    interval: Duration,
) -> JoinHandle<u64> {
    if !interval.is_zero() {
        progress.enable_steady_tick(interval);
    }
    thread::spawn(move || {
        let mut visited = 0u64;
        for Tick in rx.iter() {
            visited += 1;
            progress.inc(1);
        }
        progress.finish_and_clear();
        visited
    })
}
