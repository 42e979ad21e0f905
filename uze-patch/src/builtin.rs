//! Built-in kernel waves
//!
//! The ten default waves, in `WAVE_*` index order. Shapes are computed in
//! signed sample space (-128..=127) and shifted into the unsigned in-memory
//! representation the same way the wave file decoder does.

use std::f64::consts::TAU;

use crate::wave::{WaveTable, sample_from_byte};
use crate::{DEFAULT_NUM_WAVES, WAVE_SIZE};

/// Drive levels of the three distorted sines
const FUZZ_DRIVE: [f64; 3] = [2.0, 4.0, 8.0];

/// One-pole smoothing factor of the filtered square
const FILTER_ALPHA: f64 = 0.2;

fn from_signed(f: impl Fn(usize) -> f64) -> WaveTable {
    WaveTable::from_fn(|i| sample_from_byte(f(i).round().clamp(-128.0, 127.0) as i64))
}

fn phase(i: usize) -> f64 {
    TAU * i as f64 / WAVE_SIZE as f64
}

fn sine() -> WaveTable {
    from_signed(|i| 127.0 * phase(i).sin())
}

fn sawtooth() -> WaveTable {
    from_signed(|i| i as f64 - 128.0)
}

fn triangle() -> WaveTable {
    let half = WAVE_SIZE / 2;
    from_signed(|i| {
        if i < half {
            2.0 * i as f64 - 128.0
        } else {
            127.0 - 2.0 * (i - half) as f64
        }
    })
}

fn square(duty_quarters: usize) -> WaveTable {
    let high = WAVE_SIZE * duty_quarters / 4;
    from_signed(|i| if i < high { 127.0 } else { -128.0 })
}

fn fuzzy_sine(drive: f64) -> WaveTable {
    from_signed(|i| 127.0 * (drive * phase(i).sin()).tanh() / drive.tanh())
}

fn filtered_square() -> WaveTable {
    let half = WAVE_SIZE / 2;
    let target = |i: usize| if i < half { 127.0 } else { -128.0 };

    // Run one period to settle the filter, keep the second
    let mut y = 0.0;
    for i in 0..WAVE_SIZE {
        y += FILTER_ALPHA * (target(i) - y);
    }
    let mut out = [0.0; WAVE_SIZE];
    for (i, slot) in out.iter_mut().enumerate() {
        y += FILTER_ALPHA * (target(i) - y);
        *slot = y;
    }
    from_signed(|i| out[i])
}

/// The kernel's default waves, index-compatible with the `WAVE_*` symbols
pub fn builtin_waves() -> [WaveTable; DEFAULT_NUM_WAVES] {
    [
        sine(),
        sawtooth(),
        triangle(),
        square(1),
        square(2),
        square(3),
        fuzzy_sine(FUZZ_DRIVE[0]),
        fuzzy_sine(FUZZ_DRIVE[1]),
        fuzzy_sine(FUZZ_DRIVE[2]),
        filtered_square(),
    ]
}
