//! Property-based tests for myohaptic-atomic using quickcheck.

use myohaptic_atomic::{AtomicF32, ControlInputs, TickCounters};
use quickcheck_macros::quickcheck;

#[quickcheck]
fn prop_tick_counter_counts_every_increment(incs: u8) -> bool {
    let counters = TickCounters::new();
    for _ in 0..incs {
        counters.inc_tick();
    }
    counters.total_ticks() == u64::from(incs)
}

#[quickcheck]
fn prop_inputs_roundtrip_any_pair(period_us: u32, mode: u32) -> bool {
    let inputs = ControlInputs::new(1_000, 0);
    inputs.set_period_us(period_us);
    inputs.set_mode(mode);
    let snapshot = inputs.snapshot();
    snapshot.period_us == period_us && snapshot.mode == mode
}

#[quickcheck]
fn prop_mode_write_leaves_period_alone(period_us: u32, modes: Vec<u32>) -> bool {
    let inputs = ControlInputs::new(period_us, 0);
    for mode in modes {
        inputs.set_mode(mode);
    }
    inputs.period_us() == period_us
}

#[quickcheck]
fn prop_atomic_f32_is_bit_exact(value: f32) -> bool {
    let cell = AtomicF32::new(0.0);
    cell.store(value);
    cell.load().to_bits() == value.to_bits()
}
