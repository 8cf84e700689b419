//! Snapshot tests for error message formatting.
//!
//! Operators read these strings in logs and CLI output, so they are pinned.

use myohaptic_errors::{ErrorSeverity, HapticError, TickFault, ValidationError};
use insta::assert_snapshot;

#[test]
fn test_tick_fault_messages() {
    assert_snapshot!(TickFault::Uncalibrated.to_string(), @"Activation ratio not calibrated");
    assert_snapshot!(TickFault::InvalidTiming.to_string(), @"Invalid tick period");
    assert_snapshot!(TickFault::UnknownMode.to_string(), @"Unknown mode selector value");
    assert_snapshot!(TickFault::NonFiniteTorque.to_string(), @"Non-finite torque command");
    assert_snapshot!(TickFault::NonFiniteSample.to_string(), @"Non-finite sensor sample");
}

#[test]
fn test_validation_messages() {
    assert_snapshot!(
        ValidationError::out_of_range("period_us", 0u32, 1u32, 100_000u32).to_string(),
        @"period_us value 0 is out of range [1, 100000]"
    );
    assert_snapshot!(
        ValidationError::read_only("Envelope").to_string(),
        @"Signal 'Envelope' is read-only"
    );
    assert_snapshot!(
        ValidationError::not_an_integer("Activate", 1.5).to_string(),
        @"Activate expects a non-negative integer, got 1.5"
    );
}

#[test]
fn test_wrapped_messages() {
    let err: HapticError = TickFault::UnknownMode.into();
    assert_snapshot!(err.to_string(), @"Tick fault: Unknown mode selector value");

    let err: HapticError = ValidationError::unknown_signal("torque").into();
    assert_snapshot!(err.to_string(), @"Validation error: Unknown signal 'torque'");
}

#[test]
fn test_severity_labels() {
    assert_snapshot!(ErrorSeverity::Warning.to_string(), @"WARN");
    assert_snapshot!(ErrorSeverity::Critical.to_string(), @"CRITICAL");
}
