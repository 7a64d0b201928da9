//! Error Tests.
//!
//! Checks the conversions into `SimError` and the messages users see.

use cachesim_core::common::{ConfigError, ProtocolError, SimError};

#[test]
fn config_error_converts_into_sim_error() {
    let err: SimError = ConfigError::ZeroAssociativity.into();
    assert!(matches!(err, SimError::Config(ConfigError::ZeroAssociativity)));
    assert_eq!(err.as_config(), Some(&ConfigError::ZeroAssociativity));
    assert_eq!(err.as_protocol(), None);
}

#[test]
fn protocol_error_converts_into_sim_error() {
    let err: SimError = ProtocolError::UnmatchedNotification {
        processor: 1,
        block: 0x40,
    }
    .into();
    assert!(err.as_protocol().is_some());
    assert_eq!(err.as_config(), None);
}

#[test]
fn messages_name_the_offending_values() {
    assert_eq!(
        ProtocolError::UnmatchedNotification {
            processor: 3,
            block: 0x1c0
        }
        .to_string(),
        "coherence notification for processor 3, block 0x1c0 matches no pending request"
    );
    assert_eq!(
        ProtocolError::DuplicatePending {
            processor: 0,
            block: 0x40
        }
        .to_string(),
        "processor 0 already has a pending request for block 0x40"
    );
    assert_eq!(
        ConfigError::HistoryExceedsIndex {
            history_bits: 5,
            table_bits: 4
        }
        .to_string(),
        "history register width 5 exceeds predictor index width 4"
    );
    assert_eq!(
        ConfigError::PredictorTableTooLarge(30).to_string(),
        "predictor table of 2^30 entries is larger than the supported 2^28"
    );
}

/// Transparent variants display exactly like the wrapped error.
#[test]
fn sim_error_is_transparent_over_config_and_protocol() {
    let inner = ConfigError::RrpvBitsOutOfRange(9);
    let outer = SimError::from(inner.clone());
    assert_eq!(outer.to_string(), inner.to_string());
    assert_eq!(outer.to_string(), "RRPV bit width 9 is outside 1..=8");
}

#[test]
fn io_error_converts() {
    let io = std::io::Error::other("sink closed");
    let err = SimError::from(io);
    assert!(err.to_string().contains("sink closed"));
}
