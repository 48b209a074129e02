//! Property tests for recorder sequencing
//!
//! The sequence counter must be dense and strictly increasing for any
//! interleaving of sent/received calls, and must not move at all while
//! recording is disabled.

use std::sync::Arc;

use proptest::prelude::*;
use twine_logger::mock::MockRegistry;
use twine_logger::{MemoryFlagStore, MessageLogger, MessageMeta};

fn meta(msg_id: u8) -> MessageMeta {
    MessageMeta {
        service: 7,
        command: 0,
        msg_id,
        ref_msg_id: 0,
        payload: None,
    }
}

proptest! {
    #[test]
    fn disabled_recorder_stays_empty(calls in proptest::collection::vec(any::<bool>(), 0..64)) {
        let registry = Arc::new(MockRegistry::new());
        let mut logger = MessageLogger::new(registry.clone(), Arc::new(MemoryFlagStore::new()));

        for (n, sent) in calls.iter().enumerate() {
            let id = n as u8;
            let handle = registry.track(id, 7);
            if *sent {
                logger.log_sent(meta(id), handle);
            } else {
                logger.log_received(meta(id), handle);
            }
        }
        prop_assert!(logger.messages().is_empty());

        // the counter never moved: the first real record gets seq 0
        logger.start_record();
        logger.log_sent(meta(0), registry.track(0, 7));
        prop_assert_eq!(logger.messages()[0].i, 0);
    }

    #[test]
    fn enabled_recorder_assigns_dense_sequence(calls in proptest::collection::vec(any::<bool>(), 1..64)) {
        let registry = Arc::new(MockRegistry::new());
        let mut logger = MessageLogger::new(registry.clone(), Arc::new(MemoryFlagStore::new()));
        logger.start_record();

        for (n, sent) in calls.iter().enumerate() {
            let id = n as u8;
            let handle = registry.track(id, 7);
            if *sent {
                logger.log_sent(meta(id), handle);
            } else {
                logger.log_received(meta(id), handle);
            }
        }

        prop_assert_eq!(logger.messages().len(), calls.len());
        for (n, (m, sent)) in logger.messages().iter().zip(&calls).enumerate() {
            prop_assert_eq!(m.i, n as u64);
            prop_assert_eq!(m.is_sent, *sent);
        }
    }

    #[test]
    fn toggling_mid_stream_skips_no_sequence_numbers(
        ops in proptest::collection::vec(any::<Option<bool>>(), 1..64)
    ) {
        // Some(sent) logs a message, None flips the toggle
        let registry = Arc::new(MockRegistry::new());
        let mut logger = MessageLogger::new(registry.clone(), Arc::new(MemoryFlagStore::new()));

        let mut expected = 0u64;
        for (n, op) in ops.iter().enumerate() {
            match op {
                Some(sent) => {
                    let id = n as u8;
                    let handle = registry.track(id, 7);
                    if *sent {
                        logger.log_sent(meta(id), handle);
                    } else {
                        logger.log_received(meta(id), handle);
                    }
                    if logger.is_recording() {
                        expected += 1;
                    }
                }
                None => {
                    if logger.is_recording() {
                        logger.stop_record();
                    } else {
                        logger.start_record();
                    }
                }
            }
        }

        prop_assert_eq!(logger.messages().len() as u64, expected);
        for (n, m) in logger.messages().iter().enumerate() {
            prop_assert_eq!(m.i, n as u64);
        }
    }
}
