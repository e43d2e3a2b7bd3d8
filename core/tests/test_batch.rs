// Batch suite: worker pool, ordering and per-recording failures.

#[cfg(test)]
mod tests {
    use imu_core::batch::{decode_batch, merged_counters, worker_count, RecordingJob};
    use imu_core::framing::frame_packets;
    use imu_core::packet::{encode_motion_sample, MotionSample};
    use imu_core::stream::DecodeConfig;
    use imu_core::types::ImuError;

    fn recording(first_ts: u64, count: u64) -> Vec<u8> {
        frame_packets((0..count).map(|i| {
            encode_motion_sample(&MotionSample { timestamp_ns: first_ts + i, ..Default::default() })
        }))
        .unwrap()
    }

    #[test]
    fn worker_count_is_bounded() {
        assert_eq!(worker_count(Some(8), 3), 3);
        assert_eq!(worker_count(Some(2), 10), 2);
        assert_eq!(worker_count(Some(0), 10), 1);
        assert_eq!(worker_count(Some(4), 0), 1);
        assert!(worker_count(None, 100) >= 1);
    }

    #[test]
    fn outcomes_keep_input_order() {
        let jobs: Vec<_> = (0..12u64)
            .map(|i| RecordingJob::new(format!("rec{i}"), recording(i * 1_000, 5 + i)))
            .collect();

        let outcomes = decode_batch(jobs, &DecodeConfig::strict(), Some(4)).unwrap();
        assert_eq!(outcomes.len(), 12);

        for (i, outcome) in outcomes.iter().enumerate() {
            let i = i as u64;
            assert_eq!(outcome.name, format!("rec{i}"));
            let rec = outcome.result.as_ref().unwrap();
            assert_eq!(rec.samples.len() as u64, 5 + i);
            assert_eq!(rec.samples[0].timestamp_ns, i * 1_000);
        }
    }

    #[test]
    fn one_bad_recording_does_not_fail_the_batch() {
        let mut broken = recording(0, 3);
        broken.push(0xff);

        let jobs = vec![
            RecordingJob::new("good-a", recording(10, 2)),
            RecordingJob::new("broken", broken),
            RecordingJob::new("good-b", recording(20, 4)),
        ];
        let outcomes = decode_batch(jobs, &DecodeConfig::strict(), Some(2)).unwrap();

        assert!(outcomes[0].result.is_ok());
        assert!(matches!(outcomes[1].result, Err(ImuError::TruncatedFrame(_))));
        assert!(outcomes[2].result.is_ok());

        let totals = merged_counters(&outcomes);
        assert_eq!(totals.samples_decoded, 6);
        assert_eq!(totals.first_timestamp_ns, Some(10));
        assert_eq!(totals.last_timestamp_ns, Some(23));
    }

    #[test]
    fn empty_batch() {
        let outcomes = decode_batch(Vec::new(), &DecodeConfig::lenient(), None).unwrap();
        assert!(outcomes.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = DecodeConfig { max_skipped: Some(1), ..DecodeConfig::strict() };
        let jobs = vec![RecordingJob::new("a", recording(0, 1))];
        assert!(matches!(decode_batch(jobs, &config, None), Err(ImuError::Validation(_))));
    }

    #[test]
    fn lenient_batch_reports_skips() {
        let bad = frame_packets([encode_motion_sample(&MotionSample::default()), Vec::new()]).unwrap();
        let jobs = vec![RecordingJob::new("bad", bad)];

        let outcomes = decode_batch(jobs, &DecodeConfig::lenient(), Some(1)).unwrap();
        let rec = outcomes[0].result.as_ref().unwrap();
        assert_eq!(rec.samples.len(), 1);
        assert_eq!(rec.skipped.len(), 1);
        assert_eq!(merged_counters(&outcomes).packets_skipped, 1);
    }
}
