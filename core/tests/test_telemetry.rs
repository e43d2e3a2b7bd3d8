#[cfg(test)]
mod tests {
    use std::time::Duration;

    use imu_core::framing::frame_packets;
    use imu_core::packet::{encode_motion_sample, MotionSample};
    use imu_core::stream::{DecodeSequence, DecodeState};
    use imu_core::telemetry::{DecodeCounters, DecodeSnapshot, Stage, StageTimes, TelemetryTimer};

    fn recording(timestamps: &[u64]) -> Vec<u8> {
        frame_packets(
            timestamps
                .iter()
                .map(|&ts| encode_motion_sample(&MotionSample { timestamp_ns: ts, ..Default::default() })),
        )
        .unwrap()
    }

    #[test]
    fn stage_times_accumulate() {
        let mut times = StageTimes::default();
        times.add(Stage::Decode, Duration::from_millis(2));
        times.add(Stage::Decode, Duration::from_millis(3));
        times.add(Stage::Frame, Duration::from_micros(500));

        assert_eq!(times.get(Stage::Decode), Duration::from_millis(5));
        assert_eq!(times.get(Stage::Export), Duration::ZERO);
        assert_eq!(times.total(), Duration::from_micros(5_500));
        assert!((times.get_ms(Stage::Decode) - 5.0).abs() < 1e-9);
        assert!((times.get_us(Stage::Frame) - 500.0).abs() < 1e-6);
        assert!(times.has_all(&[Stage::Frame, Stage::Decode]));
        assert!(!times.has_all(&[Stage::Export]));

        let mut other = StageTimes::default();
        other.add(Stage::Export, Duration::from_millis(1));
        times.merge(&other);
        assert_eq!(times.iter().count(), 3);
    }

    #[test]
    fn stage_names() {
        assert_eq!(Stage::Frame.to_string(), "frame");
        assert_eq!(Stage::Decode.to_string(), "decode");
        assert_eq!(Stage::Export.to_string(), "export");
    }

    #[test]
    fn timer_keeps_first_finish() {
        let mut timer = TelemetryTimer::new();
        let v = timer.time(Stage::Decode, || 41 + 1);
        assert_eq!(v, 42);
        assert!(!timer.is_finished());

        timer.finish();
        let frozen = timer.elapsed();
        std::thread::sleep(Duration::from_millis(2));
        timer.finish();
        assert_eq!(timer.elapsed(), frozen);
    }

    #[test]
    fn counters_track_timestamps() {
        let mut c = DecodeCounters::default();
        c.add_frame(65, 2);
        assert!(!c.add_sample(100));
        c.add_frame(65, 2);
        assert!(c.add_sample(50));
        c.add_frame(0, 2);
        c.add_skipped();

        assert_eq!(c.packets_framed, 3);
        assert_eq!(c.samples_decoded, 2);
        assert_eq!(c.packets_skipped, 1);
        assert_eq!(c.bytes_scanned(), 136);
        assert_eq!(c.timestamp_regressions, 1);
        assert_eq!(c.first_timestamp_ns, Some(100));
        assert_eq!(c.last_timestamp_ns, Some(50));
        assert_eq!(c.span_ns(), 0);
    }

    #[test]
    fn counters_merge_widens_bounds() {
        let mut a = DecodeCounters::default();
        a.add_frame(10, 2);
        a.add_sample(500);

        let mut b = DecodeCounters::default();
        b.add_frame(10, 2);
        b.add_sample(100);
        b.add_frame(10, 2);
        b.add_sample(900);

        let mut merged = a.clone();
        merged.merge(&b);
        assert_eq!(merged.samples_decoded, 3);
        assert_eq!(merged.first_timestamp_ns, Some(100));
        assert_eq!(merged.last_timestamp_ns, Some(900));
        assert_eq!(merged.span_ns(), 800);

        let mut summed = a;
        summed += b;
        assert_eq!(summed, merged);

        let mut empty = DecodeCounters::default();
        empty.merge(&DecodeCounters::default());
        assert_eq!(empty.first_timestamp_ns, None);
    }

    #[test]
    fn snapshot_after_full_scan() {
        let buf = recording(&[1_000, 2_000, 4_000]);
        let mut seq = DecodeSequence::strict(&buf);
        assert_eq!(seq.by_ref().filter(Result::is_ok).count(), 3);

        let snap = seq.snapshot();
        assert_eq!(snap.state, DecodeState::Done);
        assert_eq!(snap.packets_framed, 3);
        assert_eq!(snap.samples_decoded, 3);
        assert_eq!(snap.span_ns(), 3_000);
        assert!(!snap.has_all_stages(&[Stage::Export]));
        assert!(snap.total_stage_time() <= snap.elapsed);
        assert!(snap.sanity_check());
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let buf = recording(&[5]);
        let mut seq = DecodeSequence::strict(&buf);
        seq.by_ref().for_each(drop);

        let json = seq.snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["state"], "Done");
        assert_eq!(value["samples_decoded"], 1);
        assert_eq!(value["first_timestamp_ns"], 5);

        let back: DecodeSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.samples_decoded, 1);
    }

    #[test]
    fn empty_snapshot_has_zero_ratio() {
        let snap = DecodeSnapshot::from(&DecodeCounters::default(), &TelemetryTimer::new(), DecodeState::Scanning);
        assert_eq!(snap.skip_ratio, 0.0);
        assert_eq!(snap.span_ns(), 0);
        assert!(snap.sanity_check());
    }
}
