// Framing suite: record boundaries, offsets, truncation and the encoder.

#[cfg(test)]
mod tests {
    use imu_core::constants::{LENGTH_PREFIX_LEN, MAX_PACKET_LEN};
    use imu_core::framing::{encode_packet, frame_packets, FrameError, PacketFramer, PacketRecord};

    fn payloads(lengths: &[usize]) -> Vec<Vec<u8>> {
        lengths
            .iter()
            .enumerate()
            .map(|(i, &len)| vec![i as u8; len])
            .collect()
    }

    fn collect_ok(buf: &[u8]) -> Vec<PacketRecord<'_>> {
        PacketFramer::new(buf).map(|r| r.unwrap()).collect()
    }

// # ✅ 1. N records come back with matching offsets and lengths

    #[test]
    fn yields_each_record_in_order() {
        let lengths = [3usize, 0, 1, 300, 40];
        let parts = payloads(&lengths);
        let buf = frame_packets(&parts).unwrap();

        let records = collect_ok(&buf);
        assert_eq!(records.len(), lengths.len());

        let mut expected_offset = 0;
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.offset, expected_offset);
            assert_eq!(record.length, lengths[i]);
            assert_eq!(record.payload, parts[i].as_slice());
            assert_eq!(record.payload_offset(), expected_offset + LENGTH_PREFIX_LEN);
            expected_offset += LENGTH_PREFIX_LEN + lengths[i];
            assert_eq!(record.end(), expected_offset);
        }
        assert_eq!(expected_offset, buf.len());
    }

// # ✅ 2. Prefix is little-endian

    #[test]
    fn length_prefix_is_little_endian() {
        let mut buf = vec![0x00, 0x01]; // 256
        buf.extend(std::iter::repeat(0xAB).take(256));

        let records = collect_ok(&buf);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].length, 256);

        let buf = [0x03, 0x00, 1, 2, 3];
        let records = collect_ok(&buf);
        assert_eq!(records[0].payload, &[1, 2, 3]);
    }

// # ✅ 3. Empty buffer is a clean, empty scan

    #[test]
    fn empty_buffer_yields_nothing() {
        let mut framer = PacketFramer::new(&[]);
        assert!(framer.next().is_none());
        assert!(!framer.is_failed());
    }

// # ✅ 4. Zero-length record is valid

    #[test]
    fn zero_length_record_has_empty_payload() {
        let buf = [0x00, 0x00];
        let records = collect_ok(&buf);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].length, 0);
        assert!(records[0].payload.is_empty());
    }

// # ❌ 5. Declared length exceeds the buffer

    #[test]
    fn short_payload_is_truncation() {
        let mut buf = vec![100u8, 0];
        buf.extend(vec![0u8; 50]);

        let mut framer = PacketFramer::new(&buf);
        assert_eq!(
            framer.next(),
            Some(Err(FrameError::TruncatedPayload { offset: 0, declared: 100, available: 50 }))
        );
        assert!(framer.next().is_none());
        assert!(framer.is_failed());
    }

// # ❌ 6. One byte short on the final record

    #[test]
    fn final_record_missing_one_byte() {
        let parts = payloads(&[10, 20, 30]);
        let mut buf = frame_packets(&parts).unwrap();
        buf.pop();

        let items: Vec<_> = PacketFramer::new(&buf).collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        assert!(items[1].is_ok());
        assert_eq!(
            items[2],
            Err(FrameError::TruncatedPayload { offset: 2 + 10 + 2 + 20, declared: 30, available: 29 })
        );
    }

// # ❌ 7. Half a length prefix at the end

    #[test]
    fn dangling_prefix_byte_is_truncation() {
        let mut buf = frame_packets(payloads(&[4])).unwrap();
        buf.push(0x07);

        let mut framer = PacketFramer::new(&buf);
        assert!(matches!(framer.next(), Some(Ok(r)) if r.length == 4));
        let err = framer.next().unwrap().unwrap_err();
        assert_eq!(err, FrameError::TruncatedPrefix { offset: 6, available: 1 });
        assert_eq!(err.offset(), Some(6));
        assert!(framer.next().is_none());
    }

// # ✅ 8. Restart means a new framer

    #[test]
    fn two_framers_see_the_same_records() {
        let buf = frame_packets(payloads(&[5, 0, 9])).unwrap();
        assert_eq!(collect_ok(&buf), collect_ok(&buf));
    }

    #[test]
    fn position_and_remaining_track_cursor() {
        let buf = frame_packets(payloads(&[5, 9])).unwrap();
        let mut framer = PacketFramer::new(&buf);
        assert_eq!(framer.position(), 0);
        assert_eq!(framer.remaining(), buf.len());

        framer.next().unwrap().unwrap();
        assert_eq!(framer.position(), 7);
        assert_eq!(framer.remaining(), buf.len() - 7);
    }

// # ✅ 9. Encoder

    #[test]
    fn encode_packet_appends_prefix_and_payload() {
        let mut out = vec![0xEE];
        encode_packet(&[1, 2, 3], &mut out).unwrap();
        assert_eq!(out, [0xEE, 0x03, 0x00, 1, 2, 3]);
    }

    #[test]
    fn encode_packet_accepts_max_len() {
        let mut out = Vec::new();
        encode_packet(&vec![0u8; MAX_PACKET_LEN], &mut out).unwrap();
        assert_eq!(&out[..2], &[0xFF, 0xFF]);
        assert_eq!(collect_ok(&out)[0].length, MAX_PACKET_LEN);
    }

    #[test]
    fn encode_packet_rejects_oversized_payload() {
        let mut out = Vec::new();
        let err = encode_packet(&vec![0u8; MAX_PACKET_LEN + 1], &mut out).unwrap_err();
        assert_eq!(err, FrameError::PayloadTooLarge { len: MAX_PACKET_LEN + 1, max: MAX_PACKET_LEN });
        assert!(out.is_empty());
        assert_eq!(err.offset(), None);
    }
}
