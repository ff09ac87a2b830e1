//! Inflate round-trip tests against a reference codec.
//!
//! `flate2` compresses, depng inflates; equality over varied data shapes
//! and compression levels pins the whole DEFLATE path (stored, fixed, and
//! dynamic blocks, short and maximum-distance matches).

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use depng::checksum::{adler32, crc32, Adler32, Crc32};
use depng::inflate::inflate_zlib;

fn compress(data: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data).expect("in-memory write");
    encoder.finish().expect("in-memory finish")
}

#[test]
fn test_round_trip_empty() {
    for level in [0, 6] {
        let compressed = compress(&[], level);
        assert_eq!(inflate_zlib(&compressed, None).unwrap(), Vec::<u8>::new());
    }
}

#[test]
fn test_round_trip_various_sizes() {
    for size in [1usize, 10, 100, 1000, 10_000, 100_000] {
        let data: Vec<u8> = (0..size).map(|i| (i * 17 % 256) as u8).collect();
        for level in [0, 1, 6, 9] {
            let compressed = compress(&data, level);
            let inflated = inflate_zlib(&compressed, Some(size)).unwrap();
            assert_eq!(inflated, data, "size {size} level {level}");
        }
    }
}

#[test]
fn test_round_trip_repetitive_data() {
    // Long runs become distance-1 style matches at the maximum length.
    for size in [100usize, 1000, 40_000] {
        let data = vec![42u8; size];
        let compressed = compress(&data, 9);
        assert_eq!(inflate_zlib(&compressed, None).unwrap(), data);
    }
}

#[test]
fn test_round_trip_random_data() {
    // Incompressible input forces stored or near-literal blocks.
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let data: Vec<u8> = (0..50_000).map(|_| rng.gen()).collect();
    for level in [0, 1, 9] {
        let compressed = compress(&data, level);
        assert_eq!(inflate_zlib(&compressed, None).unwrap(), data);
    }
}

#[test]
fn test_round_trip_max_distance_matches() {
    // A repeating pattern slightly longer than the 32 KiB window keeps
    // matches near the maximum distance of 32768.
    let pattern: Vec<u8> = (0..251u32).map(|i| i as u8).collect();
    let data: Vec<u8> = pattern
        .iter()
        .cycle()
        .take(32_768 * 2 + 100)
        .copied()
        .collect();
    let compressed = compress(&data, 9);
    assert_eq!(inflate_zlib(&compressed, None).unwrap(), data);
}

#[test]
fn test_round_trip_stored_blocks_over_64k() {
    // Level 0 splits data larger than 65535 into multiple stored blocks.
    let mut rng = StdRng::seed_from_u64(7);
    let data: Vec<u8> = (0..70_000).map(|_| rng.gen()).collect();
    let compressed = compress(&data, 0);
    assert_eq!(inflate_zlib(&compressed, None).unwrap(), data);
}

#[test]
fn test_round_trip_text_like_data() {
    let sentence = b"The quick brown fox jumps over the lazy dog. ";
    let data: Vec<u8> = sentence
        .iter()
        .cycle()
        .take(sentence.len() * 200)
        .copied()
        .collect();
    let compressed = compress(&data, 6);
    let inflated = inflate_zlib(&compressed, Some(data.len())).unwrap();
    assert_eq!(inflated, data);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_inflate_inverts_flate2(
        data in proptest::collection::vec(any::<u8>(), 0..4096),
        level in 0u32..=9,
    ) {
        let compressed = compress(&data, level);
        let inflated = inflate_zlib(&compressed, None).unwrap();
        prop_assert_eq!(inflated, data);
    }

    #[test]
    fn prop_crc32_incremental_matches_one_shot(
        data in proptest::collection::vec(any::<u8>(), 0..2048),
        split in 0usize..2048,
    ) {
        let split = split.min(data.len());
        let mut crc = Crc32::new();
        crc.update(&data[..split]);
        crc.update(&data[split..]);
        prop_assert_eq!(crc.finalize(), crc32(&data));
    }

    #[test]
    fn prop_adler32_incremental_matches_one_shot(
        data in proptest::collection::vec(any::<u8>(), 0..2048),
        split in 0usize..2048,
    ) {
        let split = split.min(data.len());
        let mut adler = Adler32::new();
        adler.update(&data[..split]);
        adler.update(&data[split..]);
        prop_assert_eq!(adler.finalize(), adler32(&data));
    }

    #[test]
    fn prop_adler_trailer_matches_running_checksum(
        data in proptest::collection::vec(any::<u8>(), 0..2048),
    ) {
        // The last four bytes of a zlib stream are the big-endian Adler-32
        // of the original data.
        let compressed = compress(&data, 6);
        let trailer = u32::from_be_bytes(
            compressed[compressed.len() - 4..].try_into().unwrap(),
        );
        prop_assert_eq!(trailer, adler32(&data));
    }
}
