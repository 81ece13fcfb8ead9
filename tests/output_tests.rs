use pretty_assertions::assert_eq;
use readprof::output::{
    decode_profile, encode_compressed, read_profile, read_summary, write_profile, write_summary,
};
use readprof::profile::{summarize, Profile};
use readprof::sampler::{MappingSource, Profiler};
use readprof::utils::error::OutputError;

fn captured_profile() -> Profile {
    let profiler = Profiler::with_mappings(MappingSource::Fixed(Vec::new()));
    profiler.start().unwrap();
    for size in [10, 12, 700, 700, 65_536] {
        profiler.record(size, &[0x4000, 0x5000, 0x6000]);
    }
    profiler.record(3, &[0x7000]);
    profiler.stop().unwrap()
}

#[test]
fn test_profile_file_decodes_to_equal_profile() {
    let profile = captured_profile();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out/reads.pb.gz");

    write_profile(&profile, &path).unwrap();
    let loaded = read_profile(&path).unwrap();

    assert_eq!(loaded, profile);
}

#[test]
fn test_transport_payload_decodes() {
    let profile = captured_profile();
    let payload = encode_compressed(&profile).unwrap();

    assert_eq!(&payload[..2], &[0x1f, 0x8b]);
    assert_eq!(decode_profile(&payload).unwrap(), profile);
}

#[test]
fn test_read_missing_profile() {
    let result = read_profile("/nonexistent/dir/reads.pb.gz");
    assert!(matches!(result, Err(OutputError::ReadFailed(_))));
}

#[test]
fn test_summary_json_fields() {
    let profile = captured_profile();
    let summary = summarize(&profile, 2);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.json");
    write_summary(&summary, &path).unwrap();
    let json = read_summary(&path).unwrap();

    assert_eq!(json["total_reads"], 6);
    assert_eq!(json["total_bytes"], 10 + 12 + 700 + 700 + 65_536 + 3);
    assert_eq!(json["unique_samples"], 4);
    assert_eq!(json["top_samples"].as_array().unwrap().len(), 2);
    assert_eq!(json["top_samples"][0]["bucket_bytes"], 65_536);

    let buckets: Vec<i64> = json["buckets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["bucket_bytes"].as_i64().unwrap())
        .collect();
    assert_eq!(buckets, vec![4, 16, 1024, 65_536]);
}
