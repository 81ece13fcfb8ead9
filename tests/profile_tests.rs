use readprof::profile::{parse_proc_maps, summarize, MemoryMapping};
use readprof::sampler::{MappingSource, Profiler};
use std::collections::HashSet;

fn mapping(start: u64, limit: u64, filename: &str) -> MemoryMapping {
    MemoryMapping {
        start,
        limit,
        offset: 0,
        filename: filename.to_string(),
        build_id: String::new(),
    }
}

#[test]
fn test_referenced_ids_exist() {
    let profiler = Profiler::with_mappings(MappingSource::Fixed(vec![
        mapping(0x1000, 0x2000, "/usr/bin/app"),
        mapping(0x1800, 0x3000, "/usr/lib/libc.so"),
    ]));
    profiler.start().unwrap();
    profiler.record(10, &[0x1100, 0x1900, 0x9000]);
    profiler.record(2000, &[0x2500, 0x1100]);
    profiler.record(1, &[]);
    let profile = profiler.stop().unwrap();

    let location_ids: HashSet<u64> = profile.location.iter().map(|l| l.id).collect();
    let mapping_ids: HashSet<u64> = profile.mapping.iter().map(|m| m.id).collect();

    for sample in &profile.sample {
        for id in &sample.location_id {
            assert!(location_ids.contains(id), "dangling location {}", id);
        }
    }
    for location in &profile.location {
        assert!(location.id != 0);
        assert!(location.mapping_id == 0 || mapping_ids.contains(&location.mapping_id));
    }

    let by_address = |address: u64| {
        profile
            .location
            .iter()
            .find(|l| l.address == address)
            .map(|l| l.mapping_id)
    };
    // Overlapping ranges resolve to the lowest id
    assert_eq!(by_address(0x1900), Some(1));
    assert_eq!(by_address(0x2500), Some(2));
    assert_eq!(by_address(0x9000), Some(0));
    assert_eq!(profile.location.len(), 4);
}

#[test]
fn test_mapping_filenames_are_interned() {
    let profiler = Profiler::with_mappings(MappingSource::Fixed(vec![
        mapping(0x1000, 0x2000, "/usr/bin/app"),
        mapping(0x4000, 0x5000, "/usr/bin/app"),
    ]));
    profiler.start().unwrap();
    let profile = profiler.stop().unwrap();

    assert_eq!(profile.mapping.len(), 2);
    assert_eq!(profile.mapping[0].filename, profile.mapping[1].filename);
    let filename = &profile.string_table[profile.mapping[0].filename as usize];
    assert_eq!(filename, "/usr/bin/app");
    assert_eq!(profile.string_table.len(), 6);
}

#[test]
fn test_proc_maps_parse() {
    let maps = "\
55d0c0a00000-55d0c0a20000 r--p 00000000 08:01 1234 /usr/bin/app
55d0c0a20000-55d0c0a80000 r-xp 00020000 08:01 1234 /usr/bin/app
7ffd1c000000-7ffd1c021000 rw-p 00000000 00:00 0 [stack]
7ffd1c1f0000-7ffd1c1f2000 r-xp 00000000 00:00 0 [vdso]
";
    let mappings = parse_proc_maps(maps);

    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0].start, 0x55d0c0a20000);
    assert_eq!(mappings[0].limit, 0x55d0c0a80000);
    assert_eq!(mappings[0].offset, 0x20000);
    assert_eq!(mappings[0].filename, "/usr/bin/app");
}

#[test]
fn test_summary_of_captured_profile() {
    let profiler = Profiler::with_mappings(MappingSource::Fixed(Vec::new()));
    profiler.start().unwrap();
    for _ in 0..3 {
        profiler.record(4096, &[0x10, 0x20]);
    }
    profiler.record(16, &[0x30]);
    let profile = profiler.stop().unwrap();

    let summary = summarize(&profile, 1);
    assert_eq!(summary.total_reads, 4);
    assert_eq!(summary.total_bytes, 3 * 4096 + 16);
    assert_eq!(summary.unique_samples, 2);
    assert_eq!(summary.top_samples.len(), 1);
    assert_eq!(summary.top_samples[0].bytes, 3 * 4096);
}
