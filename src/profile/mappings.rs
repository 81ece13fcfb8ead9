//! Memory mappings of the current process.
//!
//! Mappings let pprof tooling attribute raw addresses to the binary or
//! shared library they belong to. Only executable, file-backed regions
//! are of interest since sampled addresses are return addresses.

use log::{debug, warn};

/// An executable region of the process address space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryMapping {
    /// First address of the region
    pub start: u64,

    /// One past the last address of the region
    pub limit: u64,

    /// Offset of the region within the backing file
    pub offset: u64,

    /// Path of the backing file
    pub filename: String,

    /// Build id of the backing file, empty when unknown
    pub build_id: String,
}

impl MemoryMapping {
    /// Whether `address` falls inside `[start, limit)`
    pub fn contains(&self, address: u64) -> bool {
        self.start <= address && address < self.limit
    }
}

/// List the executable mappings of the running process
///
/// **Public** - used by the profiler when building a profile
///
/// # Returns
/// Executable file-backed mappings in address order. Empty when the
/// platform is unsupported or the mapping table cannot be read; the
/// profile builder then falls back to a synthetic full-range mapping.
#[cfg(target_os = "linux")]
pub fn read_process_mappings() -> Vec<MemoryMapping> {
    match std::fs::read_to_string("/proc/self/maps") {
        Ok(maps) => {
            let mappings = parse_proc_maps(&maps);
            debug!("Read {} executable mappings from /proc/self/maps", mappings.len());
            mappings
        }
        Err(e) => {
            warn!("Cannot read /proc/self/maps, using synthetic mapping: {}", e);
            Vec::new()
        }
    }
}

#[cfg(not(target_os = "linux"))]
pub fn read_process_mappings() -> Vec<MemoryMapping> {
    debug!("Process mappings unsupported on this platform, using synthetic mapping");
    Vec::new()
}

/// Parse the contents of a `/proc/<pid>/maps` file
///
/// Lines that are not executable, not file-backed, or malformed are skipped.
pub fn parse_proc_maps(maps: &str) -> Vec<MemoryMapping> {
    maps.lines().filter_map(parse_proc_maps_line).collect()
}

/// Parse one line, e.g.
/// `55d0c0a00000-55d0c0a21000 r-xp 00002000 08:01 1234  /usr/bin/cat`
fn parse_proc_maps_line(line: &str) -> Option<MemoryMapping> {
    let mut fields = line.split_whitespace();

    let range = fields.next()?;
    let perms = fields.next()?;
    let offset = fields.next()?;
    let _device = fields.next()?;
    let _inode = fields.next()?;
    let path = fields.collect::<Vec<_>>().join(" ");

    // Pseudo files such as [vdso] and [stack] have no backing binary
    if !perms.contains('x') || path.is_empty() || path.starts_with('[') {
        return None;
    }

    let (start, limit) = range.split_once('-')?;

    Some(MemoryMapping {
        start: u64::from_str_radix(start, 16).ok()?,
        limit: u64::from_str_radix(limit, 16).ok()?,
        offset: u64::from_str_radix(offset, 16).ok()?,
        filename: path,
        build_id: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_MAPS: &str = "\
55d0c0a00000-55d0c0a02000 r--p 00000000 08:01 1234                       /usr/bin/cat
55d0c0a02000-55d0c0a07000 r-xp 00002000 08:01 1234                       /usr/bin/cat
55d0c1b00000-55d0c1b21000 rw-p 00000000 00:00 0                          [heap]
7f1a2b400000-7f1a2b595000 r-xp 00028000 08:01 5678                       /usr/lib/x86_64-linux-gnu/libc.so.6
7ffd5e9f0000-7ffd5e9f2000 r-xp 00000000 00:00 0                          [vdso]
7f1a2c000000-7f1a2c001000 r-xp 00000000 00:00 0
garbage line
";

    #[test]
    fn test_parse_proc_maps_keeps_executable_files() {
        let mappings = parse_proc_maps(SAMPLE_MAPS);

        assert_eq!(mappings.len(), 2);
        assert_eq!(
            mappings[0],
            MemoryMapping {
                start: 0x55d0c0a02000,
                limit: 0x55d0c0a07000,
                offset: 0x2000,
                filename: "/usr/bin/cat".to_string(),
                build_id: String::new(),
            }
        );
        assert_eq!(mappings[1].filename, "/usr/lib/x86_64-linux-gnu/libc.so.6");
        assert_eq!(mappings[1].offset, 0x28000);
    }

    #[test]
    fn test_parse_path_with_spaces() {
        let line = "1000-2000 r-xp 00000000 08:01 42 /opt/my app/bin";
        let mapping = parse_proc_maps_line(line).unwrap();
        assert_eq!(mapping.filename, "/opt/my app/bin");
    }

    #[test]
    fn test_contains_is_half_open() {
        let mapping = MemoryMapping {
            start: 0x1000,
            limit: 0x2000,
            offset: 0,
            filename: "a".to_string(),
            build_id: String::new(),
        };

        assert!(mapping.contains(0x1000));
        assert!(mapping.contains(0x1fff));
        assert!(!mapping.contains(0x2000));
        assert!(!mapping.contains(0xfff));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_read_process_mappings_finds_test_binary() {
        let here = test_read_process_mappings_finds_test_binary as usize as u64;
        let mappings = read_process_mappings();

        assert!(mappings.iter().any(|m| m.contains(here)));
    }
}
