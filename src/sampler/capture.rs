//! Call stack capture for read sites.
//!
//! Walks the current thread's stack and records raw instruction pointers.
//! Addresses are left unsymbolized; pprof tooling resolves them later
//! against the mappings written into the profile.

use super::stack_key::MAX_STACK_DEPTH;

/// Raw stack captured on the caller's thread, innermost frame first
#[derive(Clone, Copy)]
pub struct CapturedStack {
    frames: [usize; MAX_STACK_DEPTH],
    len: usize,
}

impl CapturedStack {
    pub fn as_slice(&self) -> &[usize] {
        &self.frames[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Room for the unwinder's own frames above `capture_stack` plus `skip`
const INTERNAL_FRAMES: usize = 32;

/// Capture up to [`MAX_STACK_DEPTH`] return addresses of the current stack
///
/// **Public** - used by `Profiler::record_read` and the read adapters
///
/// # Arguments
/// * `skip` - Number of frames to drop, starting with the caller of
///   `capture_stack` (0 keeps the caller as the innermost frame)
///
/// Frames of the unwinder and of `capture_stack` itself are located by
/// symbol address and always dropped. Where the platform cannot report
/// symbol addresses, `skip` counts from the innermost frame the unwinder
/// returns. Inlined callers fold into their parent's frame.
#[inline(never)]
pub fn capture_stack(skip: usize) -> CapturedStack {
    let anchor = capture_stack as fn(usize) -> CapturedStack as usize;
    let mut raw = [0usize; MAX_STACK_DEPTH + INTERNAL_FRAMES];
    let mut raw_len = 0;
    let mut anchor_at = None;

    walk(|frame| {
        let ip = frame.ip() as usize;
        if ip == 0 {
            return true;
        }
        if anchor_at.is_none() && frame.symbol_address() as usize == anchor {
            anchor_at = Some(raw_len);
        }
        raw[raw_len] = ip;
        raw_len += 1;
        raw_len < raw.len()
    });

    let first = anchor_at.map_or(0, |index| index + 1) + skip;
    let kept = raw_len.saturating_sub(first).min(MAX_STACK_DEPTH);

    let mut stack = CapturedStack {
        frames: [0; MAX_STACK_DEPTH],
        len: kept,
    };
    if kept > 0 {
        stack.frames[..kept].copy_from_slice(&raw[first..first + kept]);
    }
    stack
}

#[cfg(unix)]
fn walk<F: FnMut(&backtrace::Frame) -> bool>(cb: F) {
    // SAFETY: the unix unwinders are thread-safe; we only read instruction
    // pointers of the current thread and never symbolize during the walk.
    unsafe { backtrace::trace_unsynchronized(cb) }
}

#[cfg(not(unix))]
fn walk<F: FnMut(&backtrace::Frame) -> bool>(cb: F) {
    backtrace::trace(cb)
}
