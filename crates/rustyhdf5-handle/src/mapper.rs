//! Error-stack to exception-chain mapping.

use crate::error::{ErrorDomain, Exception};
use crate::library::{ErrorFrame, Library};

/// Message of the fallback exception used when no frame is available.
pub const UNKNOWN_ERROR: &str = "unknown error";

/// Build an exception chain from error-stack frames given oldest first.
///
/// The newest frame becomes the head; each node's `next` is the node of the
/// frame pushed just before it. Every node is tagged with `domain`. An empty
/// slice yields a single generic [`UNKNOWN_ERROR`] node.
pub fn chain_from_frames(domain: ErrorDomain, frames: &[ErrorFrame]) -> Exception {
    let mut head: Option<Exception> = None;
    for frame in frames {
        let node = Exception::in_domain(domain, frame.description.clone())
            .with_codes(frame.major, frame.minor);
        head = Some(match head {
            Some(prev) => node.with_cause(prev),
            None => node,
        });
    }
    head.unwrap_or_else(|| Exception::new(UNKNOWN_ERROR))
}

/// Read the current error stack of `library` and map it into a chain.
///
/// Never fails: if the stack query itself fails, the fallback node is
/// returned. When `clear` is set the stack is cleared after a successful
/// query so the next failure starts from an empty stack.
pub fn map_error_stack(library: &dyn Library, domain: ErrorDomain, clear: bool) -> Exception {
    stack_chain(library, domain, clear).unwrap_or_else(|| Exception::new(UNKNOWN_ERROR))
}

/// Like [`map_error_stack`], but `None` when there is no frame to map.
pub(crate) fn stack_chain(
    library: &dyn Library,
    domain: ErrorDomain,
    clear: bool,
) -> Option<Exception> {
    match library.error_stack() {
        Ok(frames) => {
            if clear {
                library.clear_error_stack();
            }
            tracing::debug!(
                backend = library.name(),
                %domain,
                frames = frames.len(),
                "mapped library error stack"
            );
            if frames.is_empty() {
                None
            } else {
                Some(chain_from_frames(domain, &frames))
            }
        }
        Err(_) => {
            tracing::debug!(
                backend = library.name(),
                %domain,
                "error stack query failed, using fallback exception"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes;
    use crate::library::FileMode;
    use crate::memory::{FaultMode, MemoryLibrary, Op};

    fn frames(n: usize) -> Vec<ErrorFrame> {
        (0..n)
            .map(|i| ErrorFrame::new(10 + i as i64, 20 + i as i64, format!("f{i}")))
            .collect()
    }

    #[test]
    fn newest_frame_is_head() {
        let e = chain_from_frames(ErrorDomain::File, &frames(3));
        let msgs: Vec<_> = e.chain().map(Exception::what).collect();
        assert_eq!(msgs, ["f2", "f1", "f0"]);
        assert_eq!(e.err_major(), 12);
        assert_eq!(e.err_minor(), 22);
        assert_eq!(e.root_cause().err_major(), 10);
        assert!(e.chain().all(|n| n.is(ErrorDomain::File)));
    }

    #[test]
    fn single_frame() {
        let e = chain_from_frames(ErrorDomain::DataSet, &frames(1));
        assert_eq!(e.what(), "f0");
        assert!(e.next_exception().is_none());
    }

    #[test]
    fn empty_stack_fallback() {
        let e = chain_from_frames(ErrorDomain::DataSpace, &[]);
        assert_eq!(e.what(), UNKNOWN_ERROR);
        assert!(e.is(ErrorDomain::Generic));
        assert!(e.next_exception().is_none());
        assert_eq!(e.err_major(), 0);
    }

    #[test]
    fn map_clears_stack_when_asked() {
        let lib = MemoryLibrary::new();
        assert!(lib.open_file("missing.h5", FileMode::ReadOnly).is_err());
        let e = map_error_stack(&lib, ErrorDomain::File, false);
        assert_eq!(e.err_minor(), codes::MINOR_CANTOPENFILE);
        assert!(!lib.error_stack().unwrap().is_empty());

        let again = map_error_stack(&lib, ErrorDomain::File, true);
        assert_eq!(again.chain().count(), e.chain().count());
        assert!(lib.error_stack().unwrap().is_empty());
    }

    #[test]
    fn failed_query_degrades() {
        let lib = MemoryLibrary::new();
        assert!(lib.open_file("missing.h5", FileMode::ReadOnly).is_err());
        lib.inject(Op::ErrorStack, FaultMode::Silent);
        let e = map_error_stack(&lib, ErrorDomain::File, true);
        assert_eq!(e.what(), UNKNOWN_ERROR);
        assert!(e.next_exception().is_none());
    }

    #[test]
    fn stack_chain_is_none_without_frames() {
        let lib = MemoryLibrary::new();
        assert!(stack_chain(&lib, ErrorDomain::Object, true).is_none());
        assert!(lib.open_file("missing.h5", FileMode::ReadOnly).is_err());
        let chain = stack_chain(&lib, ErrorDomain::File, true).unwrap();
        assert_eq!(chain.what(), "unable to open file");
    }
}
