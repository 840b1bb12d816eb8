use crate::host::HostTree;

/// Walks the host tree and yields the absolute `(start, end)` byte range
/// of every embedded markup region, bounded so trailing host syntax is
/// excluded. Ranges are sorted by start; overlapping ranges are the
/// weaver's job to suppress.
#[must_use]
pub fn locate_regions(tree: &HostTree, source: &str) -> Vec<(usize, usize)> {
    let bytes = source.as_bytes();
    let mut regions = Vec::new();

    for paren in tree.paren_expressions() {
        if !qualifies(bytes, paren.open) {
            continue;
        }

        let Some(xml_start) = find_byte(bytes, paren.open, b'<') else {
            continue;
        };

        // The host parser's own close position is not trusted; balance
        // the parens in the raw text instead.
        let Some(close) = matching_close(bytes, paren.open) else {
            tracing::warn!(
                offset = paren.open,
                "markup region has no balanced closing parenthesis; skipping"
            );
            continue;
        };

        let Some(last_gt) = rfind_byte(bytes, xml_start, close, b'>') else {
            continue;
        };
        let xml_end = last_gt + 1;

        if xml_start < xml_end {
            regions.push((xml_start, xml_end));
        }
    }

    regions.sort_unstable_by_key(|&(start, _)| start);
    regions
}

/// A parenthesized expression qualifies when its first inner token is `<`
/// immediately followed by an identifier; that distinguishes the marker
/// from an arithmetic `<`.
fn qualifies(bytes: &[u8], open: usize) -> bool {
    let mut i = open + 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i >= bytes.len() || bytes[i] != b'<' {
        return false;
    }
    let next = i + 1;
    next < bytes.len() && (bytes[next].is_ascii_alphabetic() || bytes[next] == b'_')
}

fn matching_close(bytes: &[u8], open: usize) -> Option<usize> {
    let mut balance = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => balance += 1,
            b')' => {
                balance -= 1;
                if balance == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == needle).map(|p| from + p)
}

/// Last occurrence of `needle` in `[from, to)`.
fn rfind_byte(bytes: &[u8], from: usize, to: usize, needle: u8) -> Option<usize> {
    bytes[from..to.min(bytes.len())]
        .iter()
        .rposition(|&b| b == needle)
        .map(|p| from + p)
}
