//! Offset-table span resolution.
//!
//! The descriptor header is a tag count followed by one little-endian u16
//! offset per tag, all indexing into the region that follows the table. A
//! tag's segment runs from its own offset to the next tag's offset — but
//! the sentinel `0xFFFF` marks an absent segment, and an absent segment
//! must never claim a following tag's start. Resolving spans is therefore
//! a two-pass affair: collect all offsets, then scan forward past any
//! sentinels to find each segment's end.

use std::ops::Range;

/// Sentinel offset marking an absent segment.
pub const ABSENT: u16 = 0xFFFF;

/// Resolve the offset table into one byte range per tag.
///
/// `region_len` is the length of the data region the offsets index into.
/// Absent tags resolve to an empty range. An offset past the region end is
/// an error carrying the index of the offending tag; an inverted pair of
/// offsets resolves to an empty range rather than an error.
pub fn resolve_spans(offsets: &[u16], region_len: usize) -> Result<Vec<Range<usize>>, usize> {
    let mut spans = Vec::with_capacity(offsets.len());

    for (i, &offset) in offsets.iter().enumerate() {
        if offset == ABSENT {
            spans.push(0..0);
            continue;
        }

        let start = offset as usize;
        if start > region_len {
            return Err(i);
        }

        // Scan forward for the next present offset; the region end closes
        // the final span.
        let mut end = region_len;
        for (j, &next) in offsets.iter().enumerate().skip(i + 1) {
            if next != ABSENT {
                end = next as usize;
                if end > region_len {
                    return Err(j);
                }
                break;
            }
        }

        if start >= end {
            spans.push(start..start);
        } else {
            spans.push(start..end);
        }
    }

    Ok(spans)
}
